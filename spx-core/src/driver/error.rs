use std::{error::Error as StdError, fmt};

/// The server call that failed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SetTimer,
    Run,
    ReadAttribute,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SetTimer => "set timer",
            Self::Run => "run",
            Self::ReadAttribute => "read attribute",
        })
    }
}

/// Errors that can occur while driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to prepare simulation: {0}")]
    Prepare(#[source] Box<dyn StdError + Send + Sync>),

    #[error("step {step}: failed to {phase}: {source}")]
    Step {
        step: usize,
        phase: Phase,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn prepare<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Prepare(Box::new(err))
    }

    pub(crate) fn step<E: StdError + Send + Sync + 'static>(
        step: usize,
        phase: Phase,
        err: E,
    ) -> Self {
        Self::Step {
            step,
            phase,
            source: Box::new(err),
        }
    }
}
