use crate::Series;

/// Indicates how the driver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all scheduled steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a driven run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the driver terminated.
    pub status: Status,

    /// Samples from each completed step, in step order.
    pub samples: Series,

    /// Number of steps completed.
    pub steps: usize,
}
