use crate::Sample;

/// Event emitted by the driver after each step.
///
/// Steps are numbered from 1; there is no event for the prepared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The step number.
    pub step: usize,

    /// The attribute sample read after the step.
    pub sample: Sample,
}
