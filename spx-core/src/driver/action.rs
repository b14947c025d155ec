/// Control actions supported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop driving and return the samples collected so far.
    StopEarly,
}
