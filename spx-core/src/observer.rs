use crate::driver::{Action, Event};

/// Watches a [`driver::drive`](crate::driver::drive) run one step at a time.
///
/// The driver calls [`observe`](Observer::observe) after it has set the
/// timer, run the server, and read the sample for a step. Returning
/// `Some(Action::StopEarly)` ends the run with
/// [`Status::StoppedByObserver`](crate::driver::Status::StoppedByObserver);
/// the sample for that step is kept.
///
/// Any `FnMut(&Event) -> Option<Action>` closure is an observer, and `()`
/// never stops the run.
///
/// ```
/// use spx_core::{Observer, driver::{Action, Event}};
///
/// /// Stops once the internal value crosses a limit.
/// struct Limit(f64);
///
/// impl Observer for Limit {
///     fn observe(&mut self, event: &Event) -> Option<Action> {
///         (event.sample.internal >= self.0).then_some(Action::StopEarly)
///     }
/// }
/// ```
pub trait Observer {
    fn observe(&mut self, event: &Event) -> Option<Action>;
}

impl<F> Observer for F
where
    F: FnMut(&Event) -> Option<Action>,
{
    fn observe(&mut self, event: &Event) -> Option<Action> {
        self(event)
    }
}

impl Observer for () {
    fn observe(&mut self, _event: &Event) -> Option<Action> {
        None
    }
}
