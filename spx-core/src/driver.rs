//! Fixed-step driver for server-side simulations.
//!
//! The driver owns the client-side half of a run: it moves an instance timer
//! to explicit timestamps and asks the server to evaluate after each move:
//!
//! ```text
//! prepare
//! for k in 1..=steps:
//!     t = k * dt
//!     set_timer(instance, t)
//!     run
//!     sample_k = (t, read_attribute(instance, attribute))
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spx_core::driver::{self, Schedule};
//!
//! let instance = client.create_instance("pt100_1", "pt_100")?;
//! let schedule = Schedule::new(TimeIncrement::new::<second>(0.1)?, 100);
//! let solution = driver::drive_unobserved(&instance, "temperature", schedule)?;
//!
//! for sample in solution.samples.iter() {
//!     println!("t={}: {}", sample.time, sample.internal);
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::{Error, Phase};
pub use event::Event;
pub use solution::{Solution, Status};

use uom::si::{f64::Time, time::second};

use crate::{Instance, Observer, Sample, Series, SimulationClient, TimeIncrement};

/// The step size and number of steps for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub dt: TimeIncrement,
    pub steps: usize,
}

impl Schedule {
    #[must_use]
    pub fn new(dt: TimeIncrement, steps: usize) -> Self {
        Self { dt, steps }
    }

    /// Returns the timer value for `step`, where step 1 is the first
    /// evaluation.
    #[must_use]
    pub fn time_at(&self, step: usize) -> Time {
        self.dt.times(step)
    }

    /// Iterates over the timer values of every step in order.
    pub fn timestamps(&self) -> impl Iterator<Item = Time> + '_ {
        (1..=self.steps).map(|step| self.time_at(step))
    }
}

/// Drives `instance` through `schedule`, sampling `attribute` after each step.
///
/// # Algorithm
///
/// 1. Call [`SimulationClient::prepare`] once.
/// 2. For each step `k` in `1..=steps`:
///    - Set the instance timer to `k * dt`.
///    - Call [`SimulationClient::run`].
///    - Read both layers of `attribute` and record a [`Sample`].
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], terminate.
/// 3. Return the collected samples.
///
/// # Errors
///
/// Returns an error as soon as any server call fails; no call is retried.
pub fn drive<C, Obs>(
    instance: &Instance<'_, C>,
    attribute: &str,
    schedule: Schedule,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    C: SimulationClient,
    Obs: Observer,
{
    let client = instance.client();
    client.prepare().map_err(Error::prepare)?;

    let mut samples = Series::with_capacity(schedule.steps);

    for step in 1..=schedule.steps {
        let time = schedule.time_at(step);

        instance
            .set_timer(time)
            .map_err(|err| Error::step(step, Phase::SetTimer, err))?;
        client
            .run()
            .map_err(|err| Error::step(step, Phase::Run, err))?;
        let value = instance
            .attribute(attribute)
            .map_err(|err| Error::step(step, Phase::ReadAttribute, err))?;

        let sample = Sample::new(time.get::<second>(), value);
        samples.push(sample);

        log::debug!(
            "{}.{attribute} at step {step} (t = {} s): internal = {}, external = {}",
            instance.name(),
            sample.time,
            sample.internal,
            sample.external,
        );

        if let Some(Action::StopEarly) = observer.observe(&Event { step, sample }) {
            log::info!("run of {} stopped by observer at step {step}", instance.name());
            return Ok(Solution {
                status: Status::StoppedByObserver,
                samples,
                steps: step,
            });
        }
    }

    Ok(Solution {
        status: Status::Complete,
        samples,
        steps: schedule.steps,
    })
}

/// Drives `instance` through `schedule` without observation.
///
/// This is a convenience wrapper around [`drive`] that discards events.
///
/// # Errors
///
/// Returns an error as soon as any server call fails.
pub fn drive_unobserved<C>(
    instance: &Instance<'_, C>,
    attribute: &str,
    schedule: Schedule,
) -> Result<Solution, Error>
where
    C: SimulationClient,
{
    drive(instance, attribute, schedule, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::second;

    #[test]
    fn timestamps_start_after_one_increment() {
        let schedule = Schedule::new(TimeIncrement::new::<second>(0.25).unwrap(), 4);
        let times: Vec<f64> = schedule
            .timestamps()
            .map(|t| t.get::<second>())
            .collect();

        assert_eq!(times.len(), 4);
        for (actual, expected) in times.iter().zip([0.25, 0.5, 0.75, 1.0]) {
            assert_relative_eq!(*actual, expected);
        }
    }

    #[test]
    fn zero_steps_produce_no_timestamps() {
        let schedule = Schedule::new(TimeIncrement::new::<second>(1.0).unwrap(), 0);
        assert_eq!(schedule.timestamps().count(), 0);
    }
}
