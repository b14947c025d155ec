use std::{fmt, ops::Deref};

use thiserror::Error;
use uom::{
    Conversion,
    si::{f64::Time, time},
};

/// A strictly positive step size for advancing instance timers.
///
/// Wraps a [`Time`] so step sizes keep their units while ruling out zero and
/// negative values, which would stall the timer or run it backwards.
///
/// ```
/// use spx_core::TimeIncrement;
/// use uom::si::time::second;
///
/// let dt = TimeIncrement::new::<second>(0.1)?;
/// assert_eq!(dt.to_string(), "0.1 s");
/// # Ok::<(), spx_core::TimeIncrementError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeIncrement(Time);

/// Error type returned when constructing an invalid [`TimeIncrement`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimeIncrementError {
    #[error("time increment must be finite and greater than zero, got {0} s")]
    NotPositive(f64),
}

impl TimeIncrement {
    /// Constructs a `TimeIncrement` from a numeric value and unit.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError::NotPositive`] if `value` is zero,
    /// negative, or not finite.
    pub fn new<U>(value: f64) -> Result<Self, TimeIncrementError>
    where
        U: time::Unit + Conversion<f64, T = f64>,
    {
        Self::from_time(Time::new::<U>(value))
    }

    /// Constructs a `TimeIncrement` from an existing [`Time`] value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError::NotPositive`] if the time is zero,
    /// negative, or not finite.
    pub fn from_time(time: Time) -> Result<Self, TimeIncrementError> {
        let seconds = time.get::<time::second>();
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Self(time))
        } else {
            Err(TimeIncrementError::NotPositive(seconds))
        }
    }

    /// Returns the time reached after `steps` increments from zero.
    ///
    /// The result is computed by multiplication rather than repeated addition,
    /// so rounding error does not accumulate over long runs.
    #[must_use]
    pub fn times(self, steps: usize) -> Time {
        #[allow(clippy::cast_precision_loss)]
        let steps = steps as f64;
        self.0 * steps
    }

    /// Consumes the `TimeIncrement` and returns the underlying [`Time`] value.
    #[must_use]
    pub fn into_inner(self) -> Time {
        self.0
    }
}

impl TryFrom<Time> for TimeIncrement {
    type Error = TimeIncrementError;

    fn try_from(t: Time) -> Result<Self, Self::Error> {
        Self::from_time(t)
    }
}

impl Deref for TimeIncrement {
    type Target = Time;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TimeIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.get::<time::second>();
        write!(f, "{s} s")
    }
}
