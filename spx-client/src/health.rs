//! Bounded health probe for SPX servers.
//!
//! A server counts as healthy as soon as one request to its base URL is
//! answered with a status below 500. Connection failures and server errors
//! are retried until the overall timeout runs out.

use std::{
    fmt, thread,
    time::{Duration, Instant},
};

use reqwest::blocking::Client;

/// Overall probe timeout used by the smoke harness.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for a single request.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause between failed attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Outcome of a [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    Healthy { status: u16, attempts: usize },
    Unhealthy { attempts: usize, last_error: String },
}

impl Health {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy { status, attempts } => {
                write!(f, "healthy (status {status} after {attempts} attempt(s))")
            }
            Self::Unhealthy {
                attempts,
                last_error,
            } => write!(f, "unhealthy after {attempts} attempt(s): {last_error}"),
        }
    }
}

/// Polls `url` until it answers with a status below 500 or `timeout` elapses.
#[must_use]
pub fn probe(url: &str, timeout: Duration) -> Health {
    let deadline = Instant::now() + timeout;

    let client = match Client::builder().timeout(ATTEMPT_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            return Health::Unhealthy {
                attempts: 0,
                last_error: err.to_string(),
            };
        }
    };

    let mut attempts = 0;
    let mut last_error = String::from("no attempt made");

    while Instant::now() < deadline {
        attempts += 1;
        let remaining = deadline.saturating_duration_since(Instant::now());

        match client.get(url).timeout(remaining.min(ATTEMPT_TIMEOUT)).send() {
            Ok(response) if response.status().as_u16() < 500 => {
                let status = response.status().as_u16();
                log::debug!("{url} answered {status} on attempt {attempts}");
                return Health::Healthy { status, attempts };
            }
            Ok(response) => {
                last_error = format!("server responded with {}", response.status());
            }
            Err(err) => last_error = err.to_string(),
        }

        log::debug!("{url} not healthy on attempt {attempts}: {last_error}");
        thread::sleep(RETRY_DELAY.min(deadline.saturating_duration_since(Instant::now())));
    }

    Health::Unhealthy {
        attempts,
        last_error,
    }
}
