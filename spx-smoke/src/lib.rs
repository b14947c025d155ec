//! Smoke tests for SPX example programs.
//!
//! A session probes the server, and is skipped if it is not healthy. Each
//! discovered example then runs as a subprocess and passes if it exits with
//! status zero:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use spx_smoke::{Launcher, Runner, discover, session};
//! use spx_client::health::DEFAULT_PROBE_TIMEOUT;
//!
//! # async fn smoke() -> Result<(), Box<dyn std::error::Error>> {
//! if !session::probe("http://localhost:8000", DEFAULT_PROBE_TIMEOUT).await.is_healthy() {
//!     return Ok(());
//! }
//!
//! let runner = Runner::new(Launcher::Cargo { package: "spx-examples".into() })
//!     .env_default("SPX_PLOT_BACKEND", "headless");
//!
//! for example in discover(Path::new("spx-examples/examples"), None)? {
//!     let output = runner.run(&example).await?;
//!     assert!(output.success(), "{output}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod session;

mod discover;
mod runner;

pub use discover::{EXAMPLES_ONLY_VAR, Example, discover};
pub use runner::{DEFAULT_RUN_TIMEOUT, Launcher, RunError, RunOutput, Runner};
