//! Charts and best-effort export of SPX simulation results.
//!
//! A [`Chart`] holds named traces. An [`Exporter`] writes it to an HTML page
//! rendered with plotly.js and, unless [`BACKEND_VAR`] is `headless`, shows it
//! in a native egui window (with the `gui` feature). Export never fails the
//! caller: problems are logged and returned in an [`ExportReport`].
//!
//! # Example
//!
//! ```no_run
//! use spx_plot::{Chart, Exporter};
//!
//! let chart = Chart::new("PT100 Temperature Over Time")
//!     .x_title("Time [s]")
//!     .y_title("Temperature [°C]")
//!     .trace("Temperature (internal)", vec![[0.1, 0.0], [0.2, 3.1]]);
//!
//! let report = Exporter::from_env().html("first_simulation.html").export(&chart);
//! if !report.is_clean() {
//!     eprintln!("{report:?}");
//! }
//! ```

pub mod html;

mod chart;
mod export;
#[cfg(feature = "gui")]
mod window;

pub use chart::{Chart, Trace};
pub use export::{BACKEND_VAR, Backend, DisplayOutcome, ExportReport, Exporter, HtmlOutcome};
