use std::path::{Path, PathBuf};

use spx_core::env::{EnvProvider, StandardEnv};

use crate::{Chart, html};

/// Selects the display backend; `headless` disables interactive windows.
pub const BACKEND_VAR: &str = "SPX_PLOT_BACKEND";

/// Whether the exporter may open an interactive window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Interactive,
    Headless,
}

impl Backend {
    /// Reads [`BACKEND_VAR`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_provider(&StandardEnv)
    }

    /// Reads [`BACKEND_VAR`] from `env`. Any value other than `headless`
    /// (case-insensitive) selects [`Backend::Interactive`].
    #[must_use]
    pub fn from_provider(env: &impl EnvProvider) -> Self {
        match env.non_empty(BACKEND_VAR) {
            Some(value) if value.trim().eq_ignore_ascii_case("headless") => Self::Headless,
            _ => Self::Interactive,
        }
    }
}

/// What happened to the HTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlOutcome {
    Saved(PathBuf),
    Failed { path: PathBuf, error: String },
}

/// What happened to the interactive window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// The window was shown and closed.
    Shown,
    /// Display was disabled by [`Backend::Headless`].
    Headless,
    /// Built without the `gui` feature.
    Unavailable,
    Failed(String),
}

/// The result of an [`Exporter::export`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub html: Option<HtmlOutcome>,
    pub display: DisplayOutcome,
}

impl ExportReport {
    /// Returns `true` if nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !matches!(self.html, Some(HtmlOutcome::Failed { .. }))
            && !matches!(self.display, DisplayOutcome::Failed(_))
    }
}

/// Writes and displays charts, reporting failures instead of returning them.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    html_path: Option<PathBuf>,
    backend: Backend,
}

impl Exporter {
    /// An exporter that writes nothing and uses the backend from the
    /// environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            html_path: None,
            backend: Backend::from_env(),
        }
    }

    /// Also writes an HTML page to `path`.
    #[must_use]
    pub fn html(mut self, path: impl Into<PathBuf>) -> Self {
        self.html_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Writes the HTML page, if configured, and then shows the chart unless
    /// the backend is headless.
    ///
    /// Failures are printed, logged, and recorded in the report.
    pub fn export(&self, chart: &Chart) -> ExportReport {
        let html = self.html_path.as_deref().map(|path| write_html(chart, path));
        let display = self.display(chart);

        ExportReport { html, display }
    }

    fn display(&self, chart: &Chart) -> DisplayOutcome {
        if self.backend == Backend::Headless {
            log::debug!("{BACKEND_VAR} is headless; not opening a window");
            return DisplayOutcome::Headless;
        }
        show(chart)
    }
}

fn write_html(chart: &Chart, path: &Path) -> HtmlOutcome {
    match html::write(chart, path) {
        Ok(()) => {
            println!("Saved interactive chart to: {}", path.display());
            HtmlOutcome::Saved(path.to_path_buf())
        }
        Err(err) => {
            println!("Failed to write HTML chart: {err}");
            log::warn!("could not write {}: {err}", path.display());
            HtmlOutcome::Failed {
                path: path.to_path_buf(),
                error: err.to_string(),
            }
        }
    }
}

#[cfg(feature = "gui")]
fn show(chart: &Chart) -> DisplayOutcome {
    match crate::window::show(chart) {
        Ok(()) => DisplayOutcome::Shown,
        Err(err) => {
            log::warn!("could not open chart window: {err}");
            DisplayOutcome::Failed(err.to_string())
        }
    }
}

#[cfg(not(feature = "gui"))]
fn show(_chart: &Chart) -> DisplayOutcome {
    log::debug!("built without the gui feature; not opening a window");
    DisplayOutcome::Unavailable
}
