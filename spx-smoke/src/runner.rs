use std::{
    env::consts::EXE_SUFFIX,
    ffi::OsString,
    fmt, io,
    path::PathBuf,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use spx_core::env::{EnvProvider, StandardEnv};
use thiserror::Error;
use tokio::process::Command;

use crate::Example;

/// Wall-clock limit for one example.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// How an example program is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `cargo run --quiet -p <package> --example <name>`.
    Cargo { package: String },
    /// `<dir>/<name>`, for examples cargo has already built.
    Binary { dir: PathBuf },
    /// `<program> <example path>`.
    Program(PathBuf),
}

impl Launcher {
    fn command(&self, example: &Example) -> Command {
        match self {
            Self::Cargo { package } => {
                let cargo = StandardEnv
                    .non_empty("CARGO")
                    .map_or_else(|| OsString::from("cargo"), OsString::from);
                let mut command = Command::new(cargo);
                command
                    .args(["run", "--quiet", "-p"])
                    .arg(package)
                    .arg("--example")
                    .arg(&example.name);
                command
            }
            Self::Binary { dir } => {
                Command::new(dir.join(format!("{}{EXE_SUFFIX}", example.name)))
            }
            Self::Program(program) => {
                let mut command = Command::new(program);
                command.arg(&example.path);
                command
            }
        }
    }
}

/// Errors that prevent an example from producing an exit status.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start example {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("example {name} did not finish within {timeout:?}")]
    Timeout { name: String, timeout: Duration },
}

/// Captured result of a finished example.
#[derive(Debug)]
pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Formats the captured streams for a failure report.
impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== STDOUT ===\n{}", self.stdout)?;
        write!(f, "=== STDERR ===\n{}", self.stderr)
    }
}

/// Runs examples as subprocesses with a timeout.
///
/// Variables registered with [`env_default`](Self::env_default) are passed to
/// the child only when the current process does not already set them. A child
/// still running at the timeout is killed.
#[derive(Debug, Clone)]
pub struct Runner {
    launcher: Launcher,
    timeout: Duration,
    env_defaults: Vec<(String, String)>,
}

impl Runner {
    #[must_use]
    pub fn new(launcher: Launcher) -> Self {
        Self {
            launcher,
            timeout: DEFAULT_RUN_TIMEOUT,
            env_defaults: Vec::new(),
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn env_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_defaults.push((name.into(), value.into()));
        self
    }

    /// Runs `example` in its own directory and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Spawn`] if the program cannot be started or its
    /// output cannot be collected, and [`RunError::Timeout`] if it runs past
    /// the timeout.
    pub async fn run(&self, example: &Example) -> Result<RunOutput, RunError> {
        let mut command = self.launcher.command(example);
        command
            .current_dir(example.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (name, value) in &self.env_defaults {
            if StandardEnv.var(name).is_none() {
                command.env(name, value);
            }
        }

        let spawn_error = |source: io::Error| RunError::Spawn {
            name: example.name.clone(),
            source,
        };

        log::info!("running example {}", example.name);
        let child = command.spawn().map_err(spawn_error)?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(spawn_error)?,
            Err(_) => {
                log::warn!("example {} timed out; killed", example.name);
                return Err(RunError::Timeout {
                    name: example.name.clone(),
                    timeout: self.timeout,
                });
            }
        };

        Ok(RunOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
