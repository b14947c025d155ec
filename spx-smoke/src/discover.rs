//! Finding runnable example programs.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// Comma-separated list of example paths, relative to the examples
/// directory, that restricts which examples run.
pub const EXAMPLES_ONLY_VAR: &str = "SPX_EXAMPLES_ONLY";

/// A runnable example program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Example {
    /// The example target name: the file stem of `name.rs`, or the directory
    /// name of `name/main.rs`.
    pub name: String,
    pub path: PathBuf,
}

impl Example {
    /// Describes the example at `path`.
    ///
    /// Returns `None` if `path` is not a `.rs` file.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        if path.extension()? != "rs" {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let name = if stem == "main" {
            path.parent()?.file_name()?.to_str()?
        } else {
            stem
        };

        Some(Self {
            name: name.to_owned(),
            path,
        })
    }

    /// The directory the example runs in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Finds the example programs in `dir`.
///
/// With an `only` list, returns the listed entries that exist, in the order
/// given, without applying the name filters. Entries must name a Cargo
/// example target (`foo.rs` or `foo/main.rs`); anything else is skipped with
/// a warning. Otherwise scans `dir` for
/// top-level `*.rs` files and `*/main.rs` programs, skipping helper files:
/// names starting with `_` or `test_`, ending in `_test.rs`, and `mod.rs`.
/// Scan results are sorted by path.
///
/// A missing `dir` yields no examples.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be read.
pub fn discover(dir: &Path, only: Option<&str>) -> io::Result<Vec<Example>> {
    if !dir.is_dir() {
        log::warn!("examples directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    if let Some(only) = only.filter(|only| !only.trim().is_empty()) {
        return Ok(allow_listed(dir, only));
    }

    let mut examples = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        let candidate = if path.is_dir() {
            if !is_runnable_name(&file_name(&path)) {
                continue;
            }
            path.join("main.rs")
        } else {
            path
        };

        if !candidate.is_file() || !is_runnable_name(&file_name(&candidate)) {
            continue;
        }
        if let Some(example) = Example::from_path(candidate) {
            examples.push(example);
        }
    }

    examples.sort_by(|a, b| a.path.cmp(&b.path));
    log::debug!("found {} example(s) in {}", examples.len(), dir.display());
    Ok(examples)
}

fn allow_listed(dir: &Path, only: &str) -> Vec<Example> {
    only.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            if !is_example_target(entry) {
                log::warn!(
                    "{EXAMPLES_ONLY_VAR} entry {entry:?} is not an example target \
                     (expected `name.rs` or `name/main.rs`); skipping"
                );
                return None;
            }
            let path = dir.join(entry);
            if !path.is_file() {
                log::warn!("{EXAMPLES_ONLY_VAR} entry {entry:?} does not exist; skipping");
                return None;
            }
            Example::from_path(path)
        })
        .collect()
}

/// Whether `entry` is laid out the way Cargo discovers examples.
fn is_example_target(entry: &str) -> bool {
    let parts: Vec<_> = Path::new(entry).components().collect();
    match parts.as_slice() {
        [Component::Normal(file)] => Path::new(file).extension().is_some_and(|ext| ext == "rs"),
        [Component::Normal(_), Component::Normal(file)] => file.to_str() == Some("main.rs"),
        _ => false,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn is_runnable_name(name: &str) -> bool {
    !(name.starts_with('_')
        || name.starts_with("test_")
        || name.ends_with("_test.rs")
        || name == "mod.rs")
}
