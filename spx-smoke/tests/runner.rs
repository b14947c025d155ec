#![cfg(unix)]

use std::{
    fs,
    path::Path,
    time::{Duration, Instant},
};

use spx_smoke::{Example, Launcher, RunError, Runner};

fn script(dir: &Path, name: &str, body: &str) -> Example {
    let path = dir.join(format!("{name}.rs"));
    fs::write(&path, body).unwrap();
    Example::from_path(path).unwrap()
}

fn sh() -> Runner {
    Runner::new(Launcher::Program("sh".into()))
}

#[tokio::test]
async fn zero_exit_passes_and_output_is_captured() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(dir.path(), "ok", "echo out; echo err >&2\n");

    let output = sh().run(&example).await.unwrap();

    assert!(output.success());
    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
}

#[tokio::test]
async fn non_zero_exit_fails_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(dir.path(), "bad", "echo partial; exit 3\n");

    let output = sh().run(&example).await.unwrap();

    assert!(!output.success());
    assert_eq!(output.status.code(), Some(3));
    let report = output.to_string();
    assert!(report.contains("=== STDOUT ===\npartial"));
    assert!(report.contains("=== STDERR ==="));
}

#[tokio::test]
async fn examples_run_in_their_own_directory() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(dir.path(), "pwd", "pwd\n");

    let output = sh().run(&example).await.unwrap();

    let reported = fs::canonicalize(output.stdout.trim()).unwrap();
    assert_eq!(reported, fs::canonicalize(dir.path()).unwrap());
}

#[tokio::test]
async fn defaults_fill_unset_variables_only() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(
        dir.path(),
        "env",
        "echo \"$SPX_SMOKE_TEST_UNSET_VAR\"; echo \"$PATH\"\n",
    );

    let output = sh()
        .env_default("SPX_SMOKE_TEST_UNSET_VAR", "filled")
        .env_default("PATH", "/overridden")
        .run(&example)
        .await
        .unwrap();

    let mut lines = output.stdout.lines();
    assert_eq!(lines.next(), Some("filled"));
    assert_ne!(lines.next(), Some("/overridden"));
}

#[tokio::test]
async fn slow_examples_time_out() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(dir.path(), "slow", "sleep 30\n");

    let start = Instant::now();
    let result = sh()
        .timeout(Duration::from_millis(300))
        .run(&example)
        .await;

    assert!(matches!(result, Err(RunError::Timeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let example = script(dir.path(), "any", "");

    let result = Runner::new(Launcher::Program("/no/such/program".into()))
        .run(&example)
        .await;

    assert!(matches!(result, Err(RunError::Spawn { .. })));
}
