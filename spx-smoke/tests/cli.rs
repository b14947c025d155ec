use std::process::Command;

use spx_smoke::EXAMPLES_ONLY_VAR;

#[test]
fn unhealthy_server_skips_before_discovery() {
    let empty = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_spx-smoke"))
        .arg("--examples-dir")
        .arg(empty.path())
        .args(["--api-url", "http://127.0.0.1:9", "--probe-timeout-secs", "1"])
        .env_remove(EXAMPLES_ONLY_VAR)
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.starts_with("SKIP"), "{stdout}");
    assert!(!stdout.contains("discovery_found_examples"), "{stdout}");
}
