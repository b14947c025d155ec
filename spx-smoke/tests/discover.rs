use std::{fs, path::Path};

use spx_smoke::discover;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "fn main() {}\n").unwrap();
}

fn names(dir: &Path, only: Option<&str>) -> Vec<String> {
    discover(dir, only)
        .unwrap()
        .into_iter()
        .map(|example| example.name)
        .collect()
}

#[test]
fn scan_skips_helpers_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("first_simulation.rs"));
    touch(&root.join("hello_world/main.rs"));
    touch(&root.join("hello_world/plot.rs"));
    touch(&root.join("_shared.rs"));
    touch(&root.join("test_client.rs"));
    touch(&root.join("client_test.rs"));
    touch(&root.join("mod.rs"));
    touch(&root.join("_scratch/main.rs"));
    touch(&root.join("assets/data.rs"));
    fs::write(root.join("README.md"), "# examples\n").unwrap();

    assert_eq!(names(root, None), ["first_simulation", "hello_world"]);
}

#[test]
fn allow_list_keeps_order_and_drops_missing_entries() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("a.rs"));
    touch(&root.join("b.rs"));
    touch(&root.join("c.rs"));

    assert_eq!(names(root, Some("b.rs, a.rs,missing.rs,")), ["b", "a"]);
}

#[test]
fn allow_list_is_not_filtered_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("_private.rs"));
    touch(&root.join("nested/main.rs"));

    assert_eq!(
        names(root, Some("_private.rs,nested/main.rs")),
        ["_private", "nested"]
    );
}

#[test]
fn allow_list_skips_entries_cargo_cannot_run() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("a.rs"));
    touch(&root.join("sub/foo.rs"));
    touch(&root.join("deep/nested/main.rs"));

    assert_eq!(
        names(root, Some("sub/foo.rs,deep/nested/main.rs,a.rs")),
        ["a"]
    );
}

#[test]
fn blank_allow_list_scans() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.rs"));

    assert_eq!(names(dir.path(), Some("  ")), ["a"]);
}

#[test]
fn empty_directory_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(names(dir.path(), None).is_empty());
}
