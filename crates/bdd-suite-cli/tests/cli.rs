//! CLI behaviour over scaffolded application trees.
#![expect(clippy::expect_used, reason = "tests assert on success paths")]

use assert_cmd::Command;
use camino::Utf8PathBuf;

const WISHLIST_FEATURE: &str = "Feature: Wishlist\n\
    \n\
    Scenario: a wish is recorded\n\
    Given an unwritten wishlist step\n";

fn scaffold(apps: &[(&str, Option<&str>)]) -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("utf8 tempdir");
    for (label, feature) in apps {
        let app = root.join(label);
        match feature {
            Some(body) => {
                let features = app.join("features");
                std::fs::create_dir_all(&features).expect("create features");
                std::fs::write(features.join("main.feature"), body).expect("write feature");
            }
            None => std::fs::create_dir_all(&app).expect("create app"),
        }
    }
    (tmp, root)
}

fn bdd_suite() -> Command {
    Command::cargo_bin("bdd-suite").expect("binary built")
}

#[test]
fn apps_lists_applications_and_feature_dirs() {
    let (_tmp, root) = scaffold(&[("blog", Some(WISHLIST_FEATURE)), ("plain", None)]);
    let output = bdd_suite()
        .args(["apps", "--root", root.as_str()])
        .output()
        .expect("run apps");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("blog\t{}", root.join("blog").join("features"))));
    assert!(stdout.contains("plain\t-"));
}

#[test]
fn run_reports_undefined_steps_and_exits_nonzero() {
    // The CLI binary links no step definitions, so every step is undefined
    // and the run produces scaffolding snippets on the diagnostic stream.
    let (_tmp, root) = scaffold(&[("blog", Some(WISHLIST_FEATURE))]);
    let output = bdd_suite()
        .args(["run", "--root", root.as_str(), "--plain", "--no-server"])
        .output()
        .expect("run suite");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("step!(StepKeyword::Given, \"an unwritten wishlist step\""));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("failed: features:blog"));
}

#[test]
fn run_over_an_empty_features_dir_is_a_fatal_configuration_error() {
    let (_tmp, root) = scaffold(&[]);
    std::fs::create_dir_all(root.join("empty").join("features")).expect("create features");
    let output = bdd_suite()
        .args(["run", "--root", root.as_str(), "--no-server"])
        .output()
        .expect("run suite");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fatal: configuration error"));
}

#[test]
fn snippets_can_be_suppressed() {
    let (_tmp, root) = scaffold(&[("blog", Some(WISHLIST_FEATURE))]);
    let output = bdd_suite()
        .args([
            "run",
            "--root",
            root.as_str(),
            "--no-server",
            "--no-snippets",
        ])
        .output()
        .expect("run suite");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("step!("));
}
