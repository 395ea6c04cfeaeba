#![allow(deprecated)] // Command::cargo_bin

use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn grid_compose() -> Command {
    Command::cargo_bin("grid_compose").expect("binary not built")
}

fn fixture(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    RgbImage::from_pixel(40, 30, Rgb([90, 160, 60]))
        .save(&path)
        .expect("failed to write fixture");
    path.display().to_string()
}

#[test]
fn list_prints_every_preset() {
    let mut assert = grid_compose().arg("--list").assert().success();
    for name in ["task1", "task2", "task3", "task4", "extension", "gabor"] {
        assert = assert.stdout(predicate::str::contains(name));
    }
}

#[test]
fn a_source_is_required() {
    grid_compose().assert().failure();
}

#[test]
fn missing_figure_file_fails() {
    grid_compose()
        .args(["--figure", "/nonexistent/figure.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn unknown_preset_fails() {
    grid_compose()
        .args(["--preset", "task9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset"));
}

#[test]
fn print_resolves_preset_paths() {
    grid_compose()
        .args(["--preset", "task2", "--data-dir", "imgs", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RGB Histogram Matching:"))
        .stdout(predicate::str::contains("imgs/pic.0164.jpg"));
}

#[test]
fn figure_file_is_rendered_and_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = fixture(dir.path(), "target.png");
    let a = fixture(dir.path(), "a.png");
    let b = fixture(dir.path(), "b.png");
    let figure = serde_json::json!({
        "name": "cli",
        "output": dir.path().join("out/cli.png"),
        "sizing": { "mode": "square", "width": 100, "height": 100 },
        "target": { "path": target, "caption": "Target: target.png" },
        "groups": [
            { "label": "Method A:", "color": "#00ff00",
              "tiles": [ { "path": a, "caption": "a.png", "score": 0.25 },
                         { "path": b, "caption": "b.png" } ] }
        ],
        "footer": { "text": "done" }
    });
    let figure_path = dir.path().join("figure.json");
    std::fs::write(&figure_path, figure.to_string()).expect("write figure");

    grid_compose()
        .arg("--figure")
        .arg(&figure_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"))
        .stdout(predicate::str::contains("Size: 200x200 pixels"));

    let out = image::open(dir.path().join("out/cli.png")).expect("output missing");
    assert_eq!(out.to_rgb8().dimensions(), (200, 200));
}

#[test]
fn strict_mode_rejects_missing_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    let figure = serde_json::json!({
        "name": "strict",
        "output": dir.path().join("strict.png"),
        "sizing": { "mode": "square", "width": 10, "height": 10 },
        "target": { "path": dir.path().join("missing.jpg") }
    });
    let figure_path = dir.path().join("figure.json");
    std::fs::write(&figure_path, figure.to_string()).expect("write figure");

    grid_compose()
        .arg("--figure")
        .arg(&figure_path)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load"));

    grid_compose()
        .arg("--figure")
        .arg(&figure_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Placeholder used for"));
}
