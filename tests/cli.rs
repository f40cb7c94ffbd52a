// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::Command;
use image::GenericImageView;
use predicates::prelude::*;

fn julia() -> Command {
    Command::cargo_bin("julia").unwrap()
}

#[test]
fn renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("julia.png");
    julia()
        .args(&["--size", "64x48", "--threads", "4", "--frames", "3", "--zoom", "0.9"])
        .arg("--output")
        .arg(&path)
        .assert()
        .success();

    let frame = image::open(&path).unwrap();
    assert_eq!(frame.dimensions(), (64, 48));
}

#[test]
fn accepts_custom_keys_and_constant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.png");
    julia()
        .args(&["-s", "16x16", "-i", "50", "--no-smoothing"])
        .args(&["--constant=-0.4,0.6", "-k", "0:000000", "-k", "50:ffffff"])
        .arg("-o")
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn rejects_an_empty_frame() {
    julia()
        .args(&["--size", "0x10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame size must be non-zero"));
}

#[test]
fn rejects_a_bad_key() {
    julia()
        .args(&["--key", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse gradient key"));
}

#[test]
fn rejects_zero_threads() {
    julia().args(&["--threads", "0"]).assert().failure();
}
