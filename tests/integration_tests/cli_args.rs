// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface.

use tempfile::TempDir;

use crate::{closedloop, get_closedloop_files, get_cmd_output, Files};

#[test]
fn test_closedloop_help_is_correct() {
    let mut stdouts = vec![];

    // First with --help
    let cmd = closedloop().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    // Then with -h
    let cmd = closedloop().arg("-h").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    for stdout in stdouts {
        for s in [
            "DELAY_POLYS",
            "UVW_POLYS",
            "IM_FILES",
            "--drate",
            "--dt",
            "--maxorder",
            "--antenna",
            "--args-file",
            "--dry-run",
        ] {
            assert!(stdout.contains(s), "'{s}' isn't in the help text");
        }
    }
}

#[test]
fn test_no_args_prints_help() {
    let cmd = closedloop().ok();
    assert!(cmd.is_err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(
        stdout.contains("DELAY_POLYS") || stderr.contains("DELAY_POLYS"),
        "{stdout}\n{stderr}"
    );
}

#[test]
fn test_missing_im_files_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        ..
    } = get_closedloop_files(tmp_dir.path());

    let cmd = closedloop().args([&delay_polys, &uvw_polys]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: No .im files"), "{stderr}");
}

#[test]
fn test_swapped_polys_are_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());

    let cmd = closedloop().args([&uvw_polys, &delay_polys, &im]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("dimensions mismatch"), "{stderr}");
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());
}

#[test]
fn test_save_toml_then_use_it() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());
    let toml = tmp_dir.path().join("args.toml");
    let toml_str = toml.display().to_string();

    #[rustfmt::skip]
    let cmd = closedloop()
        .args([
            &delay_polys, &uvw_polys, &im,
            "--maxorder", "2",
            "--save-toml", &toml_str,
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(toml.exists());
    let contents = std::fs::read_to_string(&toml).unwrap();
    assert!(contents.contains("max_order = 2"), "{contents}");
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());

    let cmd = closedloop().args(["--args-file", &toml_str]).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(tmp_dir.path().join("job_1.im.closedloop").exists());
}
