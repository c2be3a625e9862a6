// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use crate::{
    closedloop, closedloop_coefficients, coefficients_with, get_closedloop_files,
    get_cmd_output, Files,
};

#[test]
fn test_patch_gt() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());

    let cmd = closedloop()
        .args([&delay_polys, &uvw_polys, &im, "--antenna", "GT"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Success: processed"), "{stdout}");
    // The second scan has no matching closed-loop polynomial.
    assert!(
        stdout.contains("No suitable closed-loop polynomial to match MJD 58045 sec 33000"),
        "{stdout}"
    );

    let output = tmp_dir.path().join("job_1.im.closedloop");
    assert!(output.exists());
    let original = std::fs::read_to_string(&im).unwrap();
    let patched = std::fs::read_to_string(&output).unwrap();
    assert_eq!(original.lines().count(), patched.lines().count());

    let dly = closedloop_coefficients(&std::fs::read_to_string(&delay_polys).unwrap(), 0);
    let uvw_contents = std::fs::read_to_string(&uvw_polys).unwrap();
    let uvw: Vec<_> = (0..3)
        .map(|dim| closedloop_coefficients(&uvw_contents, dim))
        .collect();

    // Telescope GT has id 1. Two of its polynomials are patched, and the third
    // (in the second scan) is not.
    let old_delays = coefficients_with(&original, "ANT 1 DELAY (us)");
    let new_delays = coefficients_with(&patched, "ANT 1 DELAY (us)");
    assert_eq!(new_delays.len(), 3);
    for (i_poly, (old, new)) in old_delays.iter().zip(new_delays.iter()).take(2).enumerate() {
        assert_eq!(new.len(), 6);
        // The constant term is kept.
        assert_abs_diff_eq!(new[0], old[0]);
        for k in 1..4 {
            assert_abs_diff_eq!(new[k], -dly[i_poly][k] * 1e6, epsilon = 1e-12);
        }
        // Terms beyond the closed-loop polynomial are untouched.
        assert_abs_diff_eq!(new[4], old[4]);
        assert_abs_diff_eq!(new[5], old[5]);
    }
    assert_eq!(old_delays[2], new_delays[2]);

    for (dim, key) in ["ANT 1 U (m)", "ANT 1 V (m)", "ANT 1 W (m)"].into_iter().enumerate() {
        let old = coefficients_with(&original, key);
        let new = coefficients_with(&patched, key);
        assert_eq!(new.len(), 3);
        for i_poly in 0..2 {
            for k in 0..4 {
                assert_abs_diff_eq!(new[i_poly][k], uvw[dim][i_poly][k], epsilon = 1e-6);
            }
            assert_abs_diff_eq!(new[i_poly][4], old[i_poly][4]);
            assert_abs_diff_eq!(new[i_poly][5], old[i_poly][5]);
        }
        assert_eq!(old[2], new[2]);
    }

    // Nothing else changes.
    for key in [
        "ANT 0 DELAY (us)",
        "ANT 0 U (m)",
        "ANT 0 W (m)",
        "ANT 1 DRY (us)",
        "ANT 1 WET (us)",
        "ANT 1 AZ",
        "ANT 1 EL GEOM",
    ] {
        assert_eq!(
            coefficients_with(&original, key),
            coefficients_with(&patched, key),
            "{key} changed"
        );
    }
    for (old, new) in original.lines().zip(patched.lines()) {
        if !old.starts_with("SRC") {
            assert_eq!(old.trim_end(), new.trim_end());
        }
    }
}

#[test]
fn test_patch_ef() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());

    // Telescope names are matched without regard to case.
    let cmd = closedloop()
        .args([&delay_polys, &uvw_polys, &im, "-a", "ef"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let original = std::fs::read_to_string(&im).unwrap();
    let patched =
        std::fs::read_to_string(tmp_dir.path().join("job_1.im.closedloop")).unwrap();
    assert_ne!(
        coefficients_with(&original, "ANT 0 U (m)"),
        coefficients_with(&patched, "ANT 0 U (m)")
    );
    assert_eq!(
        coefficients_with(&original, "ANT 1 U (m)"),
        coefficients_with(&patched, "ANT 1 U (m)")
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());

    let cmd = closedloop()
        .args([&delay_polys, &uvw_polys, &im, "--dry-run"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());
}

#[test]
fn test_source_mismatch_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());
    let contents = std::fs::read_to_string(&im)
        .unwrap()
        .replace("SCAN 0 POINTING SRC:0716+714", "SCAN 0 POINTING SRC:3C279");
    std::fs::write(&im, contents).unwrap();

    // Failing to patch a file is not fatal to the run.
    let cmd = closedloop().args([&delay_polys, &uvw_polys, &im]).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("3C279"), "{stdout}");
    assert!(stdout.contains("failed to patch"), "{stdout}");
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());
}

#[test]
fn test_misaligned_start_second_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        delay_polys,
        uvw_polys,
        im,
    } = get_closedloop_files(tmp_dir.path());
    let contents = std::fs::read_to_string(&im)
        .unwrap()
        .replace("START SECOND:       0", "START SECOND:       30");
    std::fs::write(&im, contents).unwrap();

    let cmd = closedloop().args([&delay_polys, &uvw_polys, &im]).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("extend the scan length by"), "{stdout}");
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());
}

#[test]
fn test_missing_correction_file_is_fatal() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files { uvw_polys, im, .. } = get_closedloop_files(tmp_dir.path());
    let missing = tmp_dir.path().join("missing.txt").display().to_string();

    let cmd = closedloop().args([&missing, &uvw_polys, &im]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(stderr.contains("missing.txt"), "{stderr}");
    assert!(!tmp_dir.path().join("job_1.im.closedloop").exists());
}
