// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod cli_args;
mod patch;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn closedloop() -> Command {
    Command::cargo_bin("closedloop").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

struct Files {
    delay_polys: String,
    uvw_polys: String,
    im: String,
}

/// Copy the closed-loop test files into `tmp_dir`, so that patched files are
/// written there too. The .im file has two scans; the first has two
/// polynomials matching the closed-loop polynomials, the second has one
/// polynomial without a match. Telescope "GT" has id 1.
fn get_closedloop_files(tmp_dir: &Path) -> Files {
    // Use absolute paths.
    let test_files = PathBuf::from("test_files/closedloop")
        .canonicalize()
        .unwrap();

    let copy = |name: &str| {
        let src = test_files.join(name);
        assert!(
            src.exists(),
            "Could not find {}, which is required for this test",
            src.display()
        );
        let dest = tmp_dir.join(name);
        std::fs::copy(&src, &dest).unwrap();
        dest.display().to_string()
    };

    Files {
        delay_polys: copy("dly_polys.txt"),
        uvw_polys: copy("uvw_polys.txt"),
        im: copy("job_1.im"),
    }
}

/// Get the coefficients of every line with `key`, in file order.
fn coefficients_with(contents: &str, key: &str) -> Vec<Vec<f64>> {
    contents
        .lines()
        .filter(|l| l.contains(key))
        .map(|l| {
            l.split_once(':')
                .unwrap()
                .1
                .split('\t')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse().unwrap())
                .collect()
        })
        .collect()
}

/// Get the closed-loop coefficients of a dimension of every polynomial in a
/// closed-loop file, without any scaling.
fn closedloop_coefficients(contents: &str, dim: usize) -> Vec<Vec<f64>> {
    let mut polys = vec![];
    for line in contents.lines() {
        if line.starts_with("source") {
            polys.push(vec![]);
        } else if line.starts_with('P') {
            let value = line.rsplit('=').next().unwrap();
            let c: f64 = value.split(',').nth(dim).unwrap().trim().parse().unwrap();
            polys.last_mut().unwrap().push(c);
        }
    }
    polys
}
