// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Test files and helpful functions.

use std::path::{Path, PathBuf};

use indoc::indoc;

/// A small `.im` file with one scan of one polynomial, for two telescopes.
pub(crate) const IM_FILE: &str = indoc! {"
    CALC SERVER:        NONE
    CALC PROGRAM:       0x20000341
    CALC VERSION:       9
    START YEAR:         2017
    START MONTH:        10
    START DAY:          19
    START HOUR:         9
    START MINUTE:       0
    START SECOND:       0
    POLYNOMIAL ORDER:   5
    INTERVAL (SECS):    60
    ABERRATION CORR:    EXACT
    NUM TELESCOPES:     2
    TELESCOPE 0 NAME:   GT
    TELESCOPE 1 NAME:   EF
    NUM SCANS:          1
    SCAN 0 POINTING SRC:0716+714
    SCAN 0 NUM PHS CTRS:1
    SCAN 0 PHS CTR 0 SRC:0716+714
    SCAN 0 NUM POLY:    1
    SCAN 0 POLY 0 MJD:  58045
    SCAN 0 POLY 0 SEC:  32400
    SRC 0 ANT 0 DELAY (us):  -2.0000000000000000e+03\t 1.0000000000000000e-01\t 2.0000000000000000e-06\t 3.0000000000000000e-09\t 4.0000000000000000e-12\t 5.0000000000000000e-15\t
    SRC 0 ANT 0 DRY (us):  1.0e-02\t 0.0e+00\t 0.0e+00\t 0.0e+00\t 0.0e+00\t 0.0e+00\t
    SRC 0 ANT 0 U (m):  5.0e+05\t 1.0e+00\t 1.0e-03\t 1.0e-06\t 1.0e-09\t 1.0e-12\t
    SRC 0 ANT 0 V (m):  6.0e+05\t 2.0e+00\t 2.0e-03\t 2.0e-06\t 2.0e-09\t 2.0e-12\t
    SRC 0 ANT 0 W (m):  7.0e+05\t 3.0e+00\t 3.0e-03\t 3.0e-06\t 3.0e-09\t 3.0e-12\t
    SRC 0 ANT 1 DELAY (us):  -1.0e+03\t 1.0e-01\t 1.0e-06\t 1.0e-09\t 1.0e-12\t 1.0e-15\t
    SRC 0 ANT 1 U (m):  1.0e+00\t 1.0e+00\t 1.0e+00\t 1.0e+00\t 1.0e+00\t 1.0e+00\t
"};

/// Closed-loop delay polynomials matching [`IM_FILE`] [seconds].
pub(crate) const DELAY_POLYS: &str = indoc! {"
    RASTRON closed-loop delay coefficients
    N=3
    ---------------------------------------
    source = 0716+714
    start = 19/10/2017 09h00m00s
    stop = 19/10/2017 09h01m00s
    P0 = 1.5e-3
    P1 = 2.0e-9
    P2 = -4.0e-15
"};

/// Closed-loop u,v,w polynomials matching [`IM_FILE`] [metres].
pub(crate) const UVW_POLYS: &str = indoc! {"
    RASTRON closed-loop u,v,w coefficients
    N=3
    ---------------------------------------
    source = 0716+714
    start = 19/10/2017 09h00m00s
    stop = 19/10/2017 09h01m00s
    P0 = 1.0e+06, 2.0e+06, 3.0e+06
    P1 = 10.0, 20.0, 30.0
    P2 = 0.125, 0.25, 0.5
"};

pub(crate) struct TestFiles {
    pub(crate) delay_polys: PathBuf,
    pub(crate) uvw_polys: PathBuf,
    pub(crate) im: PathBuf,
}

/// Write the closed-loop files and `<basename>.im` into `dir`, with the given
/// contents.
pub(crate) fn write_test_files(
    dir: &Path,
    basename: &str,
    im: &str,
    delay_polys: &str,
    uvw_polys: &str,
) -> TestFiles {
    let files = TestFiles {
        delay_polys: dir.join("dly_polys.txt"),
        uvw_polys: dir.join("uvw_polys.txt"),
        im: dir.join(format!("{basename}.im")),
    };
    std::fs::write(&files.delay_polys, delay_polys).unwrap();
    std::fs::write(&files.uvw_polys, uvw_polys).unwrap();
    std::fs::write(&files.im, im).unwrap();
    files
}

/// Parse the coefficients of the first line containing `key`.
pub(crate) fn coefficients_of(contents: &str, key: &str) -> Vec<f64> {
    let line = contents
        .lines()
        .find(|l| l.contains(key))
        .unwrap_or_else(|| panic!("no line with {key}"));
    line.split_once(':')
        .unwrap()
        .1
        .split('\t')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().unwrap())
        .collect()
}
