// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with patching a single `.im` file.

use thiserror::Error;

use crate::im::ImReadError;

#[derive(Error, Debug)]
pub enum PatchImError {
    #[error(transparent)]
    Read(#[from] ImReadError),

    #[error("Couldn't find telescope '{antenna}' in {file}")]
    TelescopeNotFound { antenna: String, file: String },

    #[error("The .im polynomial validity interval ({im_interval} s) is too long to apply closed-loop polynomials valid for {correction_interval} s")]
    IntervalTooShort {
        im_interval: u32,
        correction_interval: f64,
    },

    #[error("The .im model starts at second {im_start_second}, but the closed-loop polynomials start at second {correction_start_second}
Polynomial time shifting isn't supported. Please edit these files and re-run calcif3 and patching:
    .calc  file: set START SECOND to 0 or a multiple of {interval} s
    .input file: adjust START SECONDS to fall on a 0 s or {interval} s boundary
or alternatively edit
    .vex   file: adjust the scan start to fall on a 0 s or {interval} s boundary
                 and extend the scan length by {offset} seconds")]
    StartSecondMisaligned {
        im_start_second: f64,
        correction_start_second: u8,
        interval: u32,
        offset: f64,
    },

    #[error("The closed-loop delay polynomial source '{delay_source}' doesn't match the u,v,w polynomial source '{uvw_source}' (MJD {mjd} sec {sec})")]
    DelayUvwSourceMismatch {
        delay_source: String,
        uvw_source: String,
        mjd: i32,
        sec: i64,
    },

    #[error("The .im scan source '{scan_source}' doesn't match the closed-loop polynomial source '{poly_source}' (MJD {mjd} sec {sec})")]
    SourceMismatch {
        scan_source: String,
        poly_source: String,
        mjd: i32,
        sec: i64,
    },

    #[error("Couldn't write {file}: {err}")]
    Write { file: String, err: std::io::Error },
}
