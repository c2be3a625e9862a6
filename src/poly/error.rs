// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading closed-loop polynomial files.

use thiserror::Error;

use crate::constants::CORRECTION_FILE_MARKER;

/// Errors associated with reading a closed-loop polynomial file.
#[derive(Error, Debug)]
pub enum CorrectionReadError {
    #[error("The polynomial file is empty")]
    Empty,

    #[error("Unexpected polynomial file content; expected '{CORRECTION_FILE_MARKER}' on the first line, got '{got}'")]
    MissingMarker { got: String },

    #[error("Polynomial file line 2: Expected the number of coefficients as 'N=<int>', got '{got}'")]
    BadCoeffCount { got: String },

    #[error("Polynomial file line {line_num}: Expected a 'source' line to start a polynomial, got '{got}'")]
    MissingSource { line_num: usize, got: String },

    #[error("Polynomial file line {line_num}: A polynomial needs a source, a start, a stop and at least one coefficient line, but only {got} lines were available")]
    TooFewLines { line_num: usize, got: usize },

    #[error("Polynomial file line {line_num}: Couldn't parse '{string}' as a time like 'dd/mm/yyyy HHhMMmSSs'")]
    ParseTime { line_num: usize, string: String },

    #[error("Polynomial file line {line_num}: Couldn't parse '{string}' as a float")]
    ParseFloat { line_num: usize, string: String },

    #[error("Polynomial file line {line_num}: Expected {expected} coefficients per term (as on the P0 line), but got {got}")]
    DimensionMismatch {
        line_num: usize,
        expected: usize,
        got: usize,
    },

    #[error("No polynomials were found in the file")]
    NoPolynomials,

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
