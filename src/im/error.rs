// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading `.im` files.

use thiserror::Error;

use crate::constants::MIN_IM_LINES;

#[derive(Error, Debug)]
pub enum ImReadError {
    #[error("Problem loading a valid {file}: it has {num_lines} lines, but at least {MIN_IM_LINES} are needed")]
    TooShort { file: String, num_lines: usize },

    #[error("Couldn't find the '{key}' key in the .im file")]
    MissingKey { key: &'static str },

    #[error("The .im file's '{key}' must be positive, but it is {value}")]
    NotPositive { key: &'static str, value: i64 },

    #[error(".im file line {line_num}: Couldn't parse '{value}' of '{key}' as an integer")]
    ParseInt {
        line_num: usize,
        key: String,
        value: String,
    },

    #[error(".im file line {line_num}: Couldn't parse '{value}' as a float")]
    ParseFloat { line_num: usize, value: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
