// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading, scanning and patching of DiFX/CALC `.im` files.
//!
//! A `.im` file is a list of "KEY:  VALUE" lines. After a header, each scan
//! looks something like:
//!
//! ```text
//! SCAN 0 POINTING SRC:0716+714
//! SCAN 0 NUM PHS CTRS:1
//! SCAN 0 PHS CTR 0 SRC:0716+714
//! SCAN 0 NUM POLY:    2
//! SCAN 0 POLY 0 MJD:  58045
//! SCAN 0 POLY 0 SEC:  32400
//! SRC 0 ANT 0 DELAY (us):  -2.1e+03	 1.2e-01	 ...
//! SRC 0 ANT 0 U (m):  ...
//! ...
//! SCAN 0 POLY 1 MJD:  58045
//! SCAN 0 POLY 1 SEC:  32520
//! ...
//! ```

mod blocks;
mod coeffs;
mod error;
mod records;

pub use blocks::{PolyBlock, ScanBlock};
pub use coeffs::CoefficientUpdates;
pub(crate) use coeffs::format_coefficient;
pub use error::ImReadError;
pub use records::{ImRecord, ModelQuantity};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::trace;

use crate::constants::MIN_IM_LINES;

/// Split a "key: value" line into its trimmed key and value.
pub(crate) fn key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(':').map(|(k, v)| (k.trim(), v.trim()))
}

/// Get the index of the first line at or after `start` that contains all of
/// `keys`. If there is no such line, the number of lines is returned.
pub fn find_line_with<S: AsRef<str>>(lines: &[S], start: usize, keys: &[&str]) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| keys.iter().all(|k| line.as_ref().contains(k)))
        .map(|(i, _)| i)
        .unwrap_or(lines.len())
}

/// Get the (1-indexed) line number and value of the first line with `key`.
fn find_value<'a>(
    lines: &'a [String],
    key: &'static str,
) -> Result<(usize, &'a str), ImReadError> {
    let i = find_line_with(lines, 0, &[key]);
    lines
        .get(i)
        .and_then(|l| key_value(l))
        .map(|(_, v)| (i + 1, v))
        .ok_or(ImReadError::MissingKey { key })
}

/// The parts of a `.im` file header needed to patch it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImHeader {
    /// The "START SECOND" of the model.
    pub start_second: f64,

    /// The id of the requested telescope, if it's in the file.
    pub telescope_id: Option<u32>,

    /// The "POLYNOMIAL ORDER" of the model.
    pub poly_order: usize,

    /// The "INTERVAL (SECS)" of each model polynomial.
    pub poly_interval: u32,
}

/// The lines of a `.im` file, and what each of them is.
#[derive(Debug, Clone)]
pub struct ImFile {
    lines: Vec<String>,
    records: Vec<ImRecord>,
}

impl ImFile {
    /// Read a `.im` file. Every line is trimmed of surrounding whitespace.
    pub fn read<P: AsRef<Path>>(file: P) -> Result<ImFile, ImReadError> {
        let file = file.as_ref();
        let contents = std::fs::read_to_string(file)?;
        let lines: Vec<String> = contents.lines().map(|l| l.trim().to_string()).collect();
        if lines.len() < MIN_IM_LINES {
            return Err(ImReadError::TooShort {
                file: file.display().to_string(),
                num_lines: lines.len(),
            });
        }
        Self::from_lines(lines)
    }

    pub fn from_lines(lines: Vec<String>) -> Result<ImFile, ImReadError> {
        let records = lines
            .iter()
            .enumerate()
            .map(|(i, line)| ImRecord::tokenise(line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        trace!("Tokenised {} .im lines", lines.len());
        Ok(ImFile { lines, records })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn records(&self) -> &[ImRecord] {
        &self.records
    }

    /// Get the header information, including the id of the telescope named
    /// `antenna` (compared case-insensitively).
    pub fn header(&self, antenna: &str) -> Result<ImHeader, ImReadError> {
        let lines = &self.lines;

        let (line_num, value) = find_value(lines, "START SECOND")?;
        let start_second: f64 = value.parse().map_err(|_| ImReadError::ParseFloat {
            line_num,
            value: value.to_string(),
        })?;

        let parse_int = |key: &'static str| -> Result<i64, ImReadError> {
            let (line_num, value) = find_value(lines, key)?;
            value.parse().map_err(|_| ImReadError::ParseInt {
                line_num,
                key: key.to_string(),
                value: value.to_string(),
            })
        };
        let poly_order = parse_int("POLYNOMIAL ORDER")?;
        let poly_order = usize::try_from(poly_order).map_err(|_| ImReadError::NotPositive {
            key: "POLYNOMIAL ORDER",
            value: poly_order,
        })?;
        let poly_interval = parse_int("INTERVAL (SECS)")?;
        let poly_interval = match u32::try_from(poly_interval) {
            Ok(i) if i > 0 => i,
            _ => {
                return Err(ImReadError::NotPositive {
                    key: "INTERVAL (SECS)",
                    value: poly_interval,
                })
            }
        };

        // e.g. "TELESCOPE 0 NAME:   GT"
        let mut telescope_id = None;
        let mut i = find_line_with(lines, 0, &["TELESCOPE", "NAME"]);
        while i < lines.len() {
            if let Some((key, name)) = key_value(&lines[i]) {
                if name.eq_ignore_ascii_case(antenna) {
                    telescope_id = key
                        .split_ascii_whitespace()
                        .nth(1)
                        .and_then(|id| id.parse().ok());
                    if telescope_id.is_some() {
                        break;
                    }
                }
            }
            i = find_line_with(lines, i + 1, &["TELESCOPE", "NAME"]);
        }

        Ok(ImHeader {
            start_second,
            telescope_id,
            poly_order,
            poly_interval,
        })
    }

    /// Find all scans and their polynomials.
    pub fn scan_blocks(&self) -> Vec<ScanBlock> {
        blocks::scan_blocks(&self.records)
    }

    /// Write all lines to `file`.
    pub fn write<P: AsRef<Path>>(&self, file: P) -> Result<(), std::io::Error> {
        let mut f = BufWriter::new(File::create(file)?);
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        f.flush()
    }
}
