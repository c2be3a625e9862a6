// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Classification of `.im` file lines.

use std::str::FromStr;

use itertools::Itertools;
use strum_macros::{Display, EnumString};

use super::{key_value, ImReadError};

/// A polynomial quantity of the `.im` file that closed-loop polynomials can
/// replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ModelQuantity {
    #[strum(serialize = "DELAY (us)")]
    Delay,
    #[strum(serialize = "U (m)")]
    U,
    #[strum(serialize = "V (m)")]
    V,
    #[strum(serialize = "W (m)")]
    W,
}

impl ModelQuantity {
    /// The column of the closed-loop polynomial holding this quantity.
    pub(crate) fn axis(self) -> usize {
        match self {
            ModelQuantity::Delay | ModelQuantity::U => 0,
            ModelQuantity::V => 1,
            ModelQuantity::W => 2,
        }
    }
}

fn parse_int<T: FromStr>(key: &str, value: &str, line_num: usize) -> Result<T, ImReadError> {
    value.parse().map_err(|_| ImReadError::ParseInt {
        line_num,
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// A single line of a `.im` file, as far as patching is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImRecord {
    /// "SCAN <n> POINTING SRC: <source>"; the start of a scan.
    ScanSource { source: String },

    /// "SCAN <n> POLY <m> MJD: <mjd>"; the first half of a polynomial header.
    PolyMjd { mjd: i32 },

    /// "SCAN <n> POLY <m> SEC: <sec>"; the second half of a polynomial header.
    PolySec { sec: i64 },

    /// "[SRC <p>] ANT <a> <quantity>: <coefficients>".
    Coefficients {
        antenna: u32,
        quantity: ModelQuantity,
    },

    Other,
}

impl ImRecord {
    /// Classify a line. `line_num` is only used for error messages.
    pub(crate) fn tokenise(line: &str, line_num: usize) -> Result<ImRecord, ImReadError> {
        let (key, value) = match key_value(line) {
            Some(kv) => kv,
            None => return Ok(ImRecord::Other),
        };

        let record = if key.contains("SCAN") && key.contains("POINTING SRC") {
            ImRecord::ScanSource {
                source: value.to_string(),
            }
        } else if key.contains("POLY") && key.contains("MJD") {
            ImRecord::PolyMjd {
                mjd: parse_int(key, value, line_num)?,
            }
        } else if key.contains("POLY") && key.contains("SEC") {
            ImRecord::PolySec {
                sec: parse_int(key, value, line_num)?,
            }
        } else {
            let mut words = key.split_ascii_whitespace();
            if words.by_ref().any(|w| w == "ANT") {
                let antenna = words.next().and_then(|a| a.parse().ok());
                let label = words.join(" ");
                match (antenna, ModelQuantity::from_str(&label)) {
                    (Some(antenna), Ok(quantity)) => ImRecord::Coefficients { antenna, quantity },
                    _ => ImRecord::Other,
                }
            } else {
                ImRecord::Other
            }
        };
        Ok(record)
    }

    /// Does this record end a polynomial's coefficient lines?
    pub(crate) fn is_block_marker(&self) -> bool {
        matches!(
            self,
            ImRecord::ScanSource { .. } | ImRecord::PolyMjd { .. } | ImRecord::PolySec { .. }
        )
    }
}
