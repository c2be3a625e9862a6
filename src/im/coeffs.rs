// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Replacing `.im` polynomial coefficients with closed-loop coefficients.

use std::ops::{AddAssign, Range};

use itertools::Itertools;
use log::trace;

use super::{key_value, ImFile, ImReadError, ImRecord, ModelQuantity};
use crate::poly::PolySegment;

/// Counts of updated coefficient lines, per quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoefficientUpdates {
    pub delay: usize,
    pub u: usize,
    pub v: usize,
    pub w: usize,
}

impl CoefficientUpdates {
    pub fn total(&self) -> usize {
        self.delay + self.u + self.v + self.w
    }

    fn count(&mut self, quantity: ModelQuantity) {
        match quantity {
            ModelQuantity::Delay => self.delay += 1,
            ModelQuantity::U => self.u += 1,
            ModelQuantity::V => self.v += 1,
            ModelQuantity::W => self.w += 1,
        }
    }
}

impl AddAssign for CoefficientUpdates {
    fn add_assign(&mut self, rhs: Self) {
        self.delay += rhs.delay;
        self.u += rhs.u;
        self.v += rhs.v;
        self.w += rhs.w;
    }
}

/// Format a float like C's "%.16e", e.g. "-2.1234500000000000e-05".
pub(crate) fn format_coefficient(value: f64) -> String {
    let s = format!("{value:.16e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) if value.is_finite() => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        _ => s,
    }
}

/// Merge closed-loop coefficients into `.im` coefficients, up to the length of
/// the shorter of the two. u,v,w coefficients are replaced. The constant delay
/// term is kept (it holds the coarse delay of the model) and the higher delay
/// terms are replaced by the negated closed-loop terms.
pub(crate) fn merge_coefficients(
    quantity: ModelQuantity,
    old: &[f64],
    correction: &[f64],
) -> Vec<f64> {
    let mut new = old.to_vec();
    for (k, (c, &corr)) in new.iter_mut().zip(correction).enumerate() {
        match quantity {
            ModelQuantity::Delay if k == 0 => (),
            ModelQuantity::Delay => *c = -corr,
            ModelQuantity::U | ModelQuantity::V | ModelQuantity::W => *c = corr,
        }
    }
    new
}

fn parse_coefficients(value: &str, line_num: usize) -> Result<Vec<f64>, ImReadError> {
    value
        .split('\t')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ImReadError::ParseFloat {
                line_num,
                value: s.to_string(),
            })
        })
        .collect()
}

impl ImFile {
    /// Replace the delay and u,v,w coefficients of telescope `telescope_id`
    /// within `lines` with those of the closed-loop polynomials.
    pub fn apply_corrections(
        &mut self,
        telescope_id: u32,
        lines: Range<usize>,
        delay: &PolySegment,
        uvw: &PolySegment,
    ) -> Result<CoefficientUpdates, ImReadError> {
        let mut updates = CoefficientUpdates::default();
        let end = lines.end.min(self.lines.len());
        for i in lines.start..end {
            let quantity = match self.records[i] {
                ImRecord::Coefficients { antenna, quantity } if antenna == telescope_id => {
                    quantity
                }
                _ => continue,
            };
            let (key, value) = match key_value(&self.lines[i]) {
                Some(kv) => kv,
                None => continue,
            };

            let old = parse_coefficients(value, i + 1)?;
            let correction = match quantity {
                ModelQuantity::Delay => delay.column(quantity.axis()),
                ModelQuantity::U | ModelQuantity::V | ModelQuantity::W => {
                    uvw.column(quantity.axis())
                }
            };
            let new = merge_coefficients(quantity, &old, &correction);
            let new_line = format!(
                "{key}:  {}",
                new.iter()
                    .map(|&c| format!("{}\t ", format_coefficient(c)))
                    .join(" ")
            );
            trace!("line {}: {} -> {new_line}", i + 1, self.lines[i]);

            self.lines[i] = new_line;
            updates.count(quantity);
        }

        Ok(updates)
    }
}
