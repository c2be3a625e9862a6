// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A single closed-loop polynomial.

use hifitime::Epoch;
use log::trace;

use super::CorrectionReadError;
use crate::{math::PolyShifter, time::parse_correction_time};

/// A single polynomial valid between `start` and `stop`. `coeffs[k]` holds
/// the coefficients of the t^k term, one per dimension (1 for a delay, 3 for
/// u,v,w). All coefficients have already been multiplied by `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolySegment {
    pub source: String,
    pub start: Epoch,
    pub stop: Epoch,
    pub(crate) coeffs: Vec<Vec<f64>>,
    pub(crate) scale: f64,
}

/// Everything after the last '=' of a "key = value" line.
fn value_of(line: &str) -> &str {
    line.rsplit('=').next().unwrap_or_default().trim()
}

impl PolySegment {
    /// Parse a polynomial from its lines in a closed-loop file:
    ///
    /// ```text
    /// source = 0716+714
    /// start = 19/10/2017 09h00m00s
    /// stop = 19/10/2017 09h01m00s
    /// P0 = -1.00975710299507e-001, -2.49717010234864e-001, 5.28185040398344e-001
    /// P1 = 9.18124737968820e-007, -4.59083189789325e-006, 1.99785028077570e-006
    /// ```
    ///
    /// `first_line_num` is the (1-indexed) line number of the source line, and
    /// is only used for error messages.
    pub fn parse<S: AsRef<str>>(
        lines: &[S],
        first_line_num: usize,
        scale: f64,
    ) -> Result<PolySegment, CorrectionReadError> {
        if lines.len() < 4 {
            return Err(CorrectionReadError::TooFewLines {
                line_num: first_line_num,
                got: lines.len(),
            });
        }

        let parse_time = |line: &str, line_num: usize| {
            let string = value_of(line);
            parse_correction_time(string).map_err(|_| CorrectionReadError::ParseTime {
                line_num,
                string: string.to_string(),
            })
        };

        let source = value_of(lines[0].as_ref()).to_string();
        let start = parse_time(lines[1].as_ref(), first_line_num + 1)?;
        let stop = parse_time(lines[2].as_ref(), first_line_num + 2)?;

        let mut coeffs: Vec<Vec<f64>> = Vec::with_capacity(lines.len() - 3);
        for (i, line) in lines[3..].iter().enumerate() {
            let line_num = first_line_num + 3 + i;
            let term = value_of(line.as_ref())
                .split(',')
                .map(|s| {
                    s.trim()
                        .parse::<f64>()
                        .map(|c| c * scale)
                        .map_err(|_| CorrectionReadError::ParseFloat {
                            line_num,
                            string: s.trim().to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            if let Some(first) = coeffs.first() {
                if first.len() != term.len() {
                    return Err(CorrectionReadError::DimensionMismatch {
                        line_num,
                        expected: first.len(),
                        got: term.len(),
                    });
                }
            }
            coeffs.push(term);
        }

        Ok(PolySegment {
            source,
            start,
            stop,
            coeffs,
            scale,
        })
    }

    /// The number of polynomial terms (the polynomial order + 1).
    pub fn num_coeffs(&self) -> usize {
        self.coeffs.len()
    }

    /// The number of dimensions of each term (1 for delays, 3 for u,v,w).
    pub fn dims(&self) -> usize {
        self.coeffs.first().map(|c| c.len()).unwrap_or(0)
    }

    /// The validity interval of this polynomial [seconds].
    pub fn interval(&self) -> f64 {
        (self.stop - self.start).to_seconds()
    }

    /// Does this polynomial's validity window strictly contain `t`?
    pub fn contains(&self, t: Epoch) -> bool {
        self.start < t && t < self.stop
    }

    /// All coefficients, indexed by term then by dimension.
    pub fn coeffs(&self) -> &[Vec<f64>] {
        &self.coeffs
    }

    /// The coefficients of a single dimension, from the constant term up.
    pub fn column(&self, dim: usize) -> Vec<f64> {
        self.coeffs.iter().filter_map(|c| c.get(dim).copied()).collect()
    }

    /// Add `corrections[k]` to every dimension of the t^k term. Terms without
    /// a correction (and corrections without a term) are left alone.
    pub fn add(&mut self, corrections: &[f64]) {
        for (term, &correction) in self.coeffs.iter_mut().zip(corrections) {
            term.iter_mut().for_each(|c| *c += correction);
        }
    }

    /// Zero all terms of order higher than `max_order` (0 keeps only the
    /// constant, 1 keeps the constant and linear terms, etc.).
    pub fn truncate(&mut self, max_order: usize) {
        for term in self.coeffs.iter_mut().skip(max_order + 1) {
            term.iter_mut().for_each(|c| *c = 0.0);
        }
    }

    /// Change the coefficients such that the new polynomial evaluated at t is
    /// the old polynomial evaluated at t + dt. `dt` is multiplied by the same
    /// scale as the coefficients were when they were read.
    pub fn time_shift(&mut self, dt: f64) {
        if dt == 0.0 {
            return;
        }

        let dt = dt * self.scale;
        let shifter = PolyShifter::new(self.num_coeffs(), dt);
        for dim in 0..self.dims() {
            let old = self.column(dim);
            let new = shifter.shift(&old);
            trace!("{} dim {dim}: old {old:?}", self.source);
            trace!("{} dim {dim}: new {new:?}", self.source);
            for (term, c) in self.coeffs.iter_mut().zip(new) {
                term[dim] = c;
            }
        }
    }
}
