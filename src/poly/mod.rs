// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Closed-loop correction polynomials.
//!
//! A closed-loop polynomial file looks like:
//!
//! ```text
//! RASTRON closed-loop coefficients
//! N=3
//! <ignored>
//! source = 0716+714
//! start = 19/10/2017 09h00m00s
//! stop = 19/10/2017 09h01m00s
//! P0 = 1.0
//! P1 = 2.0
//! P2 = 3.0
//! source = 0716+714
//! ...
//! ```
//!
//! i.e. a marker line, the number of coefficients per polynomial, and then
//! blocks of `3 + N` lines, one per polynomial.

mod error;
mod segment;

pub use error::CorrectionReadError;
pub use segment::PolySegment;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use hifitime::Epoch;
use log::{debug, warn};
use vec1::Vec1;

use crate::{
    constants::CORRECTION_FILE_MARKER,
    time::{epoch_from_mjd_sec, utc_seconds_field},
};

/// All of the polynomials of a closed-loop file, in file order.
#[derive(Debug, Clone)]
pub struct PolySet {
    segments: Vec1<PolySegment>,
}

impl PolySet {
    pub fn new(segments: Vec1<PolySegment>) -> PolySet {
        PolySet { segments }
    }

    /// Read a closed-loop polynomial file. All coefficients are multiplied by
    /// `scale`.
    pub fn read_file<P: AsRef<Path>>(file: P, scale: f64) -> Result<PolySet, CorrectionReadError> {
        let file = file.as_ref();
        debug!("Reading closed-loop polynomials from {}", file.display());
        let mut buf = BufReader::new(File::open(file)?);
        Self::parse(&mut buf, scale)
    }

    /// Parse a buffer containing a closed-loop polynomial file.
    pub fn parse<T: BufRead>(buf: &mut T, scale: f64) -> Result<PolySet, CorrectionReadError> {
        let lines = buf
            .lines()
            .map(|l| l.map(|l| l.trim().to_string()))
            .collect::<Result<Vec<String>, _>>()?;

        match lines.first() {
            None => return Err(CorrectionReadError::Empty),
            Some(l) if !l.contains(CORRECTION_FILE_MARKER) => {
                return Err(CorrectionReadError::MissingMarker { got: l.clone() })
            }
            _ => (),
        }
        let num_coeffs_line = lines.get(1).map(|s| s.as_str()).unwrap_or_default();
        let num_coeffs: usize = match num_coeffs_line.split_once('=') {
            Some((key, value)) if key.trim() == "N" => {
                value
                    .trim()
                    .parse()
                    .map_err(|_| CorrectionReadError::BadCoeffCount {
                        got: num_coeffs_line.to_string(),
                    })?
            }
            _ => {
                return Err(CorrectionReadError::BadCoeffCount {
                    got: num_coeffs_line.to_string(),
                })
            }
        };

        let mut segments = vec![];
        let mut i_line = 3;
        while i_line < lines.len() {
            let line = &lines[i_line];
            if line.is_empty() {
                i_line += 1;
                continue;
            }
            if !line.starts_with("source") {
                return Err(CorrectionReadError::MissingSource {
                    line_num: i_line + 1,
                    got: line.clone(),
                });
            }

            let end = (i_line + 3 + num_coeffs).min(lines.len());
            segments.push(PolySegment::parse(&lines[i_line..end], i_line + 1, scale)?);
            i_line = end;
        }

        let segments =
            Vec1::try_from_vec(segments).map_err(|_| CorrectionReadError::NoPolynomials)?;
        debug!(
            "Read {} polynomials with {num_coeffs} coefficients each",
            segments.len()
        );
        Ok(PolySet { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PolySegment] {
        &self.segments
    }

    /// The number of dimensions of the polynomials. The last polynomial is
    /// taken to be representative of all of them.
    pub fn dims(&self) -> usize {
        self.segments.last().dims()
    }

    /// The largest number of coefficients of any polynomial.
    pub fn max_num_coeffs(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.num_coeffs())
            .max()
            .unwrap_or(0)
    }

    /// The smallest seconds field (0 to 59) of all polynomial start times. This
    /// is only good for a coarse check that the polynomials are aligned with
    /// another set of polynomials.
    pub fn start_second(&self) -> u8 {
        self.segments
            .iter()
            .map(|s| utc_seconds_field(s.start))
            .min()
            .unwrap_or(0)
    }

    /// Find the polynomial that starts exactly on the given MJD and second of
    /// that day. Polynomials that start earlier but are still valid at this
    /// time are not used, because shifting them is not supported; a warning
    /// is logged and `None` is returned in that case.
    pub fn lookup(&self, mjd: i32, sec: i64) -> Option<&PolySegment> {
        let t = epoch_from_mjd_sec(mjd, sec)?;
        self.lookup_epoch(t, mjd, sec)
    }

    fn lookup_epoch(&self, t: Epoch, mjd: i32, sec: i64) -> Option<&PolySegment> {
        for segment in self.segments.iter() {
            if segment.start == t {
                return Some(segment);
            }
            if segment.contains(t) {
                let dt = (t - segment.start).to_seconds();
                warn!("Time MJD {mjd} sec {sec} ({t}) is not at the start of a closed-loop polynomial, but rather {dt} seconds into it");
                warn!("Shifting polynomials to match .im polynomial epochs is not supported");
                return None;
            }
        }
        None
    }

    /// Add `corrections[k]` to the t^k term of all polynomials.
    pub fn add(&mut self, corrections: &[f64]) {
        self.segments.iter_mut().for_each(|s| s.add(corrections));
    }

    /// Zero all terms of order higher than `max_order` in all polynomials.
    pub fn truncate(&mut self, max_order: usize) {
        self.segments.iter_mut().for_each(|s| s.truncate(max_order));
    }

    /// Time shift all polynomials from p(t) to p(t + dt).
    pub fn time_shift(&mut self, dt: f64) {
        self.segments.iter_mut().for_each(|s| s.time_shift(dt));
    }
}
