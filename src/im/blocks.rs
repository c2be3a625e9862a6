// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Detection of scans and their polynomials in a `.im` file.

use std::ops::Range;

use super::ImRecord;

/// The coefficient lines of a single `.im` polynomial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyBlock {
    pub mjd: i32,
    pub sec: i64,

    /// The lines after the "POLY <m> SEC" line, up to (but excluding) the next
    /// scan or polynomial header.
    pub lines: Range<usize>,
}

/// A single `.im` scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanBlock {
    /// The pointing source of the scan.
    pub source: String,

    /// From the "POINTING SRC" line up to (but excluding) the next scan.
    pub lines: Range<usize>,

    pub polys: Vec<PolyBlock>,
}

impl ScanBlock {
    /// The MJD and second of the scan's first polynomial, if there is one.
    pub fn epoch(&self) -> Option<(i32, i64)> {
        self.polys.first().map(|p| (p.mjd, p.sec))
    }
}

/// Walk over the records of a `.im` file once, collecting scans and their
/// polynomials. A polynomial needs its "MJD" record followed by its "SEC"
/// record; an "SEC" without an "MJD", or anything before the first scan, is
/// ignored.
pub(super) fn scan_blocks(records: &[ImRecord]) -> Vec<ScanBlock> {
    let mut scans = vec![];
    let mut scan: Option<ScanBlock> = None;
    let mut poly: Option<PolyBlock> = None;
    let mut pending_mjd: Option<i32> = None;

    for (i, record) in records.iter().enumerate() {
        // Any header ends the coefficients of the current polynomial.
        if record.is_block_marker() {
            if let (Some(scan), Some(mut p)) = (scan.as_mut(), poly.take()) {
                p.lines.end = i;
                scan.polys.push(p);
            }
        }

        match record {
            ImRecord::ScanSource { source } => {
                if let Some(mut s) = scan.take() {
                    s.lines.end = i;
                    scans.push(s);
                }
                scan = Some(ScanBlock {
                    source: source.clone(),
                    lines: i..i,
                    polys: vec![],
                });
                pending_mjd = None;
            }

            ImRecord::PolyMjd { mjd } => pending_mjd = Some(*mjd),

            ImRecord::PolySec { sec } => {
                if let (Some(_), Some(mjd)) = (scan.as_ref(), pending_mjd.take()) {
                    poly = Some(PolyBlock {
                        mjd,
                        sec: *sec,
                        lines: i + 1..i + 1,
                    });
                }
            }

            ImRecord::Coefficients { .. } | ImRecord::Other => (),
        }
    }

    let end = records.len();
    if let Some(mut s) = scan {
        if let Some(mut p) = poly {
            p.lines.end = end;
            s.polys.push(p);
        }
        s.lines.end = end;
        scans.push(s);
    }

    scans
}
