// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Patching a DiFX `.im` file with closed-loop polynomials.

mod error;

pub use error::PatchImError;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    constants::{CLOSEDLOOP_EXTENSION, DIFX_EXTENSIONS},
    im::{CoefficientUpdates, ImFile, ImHeader},
    poly::PolySet,
    time::epoch_from_mjd_sec,
};

/// Get the DiFX basename of a target, e.g. "job_1.difx", "job_1.input",
/// "job_1.calc" and "job_1.im" all become "job_1".
pub fn im_basename<P: AsRef<Path>>(target: P) -> PathBuf {
    let target = target.as_ref();
    match target.extension().and_then(|e| e.to_str()) {
        Some(ext) if DIFX_EXTENSIONS.contains(&ext) => target.with_extension(""),
        _ => target.to_path_buf(),
    }
}

fn with_suffix(basename: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(basename.as_os_str());
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

/// What happened to a `.im` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub im_file: PathBuf,

    /// Where the patched `.im` file goes. It's only written if `written` is
    /// true.
    pub output: PathBuf,
    pub written: bool,

    pub telescope_id: u32,
    pub num_scans: usize,
    pub num_polys_patched: usize,

    /// Polynomials without a closed-loop polynomial starting at the same time.
    pub num_polys_skipped: usize,

    pub updates: CoefficientUpdates,
}

/// Check that the closed-loop polynomials can be applied to a `.im` file with
/// this header.
fn check_consistency(
    header: &ImHeader,
    delay: &PolySet,
    uvw: &PolySet,
) -> Result<(), PatchImError> {
    let all_segments = || delay.segments().iter().chain(uvw.segments());

    if let Some(s) = all_segments().find(|s| s.num_coeffs() > header.poly_order + 1) {
        warn!(
            "Mismatch in polynomial order of .im file ({}) and closed-loop file ({})",
            header.poly_order,
            s.num_coeffs() - 1
        );
    }

    let im_interval = header.poly_interval;
    if let Some(s) = all_segments().find(|s| s.interval() < f64::from(im_interval)) {
        return Err(PatchImError::IntervalTooShort {
            im_interval,
            correction_interval: s.interval(),
        });
    }

    let offset = header.start_second % f64::from(im_interval);
    let correction_start_second = delay.start_second();
    if offset != f64::from(correction_start_second) {
        return Err(PatchImError::StartSecondMisaligned {
            im_start_second: header.start_second,
            correction_start_second,
            interval: im_interval,
            offset,
        });
    }

    Ok(())
}

/// Replace the delay and u,v,w polynomials of `antenna` in the `.im` file
/// belonging to `target` with closed-loop polynomials, and write the result to
/// `<basename>.im.closedloop`. Nothing is written if `dry_run` is true, or if
/// anything goes wrong.
///
/// Polynomials of the `.im` file without a closed-loop polynomial starting at
/// the same time are left alone.
pub fn patch_im_file<P: AsRef<Path>>(
    target: P,
    delay: &PolySet,
    uvw: &PolySet,
    antenna: &str,
    dry_run: bool,
) -> Result<PatchSummary, PatchImError> {
    let basename = im_basename(target);
    let im_file = with_suffix(&basename, "im");
    let output = with_suffix(&basename, CLOSEDLOOP_EXTENSION);

    let mut im = ImFile::read(&im_file)?;
    info!("{}", im_file.display());

    let header = im.header(antenna)?;
    debug!("{header:?}");
    let telescope_id = header
        .telescope_id
        .ok_or_else(|| PatchImError::TelescopeNotFound {
            antenna: antenna.to_string(),
            file: im_file.display().to_string(),
        })?;
    check_consistency(&header, delay, uvw)?;

    info!("Applying closed-loop coefficients to telescope {antenna} with id {telescope_id}");
    let scans = im.scan_blocks();
    let mut num_polys_patched = 0;
    let mut num_polys_skipped = 0;
    let mut updates = CoefficientUpdates::default();
    for scan in &scans {
        debug!(
            "Scan of {} (lines {}-{}) with {} polynomials",
            scan.source,
            scan.lines.start + 1,
            scan.lines.end,
            scan.polys.len()
        );
        for poly in &scan.polys {
            let (mjd, sec) = (poly.mjd, poly.sec);
            let (dp, uvwp) = match (delay.lookup(mjd, sec), uvw.lookup(mjd, sec)) {
                (Some(dp), Some(uvwp)) => (dp, uvwp),
                _ => {
                    match epoch_from_mjd_sec(mjd, sec) {
                        Some(t) => warn!("No suitable closed-loop polynomial to match MJD {mjd} sec {sec} ({t})"),
                        None => warn!("No suitable closed-loop polynomial to match MJD {mjd} sec {sec}"),
                    }
                    num_polys_skipped += 1;
                    continue;
                }
            };

            if dp.source != uvwp.source {
                return Err(PatchImError::DelayUvwSourceMismatch {
                    delay_source: dp.source.clone(),
                    uvw_source: uvwp.source.clone(),
                    mjd,
                    sec,
                });
            }
            if dp.source != scan.source {
                return Err(PatchImError::SourceMismatch {
                    scan_source: scan.source.clone(),
                    poly_source: dp.source.clone(),
                    mjd,
                    sec,
                });
            }

            updates += im.apply_corrections(telescope_id, poly.lines.clone(), dp, uvwp)?;
            num_polys_patched += 1;
        }
    }
    debug!(
        "Updated lines: {} DELAY, {} U, {} V, {} W",
        updates.delay, updates.u, updates.v, updates.w
    );

    let written = if dry_run {
        info!(
            "Dry run; would have written '{}' with {} updated coefficient lines",
            output.display(),
            updates.total()
        );
        false
    } else {
        im.write(&output).map_err(|err| PatchImError::Write {
            file: output.display().to_string(),
            err,
        })?;
        info!(
            "Wrote new file '{}' with {} updated coefficient lines",
            output.display(),
            updates.total()
        );
        true
    };

    Ok(PatchSummary {
        im_file,
        output,
        written,
        telescope_id,
        num_scans: scans.len(),
        num_polys_patched,
        num_polys_skipped,
        updates,
    })
}
