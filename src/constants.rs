// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// Scaling to get from closed-loop delay polynomial units (seconds) to `.im`
/// delay units (microseconds).
pub const SCALE_DELAY: f64 = 1e6;

/// Scaling to get from closed-loop u,v,w polynomial units (metres) to `.im`
/// u,v,w units (metres).
pub const SCALE_UVW: f64 = 1.0;

/// Polynomial terms beyond this order are zeroed unless the user says
/// otherwise.
pub const DEFAULT_MAX_ORDER: usize = 12;

/// The antenna whose `.im` polynomials are replaced unless the user says
/// otherwise.
pub const DEFAULT_ANTENNA: &str = "GT";

/// The header of every closed-loop polynomial file contains this.
pub const CORRECTION_FILE_MARKER: &str = "RASTRON";

/// A `.im` file with fewer lines than this can't hold a single polynomial.
pub const MIN_IM_LINES: usize = 16;

/// Appended to the basename of the patched `.im` file.
pub const CLOSEDLOOP_EXTENSION: &str = "im.closedloop";

/// Target-file extensions that are stripped to get a DiFX basename.
pub const DIFX_EXTENSIONS: [&str; 4] = ["difx", "input", "calc", "im"];

/// The day number of MJD 0 (1858-11-17) counted from the common era, where
/// 0001-01-01 is day 1.
pub(crate) const MJD_ZERO_DAYS_FROM_CE: i32 = 678_576;
