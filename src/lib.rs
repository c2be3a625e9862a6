// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Apply closed-loop delay and u,v,w polynomials to DiFX/CALC `.im` files.

Closed-loop correlation replaces the geometric model polynomials of a single
telescope (e.g. an orbiting antenna) with externally-computed polynomials.
This crate reads those polynomials, optionally adds a delay rate, truncates and
time shifts them, and writes a patched copy of each `.im` file.
 */

mod cli;
pub mod constants;
pub mod im;
pub(crate) mod math;
pub mod patch;
mod params;
pub mod poly;
mod time;

#[cfg(test)]
mod tests;

// Re-exports.
pub use cli::{Closedloop, ClosedloopError};
pub use im::{ImFile, ImReadError};
pub use patch::{patch_im_file, PatchImError, PatchSummary};
pub use poly::{CorrectionReadError, PolySegment, PolySet};
