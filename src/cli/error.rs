// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all closedloop-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::patch::PatchArgsError;

/// The *only* publicly visible error from closedloop. Messages carry hints
/// where something can be done about the problem.
#[derive(Error, Debug)]
pub enum ClosedloopError {
    /// An error related to the closed-loop polynomial files.
    #[error("{0}\n\nClosed-loop polynomial files start with a line containing 'RASTRON', then a line 'N=<number of coefficients>', then a separator line, followed by blocks of 'source', 'start', 'stop' and N 'P<k>' lines")]
    Correction(String),

    /// An error related to the command-line arguments.
    #[error("{0}\n\nSee --help for usage")]
    Args(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json, and use the same names as the long command-line arguments (e.g. 'delay_polys', 'im_files')")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<PatchArgsError> for ClosedloopError {
    fn from(e: PatchArgsError) -> Self {
        let s = e.to_string();
        match e {
            PatchArgsError::NoDelayPolys
            | PatchArgsError::NoUvwPolys
            | PatchArgsError::NoImFiles
            | PatchArgsError::EmptyAntenna => Self::Args(s),
            PatchArgsError::ReadPolys { .. } | PatchArgsError::DimensionMismatch { .. } => {
                Self::Correction(s)
            }
        }
    }
}

impl From<std::io::Error> for ClosedloopError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
