// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for patching.
//!
//! The code here "mirrors" the code within the `cli` module; `cli` is
//! unparsed, user-facing code, whereas parameters have been parsed and are
//! ready to be used directly.

use std::path::PathBuf;

use log::{error, info};
use vec1::Vec1;

use crate::{
    cli::InfoPrinter,
    patch::{patch_im_file, PatchImError, PatchSummary},
    poly::PolySet,
};

pub(crate) struct PatchParams {
    /// Closed-loop delay polynomials, already scaled, truncated and time
    /// shifted.
    pub(crate) delay_polys: PolySet,

    /// Closed-loop u,v,w polynomials, already scaled and truncated.
    pub(crate) uvw_polys: PolySet,

    pub(crate) im_files: Vec1<PathBuf>,

    /// The name of the telescope to patch.
    pub(crate) antenna: String,
}

impl PatchParams {
    /// Patch every `.im` file. A file that can't be patched is reported, and
    /// the others are still attempted. The results are in the same order as
    /// `im_files`.
    pub(crate) fn run(&self, dry_run: bool) -> Vec<Result<PatchSummary, PatchImError>> {
        let Self {
            delay_polys,
            uvw_polys,
            im_files,
            antenna,
        } = self;

        let mut results = Vec::with_capacity(im_files.len());
        for im_file in im_files {
            let result = patch_im_file(im_file, delay_polys, uvw_polys, antenna, dry_run);
            match &result {
                Ok(_) => info!("Success: processed {}", im_file.display()),
                Err(e) => {
                    error!("{e}");
                    error!("Error: failed to patch {}", im_file.display());
                }
            }
            info!("");
            results.push(result);
        }

        let mut printer = InfoPrinter::new("Closed-loop patching summary".into());
        for (im_file, result) in im_files.iter().zip(results.iter()) {
            match result {
                Ok(s) => printer.push_block(vec![
                    format!(
                        "{}: telescope id {}, {} scans",
                        s.im_file.display(),
                        s.telescope_id,
                        s.num_scans
                    )
                    .into(),
                    format!(
                        "{} polynomials patched, {} skipped, {} coefficient lines updated",
                        s.num_polys_patched,
                        s.num_polys_skipped,
                        s.updates.total()
                    )
                    .into(),
                    if s.written {
                        format!("Written to {}", s.output.display()).into()
                    } else {
                        format!("Not written ({})", s.output.display()).into()
                    },
                ]),
                Err(_) => printer.push_line(format!("{}: failed", im_file.display()).into()),
            }
        }
        printer.display();

        results
    }
}
