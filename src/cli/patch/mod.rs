// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_ANTENNA, DEFAULT_MAX_ORDER, SCALE_DELAY, SCALE_UVW},
    params::PatchParams,
    poly::{CorrectionReadError, PolySet},
    ClosedloopError,
};

lazy_static::lazy_static! {
    static ref MAX_ORDER_HELP: String =
        format!("Zero all closed-loop polynomial terms above this order. Default: {DEFAULT_MAX_ORDER}");

    static ref ANTENNA_HELP: String =
        format!("The name of the telescope in the .im files whose polynomials are replaced (case insensitive). Default: {DEFAULT_ANTENNA}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PatchArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the closed-loop delay polynomials [seconds].
    #[clap(name = "DELAY_POLYS", parse(from_os_str))]
    pub(super) delay_polys: Option<PathBuf>,

    /// Path to the closed-loop u,v,w polynomials [metres].
    #[clap(name = "UVW_POLYS", parse(from_os_str))]
    pub(super) uvw_polys: Option<PathBuf>,

    /// The DiFX jobs to patch. Any of the .difx, .input, .calc or .im files of
    /// a job may be given; <basename>.im is read and <basename>.im.closedloop
    /// is written.
    #[clap(name = "IM_FILES", parse(from_os_str))]
    pub(super) im_files: Option<Vec<PathBuf>>,

    /// Add this delay rate to the linear term of the closed-loop delay
    /// polynomials [s/s]. Default: 0
    #[clap(short = 'r', long, allow_hyphen_values = true)]
    pub(super) drate: Option<f64>,

    /// Time shift the closed-loop delay polynomials by this much, such that
    /// the new polynomials evaluated at t are the old polynomials evaluated at
    /// t + dt [seconds]. Default: 0
    #[clap(short = 't', long, allow_hyphen_values = true)]
    pub(super) dt: Option<f64>,

    #[clap(short = 'N', long = "maxorder", help = MAX_ORDER_HELP.as_str())]
    pub(super) max_order: Option<usize>,

    #[clap(short, long, help = ANTENNA_HELP.as_str())]
    pub(super) antenna: Option<String>,
}

impl PatchArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PatchArgs, ClosedloopError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let PatchArgs {
                args_file: _,
                delay_polys,
                uvw_polys,
                im_files,
                drate,
                dt,
                max_order,
                antenna,
            } = unpack_arg_file!(arg_file);

            Ok(PatchArgs {
                args_file: None,
                delay_polys: cli_args.delay_polys.or(delay_polys),
                uvw_polys: cli_args.uvw_polys.or(uvw_polys),
                im_files: cli_args.im_files.or(im_files),
                drate: cli_args.drate.or(drate),
                dt: cli_args.dt.or(dt),
                max_order: cli_args.max_order.or(max_order),
                antenna: cli_args.antenna.or(antenna),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Read the closed-loop polynomials and prepare them for patching: add
    /// the delay rate to, truncate and time shift the delay polynomials, and
    /// truncate the u,v,w polynomials.
    pub(super) fn parse(self) -> Result<PatchParams, ClosedloopError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            delay_polys,
            uvw_polys,
            im_files,
            drate,
            dt,
            max_order,
            antenna,
        } = self;

        let delay_file = delay_polys.ok_or(PatchArgsError::NoDelayPolys)?;
        let uvw_file = uvw_polys.ok_or(PatchArgsError::NoUvwPolys)?;
        let im_files = im_files
            .and_then(|f| Vec1::try_from_vec(f).ok())
            .ok_or(PatchArgsError::NoImFiles)?;
        let antenna = antenna.unwrap_or_else(|| DEFAULT_ANTENNA.to_string());
        if antenna.trim().is_empty() {
            return Err(PatchArgsError::EmptyAntenna.into());
        }
        let drate = drate.unwrap_or(0.0);
        let dt = dt.unwrap_or(0.0);
        let max_order = max_order.unwrap_or(DEFAULT_MAX_ORDER);

        let read = |file: &Path, scale: f64| {
            PolySet::read_file(file, scale).map_err(|err| PatchArgsError::ReadPolys {
                file: file.display().to_string(),
                err,
            })
        };
        let mut delay = read(&delay_file, SCALE_DELAY)?;
        let mut uvw = read(&uvw_file, SCALE_UVW)?;
        if delay.dims() != 1 || uvw.dims() != 3 {
            return Err(PatchArgsError::DimensionMismatch {
                delay_file: delay_file.display().to_string(),
                delay_dims: delay.dims(),
                uvw_file: uvw_file.display().to_string(),
                uvw_dims: uvw.dims(),
            }
            .into());
        }

        delay.add(&[0.0, drate]);
        delay.truncate(max_order);
        delay.time_shift(dt);
        uvw.truncate(max_order);

        let mut printer = InfoPrinter::new("Closed-loop polynomials".into());
        printer.push_block(vec![
            format!("Delays: {}", delay_file.display()).into(),
            format!(
                "{} polynomials with {} coefficients",
                delay.len(),
                delay.max_num_coeffs()
            )
            .into(),
        ]);
        printer.push_block(vec![
            format!("u,v,w: {}", uvw_file.display()).into(),
            format!(
                "{} polynomials with {} coefficients",
                uvw.len(),
                uvw.max_num_coeffs()
            )
            .into(),
        ]);
        let mut block = vec![format!("Terms above order {max_order} are zeroed").into()];
        if drate != 0.0 {
            block.push(format!("Delay rate added: {drate} s/s").into());
        }
        if dt != 0.0 {
            block.push(format!("Delays time shifted by {dt} s").into());
        }
        printer.push_block(block);
        printer.push_line(
            format!(
                "Patching telescope {antenna} in {} .im files",
                im_files.len()
            )
            .into(),
        );
        printer.display();

        if dt != 0.0 {
            "Only the delay polynomials are time shifted; the u,v,w polynomials are used as they are"
                .warn();
        }
        if max_order + 1 < delay.max_num_coeffs().max(uvw.max_num_coeffs()) {
            format!("Closed-loop polynomial terms above order {max_order} were zeroed").warn();
        }
        display_warnings();

        Ok(PatchParams {
            delay_polys: delay,
            uvw_polys: uvw,
            im_files,
            antenna,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), ClosedloopError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        params.run(dry_run);
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum PatchArgsError {
    #[error("No closed-loop delay polynomial file was specified")]
    NoDelayPolys,

    #[error("No closed-loop u,v,w polynomial file was specified")]
    NoUvwPolys,

    #[error("No .im files were specified")]
    NoImFiles,

    #[error("The antenna name is empty")]
    EmptyAntenna,

    #[error("Couldn't load closed-loop polynomials from '{file}': {err}")]
    ReadPolys {
        file: String,
        err: CorrectionReadError,
    },

    #[error("Closed-loop polynomial dimensions mismatch! Expected 1 for the delay file '{delay_file}' (got {delay_dims}) and 3 for the u,v,w file '{uvw_file}' (got {uvw_dims})")]
    DimensionMismatch {
        delay_file: String,
        delay_dims: usize,
        uvw_file: String,
        uvw_dims: usize,
    },
}
