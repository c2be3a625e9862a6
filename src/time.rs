// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions around time.
//!
//! All [`Epoch`]s here are built from whole calendar fields, never from
//! floating-point day counts, so that two routes to the same UTC second compare
//! equal.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use hifitime::Epoch;

use crate::constants::MJD_ZERO_DAYS_FROM_CE;

/// The format of times in closed-loop polynomial files, e.g.
/// "19/10/2017 09h00m00s".
const CORRECTION_TIME_FORMAT: &str = "%d/%m/%Y %Hh%Mm%Ss";

fn epoch_from_naive(dt: NaiveDateTime) -> Epoch {
    Epoch::from_gregorian_utc(
        dt.year(),
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        0,
    )
}

/// Parse a UTC time like "19/10/2017 09h00m00s".
pub(crate) fn parse_correction_time(s: &str) -> Result<Epoch, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), CORRECTION_TIME_FORMAT).map(epoch_from_naive)
}

/// Get the [`Epoch`] of a whole MJD and a second of that day. `None` is
/// returned if the date is out of range.
pub(crate) fn epoch_from_mjd_sec(mjd: i32, sec: i64) -> Option<Epoch> {
    let date = NaiveDate::from_num_days_from_ce_opt(MJD_ZERO_DAYS_FROM_CE.checked_add(mjd)?)?;
    let dt = date
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(chrono::Duration::seconds(sec))?;
    Some(epoch_from_naive(dt))
}

/// The seconds field (0 to 59) of an [`Epoch`]'s UTC representation.
pub(crate) fn utc_seconds_field(e: Epoch) -> u8 {
    let (_, _, _, _, _, second, _) = e.to_gregorian_utc();
    second
}
