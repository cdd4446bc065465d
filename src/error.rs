// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for identity providers handed to the [`Builder`].
///
/// [`Builder`]: crate::Builder
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{field} `{value}` is out of range, the max allowed value is {max}")]
    InvalidIdentity {
        field: &'static str,
        value: u64,
        max: u64,
    },
    #[error("clock moved backwards: last timestamp {last}ms, current reading {current}ms")]
    ClockRegression { last: u64, current: u64 },
    #[error(
        "invalid bit length configuration: time({0}) + sequence({1}) + data_center({2}) + machine({3}) must not exceed 63, with time >= 1 and the others <= 16"
    )]
    InvalidBitLength(u8, u8, u8, u8),
    #[error("start_time `{0}`ms is ahead of current time")]
    StartTimeAheadOfCurrentTime(u64),
    #[error("machine_id returned an error: {0}")]
    MachineIdFailed(#[source] BoxDynError),
    #[error("data_center_id returned an error: {0}")]
    DataCenterIdFailed(#[source] BoxDynError),
    #[error("check_machine_id returned false")]
    CheckMachineIdFailed,
    #[error("check_data_center_id returned false")]
    CheckDataCenterIdFailed,
    #[error("over the time limit")]
    OverTimeLimit,
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
}
