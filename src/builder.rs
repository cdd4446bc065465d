// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::Snowflake;
use crate::clock::{Clock, SystemClock};
use crate::error::{BoxDynError, Error};
use crate::layout::BitLayout;
use crate::sequence::{Internals, Limits};
use crate::snowflake::SharedSnowflake;
use chrono::prelude::*;
use std::sync::{Arc, Mutex};

/// Default epoch: 2022-01-01T00:00:00Z in milliseconds.
pub const DEFAULT_EPOCH_MILLIS: u64 = 1_640_995_200_000;

type IdProvider<'a> = &'a dyn Fn() -> Result<u16, BoxDynError>;
type IdCheck<'a> = &'a dyn Fn(u16) -> bool;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a, C = SystemClock> {
    start_time: Option<u64>,
    machine_id: Option<IdProvider<'a>>,
    data_center_id: Option<IdProvider<'a>>,
    check_machine_id: Option<IdCheck<'a>>,
    check_data_center_id: Option<IdCheck<'a>>,
    layout: BitLayout,
    clock: C,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            start_time: None,
            machine_id: None,
            data_center_id: None,
            check_machine_id: None,
            check_data_center_id: None,
            layout: BitLayout::default(),
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> Builder<'a, C> {
    /// Set the start time.
    /// If the time is set later than the current time, 'finalize' will fail.
    /// Dates before 1970 are clamped to the Unix epoch.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(u64::try_from(start_time.timestamp_millis()).unwrap_or(0));
        self
    }

    /// Set the start time in milliseconds since the Unix epoch.
    pub fn epoch_millis(mut self, epoch_millis: u64) -> Self {
        self.start_time = Some(epoch_millis);
        self
    }

    /// Set the machine ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn machine_id(mut self, machine_id: IdProvider<'a>) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Set up the data center ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn data_center_id(mut self, data_center_id: IdProvider<'a>) -> Self {
        self.data_center_id = Some(data_center_id);
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_machine_id(mut self, check_machine_id: IdCheck<'a>) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Set up a function to check the data center ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_data_center_id(mut self, check_data_center_id: IdCheck<'a>) -> Self {
        self.check_data_center_id = Some(check_data_center_id);
        self
    }

    /// Set the bit length of the timestamp section.
    pub fn bit_len_time(mut self, bit_len_time: u8) -> Self {
        self.layout.time = bit_len_time;
        self
    }

    /// Sets the bit length of the sequence section.
    pub fn bit_len_sequence(mut self, bit_len_sequence: u8) -> Self {
        self.layout.sequence = bit_len_sequence;
        self
    }

    /// Set the bit length for the Data Center ID section.
    pub fn bit_len_data_center_id(mut self, bit_len_data_center_id: u8) -> Self {
        self.layout.data_center_id = bit_len_data_center_id;
        self
    }

    /// Set the bit length of the machine ID section.
    pub fn bit_len_machine_id(mut self, bit_len_machine_id: u8) -> Self {
        self.layout.machine_id = bit_len_machine_id;
        self
    }

    /// Replace all section widths at once.
    pub fn layout(mut self, layout: BitLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Use another clock, e.g. a scripted one in tests.
    pub fn clock<T: Clock>(self, clock: T) -> Builder<'a, T> {
        Builder {
            start_time: self.start_time,
            machine_id: self.machine_id,
            data_center_id: self.data_center_id,
            check_machine_id: self.check_machine_id,
            check_data_center_id: self.check_data_center_id,
            layout: self.layout,
            clock,
        }
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if any of the configured functions return an error or if validation fails.
    pub fn finalize(self) -> Result<Snowflake<C>, Error> {
        self.layout.validate()?;

        let start_time = self.start_time.unwrap_or(DEFAULT_EPOCH_MILLIS);
        if start_time > self.clock.now_millis() {
            return Err(Error::StartTimeAheadOfCurrentTime(start_time));
        }

        let machine_id = match self.machine_id {
            Some(machine_id_fn) => machine_id_fn().map_err(Error::MachineIdFailed)?,
            None => return Err(Error::MachineIdFailed("Machine ID not provided".into())),
        };
        check_range("machine_id", machine_id, self.layout.max_machine_id())?;
        if let Some(check_machine_id) = self.check_machine_id
            && !check_machine_id(machine_id)
        {
            return Err(Error::CheckMachineIdFailed);
        }

        let data_center_id = match self.data_center_id {
            Some(data_center_id_fn) => data_center_id_fn().map_err(Error::DataCenterIdFailed)?,
            None => {
                return Err(Error::DataCenterIdFailed(
                    "Data Center ID not provided".into(),
                ));
            }
        };
        check_range(
            "data_center_id",
            data_center_id,
            self.layout.max_data_center_id(),
        )?;
        if let Some(check_data_center_id) = self.check_data_center_id
            && !check_data_center_id(data_center_id)
        {
            return Err(Error::CheckDataCenterIdFailed);
        }

        tracing::debug!(
            data_center_id,
            machine_id,
            epoch = start_time,
            layout = ?self.layout,
            "snowflake generator ready"
        );

        let shared = Arc::new(SharedSnowflake {
            internals: Mutex::new(Internals::new()),
            clock: self.clock,
            start_time,
            data_center_id,
            machine_id,
            layout: self.layout,
            limits: Limits {
                epoch: start_time,
                max_timestamp: start_time.saturating_add(self.layout.max_time()),
                max_sequence: self.layout.max_sequence() as u16,
            },
        });
        Ok(Snowflake::new_inner(shared))
    }
}

fn check_range(field: &'static str, value: u16, max: u64) -> Result<(), Error> {
    let value = u64::from(value);
    if value > max {
        return Err(Error::InvalidIdentity { field, value, max });
    }
    Ok(())
}
