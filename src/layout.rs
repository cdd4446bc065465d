// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;
use chrono::{DateTime, Utc};

/// Default bit length of the timestamp section.
pub const DEFAULT_BIT_LEN_TIME: u8 = 41;
/// Default bit length of the data center id section.
pub const DEFAULT_BIT_LEN_DATA_CENTER_ID: u8 = 5;
/// Default bit length of the machine id section.
pub const DEFAULT_BIT_LEN_MACHINE_ID: u8 = 5;
/// Default bit length of the sequence section.
pub const DEFAULT_BIT_LEN_SEQUENCE: u8 = 12;

/// Widest identity or sequence section, bounded by `u16`.
const MAX_BIT_LEN_FIELD: u8 = 16;

/// Field widths of a Snowflake ID.
///
/// From the most to the least significant bit an ID holds one always-zero
/// sign bit, then `time`, `data_center_id`, `machine_id` and `sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitLayout {
    pub time: u8,
    pub data_center_id: u8,
    pub machine_id: u8,
    pub sequence: u8,
}

impl Default for BitLayout {
    fn default() -> Self {
        Self {
            time: DEFAULT_BIT_LEN_TIME,
            data_center_id: DEFAULT_BIT_LEN_DATA_CENTER_ID,
            machine_id: DEFAULT_BIT_LEN_MACHINE_ID,
            sequence: DEFAULT_BIT_LEN_SEQUENCE,
        }
    }
}

impl BitLayout {
    /// Check that the sections fit next to the sign bit.
    pub fn validate(&self) -> Result<(), Error> {
        let total = u16::from(self.time)
            + u16::from(self.sequence)
            + u16::from(self.data_center_id)
            + u16::from(self.machine_id);
        if self.time == 0
            || self.sequence > MAX_BIT_LEN_FIELD
            || self.data_center_id > MAX_BIT_LEN_FIELD
            || self.machine_id > MAX_BIT_LEN_FIELD
            || total > 63
        {
            return Err(Error::InvalidBitLength(
                self.time,
                self.sequence,
                self.data_center_id,
                self.machine_id,
            ));
        }
        Ok(())
    }

    pub fn max_time(&self) -> u64 {
        mask(self.time)
    }

    pub fn max_data_center_id(&self) -> u64 {
        mask(self.data_center_id)
    }

    pub fn max_machine_id(&self) -> u64 {
        mask(self.machine_id)
    }

    pub fn max_sequence(&self) -> u64 {
        mask(self.sequence)
    }

    pub fn machine_id_shift(&self) -> u32 {
        u32::from(self.sequence)
    }

    pub fn data_center_id_shift(&self) -> u32 {
        self.machine_id_shift() + u32::from(self.machine_id)
    }

    pub fn time_shift(&self) -> u32 {
        self.data_center_id_shift() + u32::from(self.data_center_id)
    }

    /// Pack the four sections into an ID.
    ///
    /// Every value is masked to its width, so bits beyond a section never
    /// leak into its neighbours.
    pub fn encode(&self, time: u64, data_center_id: u16, machine_id: u16, sequence: u16) -> u64 {
        let (data_center_id, machine_id, sequence) = (
            u64::from(data_center_id),
            u64::from(machine_id),
            u64::from(sequence),
        );
        shl(time & self.max_time(), self.time_shift())
            | shl(data_center_id & self.max_data_center_id(), self.data_center_id_shift())
            | shl(machine_id & self.max_machine_id(), self.machine_id_shift())
            | (sequence & self.max_sequence())
    }

    /// Break an ID up into its sections.
    ///
    /// Never panics: with a layout that fails [`validate`], sections shifted
    /// past bit 63 decode as zero.
    ///
    /// [`validate`]: BitLayout::validate
    pub fn decode(&self, id: u64) -> DecomposedSnowflake {
        DecomposedSnowflake {
            id,
            msb: id >> 63,
            time: shr(id, self.time_shift()) & self.max_time(),
            data_center_id: shr(id, self.data_center_id_shift()) & self.max_data_center_id(),
            machine_id: shr(id, self.machine_id_shift()) & self.max_machine_id(),
            sequence: id & self.max_sequence(),
        }
    }
}

fn shl(value: u64, shift: u32) -> u64 {
    value.checked_shl(shift).unwrap_or(0)
}

fn shr(value: u64, shift: u32) -> u64 {
    value.checked_shr(shift).unwrap_or(0)
}

fn mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// DecomposedSnowflake is the parts of a Snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedSnowflake {
    pub id: u64,
    pub msb: u64,
    /// Milliseconds since the generator's epoch.
    pub time: u64,
    pub data_center_id: u64,
    pub machine_id: u64,
    pub sequence: u64,
}

impl DecomposedSnowflake {
    /// Break a Snowflake ID up into its parts using the given layout.
    pub fn decompose(id: u64, layout: &BitLayout) -> Self {
        layout.decode(id)
    }

    /// Returns the mint time in milliseconds since the Unix epoch.
    pub fn unix_millis(&self, epoch_millis: u64) -> u64 {
        epoch_millis.saturating_add(self.time)
    }

    /// Returns the mint time, or `None` if it is out of chrono's range.
    pub fn datetime(&self, epoch_millis: u64) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.unix_millis(epoch_millis)).ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

/// Break a Snowflake ID up into its parts using the default layout.
pub fn decompose(id: u64) -> DecomposedSnowflake {
    BitLayout::default().decode(id)
}
