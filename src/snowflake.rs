// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::Builder;
use crate::clock::{Clock, SystemClock};
use crate::error::*;
use crate::layout::{BitLayout, DecomposedSnowflake};
use crate::sequence::{Internals, Limits};
use std::sync::{Arc, Mutex};

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake<C> {
    pub(crate) internals: Mutex<Internals>,
    pub(crate) clock: C,
    /// Milliseconds since the Unix epoch.
    pub(crate) start_time: u64,
    pub(crate) data_center_id: u16,
    pub(crate) machine_id: u16,
    pub(crate) layout: BitLayout,
    pub(crate) limits: Limits,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Snowflake<C: Clock = SystemClock>(pub(crate) Arc<SharedSnowflake<C>>);

impl Snowflake {
    /// Create a new Snowflake with the default epoch, layout and system clock.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new(data_center_id: u16, machine_id: u16) -> Result<Self, Error> {
        Builder::new()
            .data_center_id(&|| Ok(data_center_id))
            .machine_id(&|| Ok(machine_id))
            .finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }
}

impl<C: Clock> Snowflake<C> {
    pub(crate) fn new_inner(shared: Arc<SharedSnowflake<C>>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// Blocks for at most a millisecond when the current millisecond's
    /// sequence space is used up. Returns [`Error::ClockRegression`] if the
    /// clock reads earlier than the last minted ID (or the epoch, before the
    /// first ID), and [`Error::OverTimeLimit`] once the timestamp section
    /// overflows. A failed call leaves the generator's state as it was.
    pub fn next_id(&self) -> Result<u64, Error> {
        let shared = &*self.0;
        let mut internals = shared.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let reading = shared.clock.now_millis();
        let tick = internals
            .next(reading, &shared.limits, &shared.clock)
            .inspect_err(|err| {
                tracing::warn!(%err, "refusing to generate id");
            })?;

        let elapsed_time = tick.timestamp - shared.start_time;
        Ok(shared.layout.encode(
            elapsed_time,
            shared.data_center_id,
            shared.machine_id,
            tick.sequence,
        ))
    }

    /// Break an ID minted by this generator up into its parts.
    pub fn decompose(&self, id: u64) -> DecomposedSnowflake {
        self.0.layout.decode(id)
    }

    pub fn data_center_id(&self) -> u16 {
        self.0.data_center_id
    }

    pub fn machine_id(&self) -> u16 {
        self.0.machine_id
    }

    /// The epoch as milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> u64 {
        self.0.start_time
    }

    pub fn layout(&self) -> BitLayout {
        self.0.layout
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl<C: Clock> Clone for Snowflake<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
