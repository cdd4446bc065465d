// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::clock::Clock;
use crate::error::Error;
use std::{hint, thread};

/// Polls between thread yields while waiting for the next millisecond.
const SPINS_PER_YIELD: u32 = 64;

/// A timestamp and sequence pair handed out by [`Internals::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tick {
    pub(crate) timestamp: u64,
    pub(crate) sequence: u16,
}

/// Fixed bounds a Snowflake's state must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    /// Unix millisecond of the epoch, the earliest usable reading.
    pub(crate) epoch: u64,
    /// Latest Unix millisecond the timestamp section can hold.
    pub(crate) max_timestamp: u64,
    pub(crate) max_sequence: u16,
}

/// Mutable state of a Snowflake.
/// This struct is not exposed to the public.
#[derive(Debug, Default)]
pub(crate) struct Internals {
    /// Unix millisecond of the last minted ID, `None` before the first one.
    pub(crate) last_timestamp: Option<u64>,
    pub(crate) sequence: u16,
}

impl Internals {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decide the timestamp and sequence for the next ID.
    ///
    /// `reading` is the clock value taken by the caller. When the current
    /// millisecond's sequence space is exhausted this polls `clock` until it
    /// passes the last timestamp.
    ///
    /// A reading behind the last timestamp (or behind the epoch before the
    /// first ID) fails with [`Error::ClockRegression`], and a timestamp past
    /// `limits.max_timestamp` fails with [`Error::OverTimeLimit`]. Neither
    /// failure touches the state.
    pub(crate) fn next<C: Clock + ?Sized>(
        &mut self,
        reading: u64,
        limits: &Limits,
        clock: &C,
    ) -> Result<Tick, Error> {
        let (timestamp, sequence) = match self.last_timestamp {
            Some(last) if reading < last => {
                return Err(Error::ClockRegression {
                    last,
                    current: reading,
                });
            }
            None if reading < limits.epoch => {
                return Err(Error::ClockRegression {
                    last: limits.epoch,
                    current: reading,
                });
            }
            Some(last) if reading == last => {
                let sequence = self.sequence.wrapping_add(1) & limits.max_sequence;
                if sequence == 0 {
                    tracing::trace!(
                        timestamp = last,
                        "sequence exhausted, waiting for next millisecond"
                    );
                    (wait_next_millis(last, clock), 0)
                } else {
                    (last, sequence)
                }
            }
            _ => (reading, 0),
        };

        if timestamp > limits.max_timestamp {
            return Err(Error::OverTimeLimit);
        }

        self.last_timestamp = Some(timestamp);
        self.sequence = sequence;
        Ok(Tick {
            timestamp,
            sequence,
        })
    }
}

/// Block until `clock` reports a millisecond strictly after `last`.
fn wait_next_millis<C: Clock + ?Sized>(last: u64, clock: &C) -> u64 {
    let mut spins = 0u32;
    loop {
        let now = clock.now_millis();
        if now > last {
            return now;
        }
        spins += 1;
        if spins % SPINS_PER_YIELD == 0 {
            thread::yield_now();
        } else {
            hint::spin_loop();
        }
    }
}
