// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use std::sync::Arc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// [`Snowflake`] reads the clock on every call to `next_id`, so any
/// implementation can be plugged in, including a scripted one in tests.
///
/// ```
/// use snowmint::Clock;
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now_millis(&self) -> u64 {
///         1_000
///     }
/// }
///
/// assert_eq!(FixedClock.now_millis(), 1_000);
/// ```
///
/// [`Snowflake`]: crate::Snowflake
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn now_millis(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // pre-1970 readings clamp to zero
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
