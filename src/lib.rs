//! A distributed unique ID generator inspired by [Twitter's Snowflake].
//!
//! Every ID is a 64-bit integer made of, from the most significant bit down,
//! an always-zero sign bit, the milliseconds elapsed since an epoch, a data
//! center ID, a machine ID and a per-millisecond sequence. Section widths
//! default to `41/5/5/12` and can be changed through the [`Builder`].
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! snowmint = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use snowmint::Snowflake;
//!
//! let sf = Snowflake::new(1, 1).unwrap();
//! let next_id = sf.next_id().unwrap();
//! let parts = sf.decompose(next_id);
//! assert_eq!(parts.data_center_id, 1);
//! assert_eq!(parts.machine_id, 1);
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread safe. `clone` it before moving to another thread:
//! ```
//! use snowmint::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new(1, 2).unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Clock regression
//!
//! If the clock reads earlier than the last minted ID, `next_id` fails with
//! [`Error::ClockRegression`] rather than risk a duplicate. Retrying is up to
//! the caller.
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod error;
mod layout;
mod sequence;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use error::*;
pub use layout::*;
