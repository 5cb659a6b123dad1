//! A generator of short, K-sortable unique identifiers
//!
//! ```rust
//! use kid::kid;
//!
//! let id = kid();
//! println!("{}", id); // e.g., "06bqer9xnm79tfnl"
//! println!("{:?}", id.as_bytes()); // as 10-byte big-endian array
//! ```
//!
//! # Field and byte layout
//!
//! A Kid is 10 bytes as binary and 16 bytes when base32 encoded, with the
//! following layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |           sequence            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |            random             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 16-bit `sequence` field carries a value derived from the
//!   sub-millisecond portion of the clock reading, adjusted so that the
//!   combined (`unix_ts_ms`, `sequence`) pair of each generated Kid is
//!   strictly greater than that of every Kid generated before it in the same
//!   process.
//! - The 16-bit `random` field is filled with a cryptographically strong
//!   random number and carries no ordering semantics.
//!
//! Because the timestamp and sequence occupy the most significant bytes and
//! the base32 alphabet (`0123456789bcdefghjklmnpqrstvwxyz`, no vowels) is
//! assigned in code-point order, Kids sort by creation order both as raw
//! bytes and as encoded strings. Ordering is process-wide; no machine or
//! process discriminator is embedded.
//!
//! When calls outpace the clock, the generator issues the previous tick plus
//! one, borrowing from future milliseconds; sustained rates above ~4096 calls
//! per millisecond run the encoded timestamp ahead of the wall clock.
//!
//! # Crate features
//!
//! - `serde`: implements `Serialize` and `Deserialize` for [`Kid`], encoding
//!   as a base32 string in human-readable formats (with the nil Kid mapped to
//!   null) and as raw bytes otherwise.
//! - `cli`: builds the `kid` binary for generating and inspecting Kids.

mod id;
pub use id::{sort, InvalidId, Kid};

mod generator;
pub use generator::{Clock, Generator, SystemClock};

mod entry;
pub use entry::kid;
