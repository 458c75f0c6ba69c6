#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-facility shift schedules and wall-clock shift classification.
//!
//! Every care home runs its own Morning/Evening/Night schedule, so the
//! minute-of-day ranges live in a TOML table embedded at compile time and
//! validated at load. Classification is deliberately forgiving: a missing or
//! unparseable time, or an unconfigured facility, yields [`Shift::Unknown`]
//! rather than an error, because the upstream extraction pipeline produces
//! plenty of both.

mod config;
mod registry;

pub use config::{MINUTES_PER_DAY, ShiftConfig, ShiftRange, parse_minute_of_day};
pub use registry::ShiftRegistry;

use thiserror::Error;

/// Errors raised while loading a shift-schedule table.
///
/// These only occur for malformed configuration, never for dirty incident
/// data — classification itself is infallible.
#[derive(Debug, Error)]
pub enum ShiftConfigError {
    /// The TOML document failed to parse.
    #[error("invalid shift schedule TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A range endpoint fell outside the minute-of-day domain.
    #[error(
        "facility '{facility}' {shift} range [{start}, {end}] is outside 0..={max}",
        max = MINUTES_PER_DAY - 1
    )]
    RangeOutOfBounds {
        /// Facility key the bad range belongs to.
        facility: String,
        /// Which shift the range was for.
        shift: &'static str,
        /// Range start, minute of day.
        start: u16,
        /// Range end, minute of day.
        end: u16,
    },
}
