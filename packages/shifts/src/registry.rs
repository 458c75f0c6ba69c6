//! Shift-schedule registry — loads the per-facility table from embedded TOML.
//!
//! The schedule table is baked into the binary at compile time via
//! [`include_str!`]. Adding a facility means adding a block to
//! `packages/shifts/shifts.toml`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use carewatch_behaviour_models::Shift;
use serde::Deserialize;

use crate::config::{MINUTES_PER_DAY, ShiftConfig, parse_minute_of_day};
use crate::ShiftConfigError;

/// Schedule table embedded at compile time.
const SHIFTS_TOML: &str = include_str!("../shifts.toml");

/// Number of configured facilities (used in tests).
#[cfg(test)]
const EXPECTED_FACILITY_COUNT: usize = 23;

/// Facility whose schedule predates the table and is hard-coded as absolute
/// ranges, checked before the generic lookup.
const GODERICH_FACILITY: &str = "goderich";
/// Goderich morning range, 07:00–14:59.
const GODERICH_MORNING_START: u16 = 420;
const GODERICH_MORNING_END: u16 = 899;
/// Goderich evening range, 15:00–22:59; everything else is night.
const GODERICH_EVENING_START: u16 = 900;
const GODERICH_EVENING_END: u16 = 1379;

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawShiftTable {
    facilities: BTreeMap<String, ShiftConfig>,
}

/// Validated per-facility shift schedules.
///
/// Lookup is case-sensitive first, then retried with the facility name
/// lowercased, matching how facility identifiers arrive from the dashboard.
#[derive(Debug, Clone)]
pub struct ShiftRegistry {
    configs: BTreeMap<String, ShiftConfig>,
}

impl ShiftRegistry {
    /// Parses and validates a schedule table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftConfigError`] if the TOML is malformed or any range
    /// endpoint falls outside `[0, 1439]`.
    pub fn from_toml_str(text: &str) -> Result<Self, ShiftConfigError> {
        let raw: RawShiftTable = toml::from_str(text)?;
        for (facility, config) in &raw.facilities {
            for (shift, range) in config.ranges() {
                if !range.is_well_formed() {
                    return Err(ShiftConfigError::RangeOutOfBounds {
                        facility: facility.clone(),
                        shift,
                        start: range.start,
                        end: range.end,
                    });
                }
            }
        }
        Ok(Self {
            configs: raw.facilities,
        })
    }

    /// Loads the schedule table embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftConfigError`] if the embedded TOML is malformed —
    /// which indicates a bad edit to `shifts.toml`, not a runtime condition.
    pub fn embedded() -> Result<Self, ShiftConfigError> {
        Self::from_toml_str(SHIFTS_TOML)
    }

    /// Returns the process-wide registry backed by the embedded table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time-embedded
    /// guarantee, verified by tests).
    #[must_use]
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<ShiftRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            Self::embedded().unwrap_or_else(|e| panic!("embedded shifts.toml is invalid: {e}"))
        })
    }

    /// Looks up a facility's schedule, case-sensitive then lowercased.
    #[must_use]
    pub fn get(&self, facility: &str) -> Option<&ShiftConfig> {
        self.configs
            .get(facility)
            .or_else(|| self.configs.get(&facility.to_lowercase()))
    }

    /// Number of configured facilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if no facilities are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Classifies a wall-clock time for a facility.
    ///
    /// Unparseable times, unknown facilities, and schedule gaps all yield
    /// [`Shift::Unknown`] — a reported classification, never an error.
    #[must_use]
    pub fn classify(&self, time: Option<&str>, facility: &str) -> Shift {
        let Some(minute) = parse_minute_of_day(time) else {
            return Shift::Unknown;
        };
        debug_assert!(minute < MINUTES_PER_DAY);

        // Historical data quirk: goderich predates the schedule table and
        // keeps its original absolute ranges.
        if facility.eq_ignore_ascii_case(GODERICH_FACILITY) {
            return if (GODERICH_MORNING_START..=GODERICH_MORNING_END).contains(&minute) {
                Shift::Morning
            } else if (GODERICH_EVENING_START..=GODERICH_EVENING_END).contains(&minute) {
                Shift::Evening
            } else {
                Shift::Night
            };
        }

        let Some(config) = self.get(facility) else {
            log::error!("no shift configuration found for facility: {facility}");
            return Shift::Unknown;
        };

        config.classify_minute(minute).unwrap_or_else(|| {
            log::debug!("minute {minute} matches no shift range for facility: {facility}");
            Shift::Unknown
        })
    }
}
