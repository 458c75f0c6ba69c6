//! Shift range and schedule types.

use carewatch_behaviour_models::Shift;
use serde::Deserialize;

/// Minutes in a wall-clock day; minute-of-day values live in `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// An inclusive minute-of-day range.
///
/// A range with `start > end` wraps past midnight: `[1380, 419]` covers
/// 23:00 through 06:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u16; 2]")]
pub struct ShiftRange {
    /// First minute of the range.
    pub start: u16,
    /// Last minute of the range (inclusive).
    pub end: u16,
}

impl From<[u16; 2]> for ShiftRange {
    fn from([start, end]: [u16; 2]) -> Self {
        Self { start, end }
    }
}

impl ShiftRange {
    /// Returns `true` if `minute` falls inside this range, wrap-aware.
    #[must_use]
    pub const fn contains(self, minute: u16) -> bool {
        if self.start <= self.end {
            minute >= self.start && minute <= self.end
        } else {
            minute >= self.start || minute <= self.end
        }
    }

    /// Returns `true` if both endpoints are valid minute-of-day values.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        self.start < MINUTES_PER_DAY && self.end < MINUTES_PER_DAY
    }
}

/// One facility's Morning/Evening/Night schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ShiftConfig {
    /// Morning shift range.
    pub morning: ShiftRange,
    /// Evening shift range.
    pub evening: ShiftRange,
    /// Night shift range, usually wrapping past midnight.
    pub night: ShiftRange,
}

impl ShiftConfig {
    /// Classifies a minute of day against this schedule.
    ///
    /// Ranges are evaluated morning, evening, night, first match wins.
    /// Returns `None` when no range matches (possible for schedules with
    /// gaps).
    #[must_use]
    pub const fn classify_minute(&self, minute: u16) -> Option<Shift> {
        if self.morning.contains(minute) {
            Some(Shift::Morning)
        } else if self.evening.contains(minute) {
            Some(Shift::Evening)
        } else if self.night.contains(minute) {
            Some(Shift::Night)
        } else {
            None
        }
    }

    /// Iterates the three ranges with their shift labels.
    pub(crate) const fn ranges(&self) -> [(&'static str, ShiftRange); 3] {
        [
            ("morning", self.morning),
            ("evening", self.evening),
            ("night", self.night),
        ]
    }
}

/// Parses a wall-clock time string into a minute of day.
///
/// The string must contain a `:`; hour and minute must parse as integers.
/// Trailing seconds (`HH:MM:SS`) are ignored. The result is normalized into
/// `[0, 1439]`, so artifacts like `"24:10"` wrap past midnight. Any parse
/// failure yields `None`.
#[must_use]
pub fn parse_minute_of_day(time: Option<&str>) -> Option<u16> {
    let time = time?;
    if !time.contains(':') {
        return None;
    }
    let mut parts = time.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    let total = (hours * 60 + minutes) % u32::from(MINUTES_PER_DAY);
    u16::try_from(total).ok()
}
