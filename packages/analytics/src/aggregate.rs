//! Frequency tables over incident record dimensions.
//!
//! Each dimension has its own extraction rule (field fallbacks, sentinel
//! categories, pre-seeded buckets); a malformed record is simply excluded
//! from that dimension's count, never an error. [`aggregate`] dispatches on
//! [`Dimension`] for callers driving the engine generically; the typed
//! per-dimension functions are the primary API.

use std::collections::HashMap;

use carewatch_analytics_models::{AggregateOptions, AggregateResult, CategoryCount, Dimension};
use carewatch_behaviour_models::{IncidentRecord, Shift, is_affirmative};
use carewatch_shifts::ShiftRegistry;
use chrono::Datelike;

use crate::AnalyticsError;
use crate::noise::{is_noise, split_fragments};
use crate::trend::parse_date;

/// Category label for dimensions that count missing values as a category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Weekday labels in dashboard display order.
const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// An insertion-ordered counter; the finished table is handed to
/// [`AggregateResult`] which sorts by descending count with first-seen
/// tie-break.
#[derive(Default)]
pub(crate) struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<CategoryCount>,
}

impl Counter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A counter with every bucket present at zero, so empty buckets still
    /// appear in the result.
    pub(crate) fn seeded<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counter = Self::new();
        for label in labels {
            let label = label.into();
            counter.index.insert(label.clone(), counter.entries.len());
            counter.entries.push(CategoryCount::new(label, 0));
        }
        counter
    }

    pub(crate) fn add(&mut self, label: String) {
        if let Some(&at) = self.index.get(&label) {
            self.entries[at].count += 1;
        } else {
            self.index.insert(label.clone(), self.entries.len());
            self.entries.push(CategoryCount::new(label, 1));
        }
    }

    pub(crate) fn finish(self) -> AggregateResult {
        AggregateResult::from_first_seen(self.entries)
    }
}

fn count_by<F>(records: &[IncidentRecord], extract: F) -> AggregateResult
where
    F: Fn(&IncidentRecord) -> Option<String>,
{
    let mut counter = Counter::new();
    for record in records {
        if let Some(label) = extract(record) {
            counter.add(label);
        }
    }
    counter.finish()
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Counts incidents by location, preferring `location` and falling back to
/// `incidentLocation`; records where the resolved value is empty are
/// skipped.
#[must_use]
pub fn count_by_location(records: &[IncidentRecord]) -> AggregateResult {
    count_by(records, |r| {
        let value = r.location.as_deref().or(r.incident_location.as_deref())?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Counts incidents by exact injury text; missing values are counted under
/// [`UNKNOWN_CATEGORY`] rather than skipped.
#[must_use]
pub fn count_by_injury(records: &[IncidentRecord]) -> AggregateResult {
    count_by(records, |r| {
        Some(
            r.injury
                .clone()
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        )
    })
}

/// Counts incidents by behaviour type, preferring `incidentType` and falling
/// back to `behaviourType`; records with neither are counted under
/// [`UNKNOWN_CATEGORY`].
#[must_use]
pub fn count_by_behaviour_type(records: &[IncidentRecord]) -> AggregateResult {
    count_by(records, |r| {
        Some(
            non_empty(r.incident_type.as_deref())
                .or_else(|| non_empty(r.behaviour_type.as_deref()))
                .unwrap_or(UNKNOWN_CATEGORY)
                .to_string(),
        )
    })
}

/// Counts incidents per resident; records with no resident name are counted
/// under [`UNKNOWN_CATEGORY`].
#[must_use]
pub fn count_by_resident(records: &[IncidentRecord]) -> AggregateResult {
    count_by(records, |r| {
        Some(
            r.resident_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        )
    })
}

/// Counts incidents per weekday. Dates are parsed as plain year-month-day
/// calendar dates (no timezone shift); unparseable dates are skipped. All
/// seven buckets are present even when zero.
#[must_use]
pub fn count_by_day_of_week(records: &[IncidentRecord]) -> AggregateResult {
    let mut counter = Counter::seeded(WEEKDAY_LABELS);
    for record in records {
        if let Some(date) = record.date.as_deref().and_then(parse_date) {
            let label = WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize];
            counter.add(label.to_string());
        }
    }
    counter.finish()
}

/// Counts incidents per hour of day 0–23, parsed from the leading `HH` of
/// `time`. Out-of-range or unparseable hours are skipped; all 24 buckets are
/// present even when zero.
#[must_use]
pub fn count_by_hour(records: &[IncidentRecord]) -> AggregateResult {
    let mut counter = Counter::seeded((0..24).map(|h| h.to_string()));
    for record in records {
        let Some(time) = record.time.as_deref() else {
            continue;
        };
        let Some(hour) = time
            .split(':')
            .next()
            .and_then(|part| part.trim().parse::<u32>().ok())
        else {
            continue;
        };
        if hour <= 23 {
            counter.add(hour.to_string());
        }
    }
    counter.finish()
}

/// Counts incidents by home unit, preferring `unit` and falling back to
/// `room`; values are whitespace-trimmed and records with an empty result
/// are skipped.
#[must_use]
pub fn count_by_unit(records: &[IncidentRecord]) -> AggregateResult {
    count_by(records, |r| {
        let value = non_empty(r.unit.as_deref().or(r.room.as_deref()))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Counts noise-filtered trigger fragments across all records.
#[must_use]
pub fn count_triggers(records: &[IncidentRecord]) -> AggregateResult {
    count_fragments(records, |r| r.triggers.as_deref())
}

/// Counts noise-filtered intervention fragments across all records.
#[must_use]
pub fn count_interventions(records: &[IncidentRecord]) -> AggregateResult {
    count_fragments(records, |r| r.interventions.as_deref())
}

fn count_fragments<F>(records: &[IncidentRecord], field: F) -> AggregateResult
where
    F: Fn(&IncidentRecord) -> Option<&str>,
{
    let mut counter = Counter::new();
    for record in records {
        let Some(text) = field(record) else {
            continue;
        };
        for fragment in split_fragments(text) {
            if !is_noise(fragment) {
                counter.add(fragment.to_string());
            }
        }
    }
    counter.finish()
}

/// Counts incidents per shift for a facility; [`Shift::Unknown`]
/// classifications are never counted. All three shift buckets are present
/// even when zero.
#[must_use]
pub fn count_by_shift(
    records: &[IncidentRecord],
    facility: &str,
    registry: &ShiftRegistry,
) -> AggregateResult {
    let mut counter = Counter::seeded(Shift::known().iter().map(ToString::to_string));
    for record in records {
        let shift = registry.classify(record.time.as_deref(), facility);
        if shift.is_known() {
            counter.add(shift.to_string());
        }
    }
    counter.finish()
}

/// Counts records whose HIR flag reads "yes" (case-insensitive).
///
/// This dimension is a scalar, not a frequency table — requesting it through
/// [`aggregate`] is a caller bug.
#[must_use]
pub fn count_hir(records: &[IncidentRecord]) -> u64 {
    records
        .iter()
        .filter(|r| is_affirmative(r.hir.as_deref()))
        .count() as u64
}

/// Per-resident counts filtered to residents with more than one incident.
#[must_use]
pub fn recurring_residents(records: &[IncidentRecord]) -> AggregateResult {
    let counts = count_by_resident(records);
    AggregateResult::from_first_seen(
        counts
            .into_entries()
            .into_iter()
            .filter(|entry| entry.count > 1)
            .collect(),
    )
}

/// Builds the frequency table for `dimension` over `records`.
///
/// # Errors
///
/// Returns [`AnalyticsError::ScalarDimension`] for [`Dimension::Hir`], which
/// produces a scalar count (see [`count_hir`]) — asking for it as a table is
/// a caller bug, unlike dirty record data which is silently tolerated.
pub fn aggregate(
    records: &[IncidentRecord],
    dimension: Dimension,
    options: AggregateOptions,
) -> Result<AggregateResult, AnalyticsError> {
    let mut result = match dimension {
        Dimension::Location => count_by_location(records),
        Dimension::Injury => count_by_injury(records),
        Dimension::BehaviourType => count_by_behaviour_type(records),
        Dimension::Resident => count_by_resident(records),
        Dimension::DayOfWeek => count_by_day_of_week(records),
        Dimension::Hour => count_by_hour(records),
        Dimension::Unit => count_by_unit(records),
        Dimension::Triggers => count_triggers(records),
        Dimension::Interventions => count_interventions(records),
        Dimension::Hir => return Err(AnalyticsError::ScalarDimension { dimension }),
    };
    if let Some(n) = options.top_n {
        result.truncate(n);
    }
    Ok(result)
}
