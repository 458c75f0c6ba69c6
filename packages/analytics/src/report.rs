//! Analysis orchestration — one call from raw records to a full report.
//!
//! [`analyze`] is the entry point the dashboard's trends page consumes: it
//! rolls the per-dimension aggregations, the trend classification, and the
//! insight rule set into a single [`AnalysisReport`]. Chart payload assembly
//! and AI narrative generation stay outside the engine.

use carewatch_analytics_models::{
    AggregateResult, AnalysisReport, AnalysisSummary, InsightSummary, OutcomeStats,
    PersonalizedPattern, TimeSeriesPoint,
};
use carewatch_behaviour_models::IncidentRecord;
use carewatch_shifts::ShiftRegistry;

use crate::aggregate::{
    Counter, UNKNOWN_CATEGORY, count_by_behaviour_type, count_by_shift, count_interventions,
    count_triggers, non_empty,
};
use crate::insights::synthesize;
use crate::noise::{contains_any, split_fragments};
use crate::trend::{daily_totals, parse_date, trend_of_series};

/// Top-N table size for trigger/intervention reporting.
pub const TOP_FRAGMENT_LIMIT: usize = 10;

/// Dominant-shift share above which the personalized time pattern fires.
const PERSONAL_TIME_SHARE: f64 = 0.4;
/// Incidents-per-day rate above which the personalized frequency pattern
/// fires.
const PERSONAL_FREQUENCY_RATE: f64 = 0.5;
/// Trigger fragments shorter than this are ignored by the personalized
/// trigger pattern.
const PERSONAL_TRIGGER_MIN_CHARS: usize = 4;

/// Outcome text markers that read as a positive result.
const POSITIVE_OUTCOME_MARKERS: &[&str] = &["resolved", "improved", "success"];

/// The dashboard's "personalized view": keeps only one resident's records.
#[must_use]
pub fn filter_by_resident(records: &[IncidentRecord], resident: &str) -> Vec<IncidentRecord> {
    records
        .iter()
        .filter(|r| r.resident_name.as_deref() == Some(resident))
        .cloned()
        .collect()
}

/// Per-resident counts over records that actually carry a resident name.
fn named_resident_counts(records: &[IncidentRecord]) -> AggregateResult {
    let mut counter = Counter::new();
    for record in records {
        if let Some(name) = non_empty(record.resident_name.as_deref()) {
            counter.add(name.to_string());
        }
    }
    counter.finish()
}

fn outcome_stats(records: &[IncidentRecord]) -> OutcomeStats {
    let mut stats = OutcomeStats::default();
    for record in records {
        let has_interventions = non_empty(record.interventions.as_deref()).is_some();
        let Some(outcome) = non_empty(record.outcome.as_deref()) else {
            continue;
        };
        if !has_interventions {
            continue;
        }
        stats.with_interventions_and_outcome += 1;
        if contains_any(&outcome.to_lowercase(), POSITIVE_OUTCOME_MARKERS) {
            stats.positive += 1;
        }
    }
    stats
}

/// Incidents per day over the inclusive span from the earliest to the latest
/// date in the series; 0 when no record has a parseable date.
#[allow(clippy::cast_precision_loss)]
fn average_per_day(total: u64, series: &[TimeSeriesPoint]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    let (Some(start), Some(end)) = (parse_date(&first.date), parse_date(&last.date)) else {
        return 0.0;
    };
    let span_days = (end - start).num_days() + 1;
    total as f64 / span_days as f64
}

/// Runs the full analysis for one facility's record set.
#[must_use]
pub fn analyze(
    records: &[IncidentRecord],
    facility: &str,
    registry: &ShiftRegistry,
) -> AnalysisReport {
    let total_incidents = records.len() as u64;

    let resident_counts = named_resident_counts(records);
    let residents_affected = resident_counts.len() as u64;

    let daily_trend = daily_totals(records);
    let trend = trend_of_series(&daily_trend);
    let days_with_data = daily_trend.len() as u64;
    let avg_per_day = average_per_day(total_incidents, &daily_trend);

    let most_common_type = count_by_behaviour_type(records).top().cloned();

    let shift_counts = count_by_shift(records, facility, registry);
    let peak_shift = shift_counts.top().cloned();

    let mut top_triggers = count_triggers(records);
    top_triggers.truncate(TOP_FRAGMENT_LIMIT);
    let mut top_interventions = count_interventions(records);
    top_interventions.truncate(TOP_FRAGMENT_LIMIT);

    let insights = synthesize(&InsightSummary {
        total_incidents,
        residents_affected,
        trend: trend.clone(),
        most_common_type: most_common_type.clone(),
        peak_shift: peak_shift.clone(),
        top_triggers: top_triggers.entries().to_vec(),
        resident_counts: resident_counts.into_entries(),
        outcome_stats: outcome_stats(records),
    });

    log::debug!(
        "analyzed {total_incidents} incidents for facility {facility}: {} insights",
        insights.len(),
    );

    AnalysisReport {
        summary: AnalysisSummary {
            total_incidents,
            residents_affected,
            avg_per_day,
            days_with_data,
            most_common_type,
            peak_shift,
            shift_counts: shift_counts.into_entries(),
        },
        trend,
        daily_trend,
        top_triggers: top_triggers.into_entries(),
        top_interventions: top_interventions.into_entries(),
        insights,
    }
}

/// Detects patterns in a single resident's history (the personalized view).
///
/// Callers pass the already-filtered record set, e.g. from
/// [`filter_by_resident`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn personalized_patterns(
    records: &[IncidentRecord],
    facility: &str,
    registry: &ShiftRegistry,
) -> Vec<PersonalizedPattern> {
    let mut patterns = Vec::new();
    let total = records.len();

    let shifts = count_by_shift(records, facility, registry);
    if let Some(dominant) = shifts.top()
        && total > 0
        && dominant.count as f64 > total as f64 * PERSONAL_TIME_SHARE
    {
        patterns.push(PersonalizedPattern {
            title: format!("Time Pattern: {}", dominant.label),
            description: format!(
                "Most incidents occur during {} hours.",
                dominant.label.to_lowercase(),
            ),
            details: Some(
                "Consider scheduling proactive interventions or increased monitoring \
                 during this time period."
                    .to_string(),
            ),
        });
    }

    let types = count_by_behaviour_type(records);
    if let Some(dominant) = types.top()
        && dominant.count > 1
        && dominant.label != UNKNOWN_CATEGORY
    {
        patterns.push(PersonalizedPattern {
            title: format!("Primary Behaviour: {}", dominant.label),
            description: format!(
                "The most frequent behaviour type is \"{}\" ({} occurrences).",
                dominant.label, dominant.count,
            ),
            details: Some(
                "Focus interventions on managing this specific behaviour type.".to_string(),
            ),
        });
    }

    // Length-gated rather than noise-filtered: in a single resident's
    // history even near-boilerplate repetition is worth surfacing.
    let mut trigger_counter = Counter::new();
    for record in records {
        if let Some(text) = record.triggers.as_deref() {
            for fragment in split_fragments(text) {
                if fragment.chars().count() >= PERSONAL_TRIGGER_MIN_CHARS {
                    trigger_counter.add(fragment.to_string());
                }
            }
        }
    }
    let triggers = trigger_counter.finish();
    if let Some(top) = triggers.top()
        && top.count > 1
    {
        patterns.push(PersonalizedPattern {
            title: format!("Common Trigger: {}", top.label),
            description: format!("\"{}\" appears {} times as a trigger.", top.label, top.count),
            details: Some(
                "Develop proactive strategies to address this trigger before incidents \
                 occur."
                    .to_string(),
            ),
        });
    }

    let series = daily_totals(records);
    let dated: u64 = series.iter().map(|p| p.count).sum();
    if dated >= 2
        && let (Some(first), Some(last)) = (series.first(), series.last())
        && let (Some(start), Some(end)) = (parse_date(&first.date), parse_date(&last.date))
    {
        let span_days = (end - start).num_days() + 1;
        let rate = total as f64 / span_days as f64;
        if rate > PERSONAL_FREQUENCY_RATE {
            patterns.push(PersonalizedPattern {
                title: "High Frequency Pattern".to_string(),
                description: format!(
                    "Incidents occur approximately every {:.1} days on average.",
                    1.0 / rate,
                ),
                details: Some(
                    "This resident requires close monitoring and proactive intervention \
                     strategies."
                        .to_string(),
                ),
            });
        }
    }

    patterns
}
