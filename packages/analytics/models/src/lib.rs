#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytics result types for the behaviour incident engine.
//!
//! Defines the aggregate/trend/insight output types the engine produces and
//! the dashboard frontend renders. All API-facing types serialize camelCase.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Count of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label (location name, resident name, weekday, ...).
    pub label: String,
    /// Number of incidents.
    pub count: u64,
}

impl CategoryCount {
    /// Convenience constructor.
    #[must_use]
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A frequency table over one dimension's categories.
///
/// Entries are held in display order: descending count, ties broken by
/// first-seen order. Serializes as a plain ordered list of `(label, count)`
/// pairs so the frontend can render it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult {
    entries: Vec<CategoryCount>,
}

impl AggregateResult {
    /// Builds a result from entries in first-seen order, sorting them into
    /// display order (descending count; the stable sort preserves first-seen
    /// order among ties).
    #[must_use]
    pub fn from_first_seen(mut entries: Vec<CategoryCount>) -> Self {
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    /// The entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    /// Consumes the result, yielding the ordered entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<CategoryCount> {
        self.entries
    }

    /// Looks up a single category's count.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    /// The entry with the highest count, if any.
    #[must_use]
    pub fn top(&self) -> Option<&CategoryCount> {
        self.entries.first()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the first `n` entries (already in display order).
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }
}

/// The dimension an aggregation groups by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Dimension {
    /// `location`, falling back to `incidentLocation`.
    Location,
    /// Exact injury text; missing values counted as `"Unknown"`.
    Injury,
    /// Incident/behaviour type; missing values counted as `"Unknown"`.
    BehaviourType,
    /// Resident name; missing values counted as `"Unknown"`.
    Resident,
    /// Weekday of the incident date; all seven buckets pre-seeded.
    DayOfWeek,
    /// Hour of day 0–23; all 24 buckets pre-seeded.
    Hour,
    /// `unit`, falling back to `room`, whitespace-trimmed.
    Unit,
    /// Noise-filtered trigger fragments.
    Triggers,
    /// Noise-filtered intervention fragments.
    Interventions,
    /// HIR flag — a scalar count, not a frequency table.
    Hir,
}

/// Options controlling an aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Keep only the top `n` categories by count (ties broken by first-seen
    /// order). `None` means the full breakdown.
    pub top_n: Option<usize>,
}

/// Direction of the incident-volume trend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendDirection {
    /// Second half of the period is meaningfully busier.
    Increasing,
    /// Second half of the period is meaningfully quieter.
    Decreasing,
    /// No meaningful change (or not enough data to tell).
    Stable,
}

/// Incident-volume trend over the data's date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    /// Classified direction.
    pub direction: TrendDirection,
    /// Mean daily incident count over the first half of the distinct dates.
    pub first_half_average: f64,
    /// Mean daily incident count over the second half.
    pub second_half_average: f64,
}

impl TrendResult {
    /// A trend with no data: stable, both averages zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            direction: TrendDirection::Stable,
            first_half_average: 0.0,
            second_half_average: 0.0,
        }
    }
}

/// One day's incident total, for the trend-over-time chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// ISO `YYYY-MM-DD` date.
    pub date: String,
    /// Incidents on that date.
    pub count: u64,
}

/// Severity of a synthesized insight.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InsightSeverity {
    /// Needs attention.
    High,
    /// Worth reviewing.
    Medium,
    /// Informational.
    Low,
}

/// A rule-derived statement about the aggregated data.
///
/// Insights are produced in the rule set's fixed order; callers must not
/// re-sort them by severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Short heading.
    pub title: String,
    /// One- or two-sentence explanation.
    pub description: String,
    /// Severity band for display.
    pub severity: InsightSeverity,
}

/// How often interventions with a recorded outcome read as successful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeStats {
    /// Records with both `interventions` and `outcome` populated.
    pub with_interventions_and_outcome: u64,
    /// Of those, how many outcomes read as positive.
    pub positive: u64,
}

impl OutcomeStats {
    /// Positive outcomes as a percentage, or `None` when no record has both
    /// fields populated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn positive_percentage(self) -> Option<f64> {
        if self.with_interventions_and_outcome == 0 {
            None
        } else {
            Some(self.positive as f64 / self.with_interventions_and_outcome as f64 * 100.0)
        }
    }
}

/// Everything the insight rule set looks at, bundled by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    /// Total incidents analyzed.
    pub total_incidents: u64,
    /// Distinct residents with at least one incident.
    pub residents_affected: u64,
    /// Volume trend over the period.
    pub trend: TrendResult,
    /// Dominant incident type with its count, if any record had one.
    pub most_common_type: Option<CategoryCount>,
    /// Busiest shift with its count (`Unknown` never counted).
    pub peak_shift: Option<CategoryCount>,
    /// Top noise-filtered trigger fragments, busiest first.
    pub top_triggers: Vec<CategoryCount>,
    /// Per-resident incident counts, busiest first (untruncated).
    pub resident_counts: Vec<CategoryCount>,
    /// Intervention-outcome effectiveness sample.
    pub outcome_stats: OutcomeStats,
}

/// Headline numbers for the dashboard's summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Total incidents analyzed.
    pub total_incidents: u64,
    /// Distinct residents with at least one incident.
    pub residents_affected: u64,
    /// Incidents per day over the inclusive span from the earliest to the
    /// latest parseable date (0 when no date parses).
    pub avg_per_day: f64,
    /// Distinct parseable dates with at least one incident.
    pub days_with_data: u64,
    /// Dominant incident type with its count.
    pub most_common_type: Option<CategoryCount>,
    /// Busiest shift with its count.
    pub peak_shift: Option<CategoryCount>,
    /// Morning/Evening/Night totals in display order.
    pub shift_counts: Vec<CategoryCount>,
}

/// The full analytics payload for one facility and record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Headline numbers.
    pub summary: AnalysisSummary,
    /// Volume trend classification.
    pub trend: TrendResult,
    /// Ordered daily totals for the trend chart.
    pub daily_trend: Vec<TimeSeriesPoint>,
    /// Top noise-filtered triggers.
    pub top_triggers: Vec<CategoryCount>,
    /// Top noise-filtered interventions.
    pub top_interventions: Vec<CategoryCount>,
    /// Rule-derived insights, in rule order.
    pub insights: Vec<Insight>,
}

/// A pattern detected in a single resident's incident history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedPattern {
    /// Short heading.
    pub title: String,
    /// What the pattern is.
    pub description: String,
    /// Suggested follow-up, when the rule has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_result_sorts_descending_with_stable_ties() {
        let result = AggregateResult::from_first_seen(vec![
            CategoryCount::new("Hallway", 2),
            CategoryCount::new("Dining Room", 5),
            CategoryCount::new("Bedroom", 2),
        ]);
        let labels: Vec<&str> = result.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Dining Room", "Hallway", "Bedroom"]);
    }

    #[test]
    fn aggregate_result_lookup_and_totals() {
        let result = AggregateResult::from_first_seen(vec![
            CategoryCount::new("A", 3),
            CategoryCount::new("B", 1),
        ]);
        assert_eq!(result.get("A"), Some(3));
        assert_eq!(result.get("missing"), None);
        assert_eq!(result.total(), 4);
        assert_eq!(result.top().unwrap().label, "A");
    }

    #[test]
    fn aggregate_result_serializes_as_ordered_pairs() {
        let result = AggregateResult::from_first_seen(vec![CategoryCount::new("A", 3)]);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"[{"label":"A","count":3}]"#
        );
    }

    #[test]
    fn dimension_parses_camel_case_names() {
        assert_eq!(
            "dayOfWeek".parse::<Dimension>().unwrap(),
            Dimension::DayOfWeek
        );
        assert_eq!(
            "triggers".parse::<Dimension>().unwrap(),
            Dimension::Triggers
        );
        assert!("notADimension".parse::<Dimension>().is_err());
    }

    #[test]
    fn outcome_percentage_handles_empty_sample() {
        assert_eq!(OutcomeStats::default().positive_percentage(), None);
        let stats = OutcomeStats {
            with_interventions_and_outcome: 4,
            positive: 1,
        };
        assert!((stats.positive_percentage().unwrap() - 25.0).abs() < f64::EPSILON);
    }
}
