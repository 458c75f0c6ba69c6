//! Incident-volume trend over the record set's date range.
//!
//! Records are bucketed into daily totals, the distinct dates are split into
//! halves at `floor(n / 2)`, and the half means are compared against a ratio
//! band. The comparison operates on daily totals, never raw records, so a
//! busy single day cannot masquerade as a trend.

use std::collections::BTreeMap;

use carewatch_analytics_models::{TimeSeriesPoint, TrendDirection, TrendResult};
use carewatch_behaviour_models::IncidentRecord;
use chrono::NaiveDate;

/// Second-half mean must exceed the first-half mean by this ratio to
/// classify as increasing.
pub const INCREASING_RATIO: f64 = 1.1;
/// Second-half mean must fall below the first-half mean by this ratio to
/// classify as decreasing.
pub const DECREASING_RATIO: f64 = 0.9;

/// Parses an ISO `YYYY-MM-DD` date; lenient about zero-padding.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Buckets records into per-day totals, ordered by date ascending. Records
/// with a missing or unparseable date are excluded here only.
#[must_use]
pub fn daily_totals(records: &[IncidentRecord]) -> Vec<TimeSeriesPoint> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date.as_deref().and_then(parse_date) {
            *days.entry(date).or_insert(0) += 1;
        }
    }
    days.into_iter()
        .map(|(date, count)| TimeSeriesPoint {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Classifies the volume trend for a record set.
#[must_use]
pub fn analyze_trend(records: &[IncidentRecord]) -> TrendResult {
    trend_of_series(&daily_totals(records))
}

/// Classifies the volume trend of an already-bucketed daily series.
///
/// With zero distinct days both halves are empty and both averages are 0.
/// With a single distinct day the comparison degenerates: both averages are
/// that day's total and the direction is stable.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trend_of_series(series: &[TimeSeriesPoint]) -> TrendResult {
    match series.len() {
        0 => TrendResult::empty(),
        1 => {
            let average = series[0].count as f64;
            TrendResult {
                direction: TrendDirection::Stable,
                first_half_average: average,
                second_half_average: average,
            }
        }
        n => {
            let split = n / 2;
            let first_half_average = mean(&series[..split]);
            let second_half_average = mean(&series[split..]);
            let direction = if second_half_average > first_half_average * INCREASING_RATIO {
                TrendDirection::Increasing
            } else if second_half_average < first_half_average * DECREASING_RATIO {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            };
            TrendResult {
                direction,
                first_half_average,
                second_half_average,
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(points: &[TimeSeriesPoint]) -> f64 {
    if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.count).sum::<u64>() as f64 / points.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_for(day_counts: &[(&str, u64)]) -> Vec<IncidentRecord> {
        let mut records = Vec::new();
        for (date, count) in day_counts {
            for _ in 0..*count {
                records.push(IncidentRecord {
                    date: Some((*date).to_string()),
                    ..IncidentRecord::default()
                });
            }
        }
        records
    }

    #[test]
    fn rising_second_half_classifies_increasing() {
        let records = records_for(&[
            ("2024-01-01", 1),
            ("2024-01-02", 1),
            ("2024-01-03", 1),
            ("2024-01-04", 5),
            ("2024-01-05", 5),
        ]);
        let trend = analyze_trend(&records);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!((trend.first_half_average - 1.0).abs() < f64::EPSILON);
        assert!((trend.second_half_average - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn falling_second_half_classifies_decreasing() {
        let records = records_for(&[
            ("2024-01-01", 6),
            ("2024-01-02", 6),
            ("2024-01-03", 1),
            ("2024-01-04", 1),
        ]);
        let trend = analyze_trend(&records);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn small_changes_stay_stable() {
        let records = records_for(&[
            ("2024-01-01", 10),
            ("2024-01-02", 10),
            ("2024-01-03", 10),
            ("2024-01-04", 11),
        ]);
        let trend = analyze_trend(&records);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn single_day_is_stable_with_that_days_average() {
        let records = records_for(&[("2024-01-01", 5)]);
        let trend = analyze_trend(&records);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!((trend.first_half_average - 5.0).abs() < f64::EPSILON);
        assert!((trend.second_half_average - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_parseable_dates_is_stable_zero() {
        let records = vec![
            IncidentRecord {
                date: Some("garbage".to_string()),
                ..IncidentRecord::default()
            },
            IncidentRecord::default(),
        ];
        let trend = analyze_trend(&records);
        assert_eq!(trend, TrendResult::empty());
    }

    #[test]
    fn daily_totals_are_date_ordered() {
        let records = records_for(&[("2024-02-01", 2), ("2024-01-05", 1), ("2024-01-20", 3)]);
        let series = daily_totals(&records);
        let dates: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-20", "2024-02-01"]);
        assert_eq!(series[0].count, 1);
    }
}
