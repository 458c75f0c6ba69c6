//! Threshold-driven insight synthesis.
//!
//! A fixed set of rules evaluated in a fixed order; every rule that matches
//! fires, none suppresses another, and the output keeps rule order (the
//! dashboard renders it as-is — callers must not re-sort by severity). If
//! nothing fires, a single fallback insight says the analysis completed
//! without specific flags.

use carewatch_analytics_models::{CategoryCount, Insight, InsightSeverity, InsightSummary, TrendDirection};

use crate::aggregate::UNKNOWN_CATEGORY;

/// Share of all incidents one shift must exceed to be called out.
pub const PEAK_SHIFT_SHARE: f64 = 0.3;
/// Multiplier over the mean per-resident count that flags a resident.
pub const HIGH_FREQUENCY_MULTIPLIER: f64 = 2.0;
/// At most this many residents are named in the high-frequency insight.
pub const HIGH_FREQUENCY_LIMIT: usize = 3;
/// The top trigger must repeat more than this often to be called out.
pub const TRIGGER_REPEAT_THRESHOLD: u64 = 2;
/// Positive-outcome percentage below which effectiveness is flagged.
pub const EFFECTIVENESS_FLOOR_PCT: f64 = 50.0;

fn insight(
    title: impl Into<String>,
    description: impl Into<String>,
    severity: InsightSeverity,
) -> Insight {
    Insight {
        title: title.into(),
        description: description.into(),
        severity,
    }
}

/// Applies the rule set to a bundled summary, in fixed rule order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn synthesize(summary: &InsightSummary) -> Vec<Insight> {
    let mut insights = Vec::new();

    match summary.trend.direction {
        TrendDirection::Increasing => insights.push(insight(
            "Increasing Trend Detected",
            "Behaviour incidents are showing an increasing trend. Consider reviewing \
             recent interventions and triggers.",
            InsightSeverity::High,
        )),
        TrendDirection::Decreasing => insights.push(insight(
            "Improving Trend",
            "Behaviour incidents are decreasing, indicating positive outcomes from \
             current interventions.",
            InsightSeverity::Low,
        )),
        TrendDirection::Stable => {}
    }

    if let Some(peak) = &summary.peak_shift
        && summary.total_incidents > 0
        && peak.count as f64 > summary.total_incidents as f64 * PEAK_SHIFT_SHARE
    {
        let share = peak.count as f64 / summary.total_incidents as f64 * 100.0;
        insights.push(insight(
            format!("Peak Activity: {}", peak.label),
            format!(
                "Most incidents occur during {} hours ({share:.1}% of all incidents). \
                 Consider increasing staff presence or adjusting interventions during \
                 this time.",
                peak.label.to_lowercase(),
            ),
            InsightSeverity::Medium,
        ));
    }

    if let Some(top_type) = &summary.most_common_type
        && top_type.label != UNKNOWN_CATEGORY
    {
        insights.push(insight(
            format!("Focus Area: {}", top_type.label),
            format!(
                "{} is the most common behaviour type. Review interventions specific \
                 to this behaviour type.",
                top_type.label,
            ),
            InsightSeverity::Medium,
        ));
    }

    if summary.residents_affected > 1 {
        let mean = summary.total_incidents as f64 / summary.residents_affected as f64;
        let flagged: Vec<&CategoryCount> = summary
            .resident_counts
            .iter()
            .filter(|entry| entry.count as f64 >= mean * HIGH_FREQUENCY_MULTIPLIER)
            .take(HIGH_FREQUENCY_LIMIT)
            .collect();
        if !flagged.is_empty() {
            let names: Vec<&str> = flagged.iter().map(|entry| entry.label.as_str()).collect();
            insights.push(insight(
                "High-Frequency Residents",
                format!(
                    "The following residents have significantly more incidents than \
                     average: {}. Consider personalized care plans.",
                    names.join(", "),
                ),
                InsightSeverity::High,
            ));
        }
    }

    if let Some(top_trigger) = summary.top_triggers.first()
        && top_trigger.count > TRIGGER_REPEAT_THRESHOLD
    {
        insights.push(insight(
            format!("Common Trigger: {}", top_trigger.label),
            format!(
                "\"{}\" appears {} times as a trigger. Consider proactive \
                 interventions for this trigger.",
                top_trigger.label, top_trigger.count,
            ),
            InsightSeverity::Medium,
        ));
    }

    if let Some(rate) = summary.outcome_stats.positive_percentage()
        && rate < EFFECTIVENESS_FLOOR_PCT
    {
        insights.push(insight(
            "Intervention Effectiveness",
            format!(
                "Only {rate:.0}% of interventions show positive outcomes. Review and \
                 adjust intervention strategies.",
            ),
            InsightSeverity::High,
        ));
    }

    if insights.is_empty() {
        insights.push(insight(
            "Analysis Complete",
            "Review the charts and patterns above for detailed insights into \
             behaviour trends.",
            InsightSeverity::Low,
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use carewatch_analytics_models::{OutcomeStats, TrendResult};

    use super::*;

    fn base_summary() -> InsightSummary {
        InsightSummary {
            total_incidents: 0,
            residents_affected: 0,
            trend: TrendResult::empty(),
            most_common_type: None,
            peak_shift: None,
            top_triggers: Vec::new(),
            resident_counts: Vec::new(),
            outcome_stats: OutcomeStats::default(),
        }
    }

    #[test]
    fn empty_summary_yields_single_fallback() {
        let insights = synthesize(&base_summary());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Analysis Complete");
        assert_eq!(insights[0].severity, InsightSeverity::Low);
    }

    #[test]
    fn increasing_trend_is_high_severity() {
        let mut summary = base_summary();
        summary.trend.direction = TrendDirection::Increasing;
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Increasing Trend Detected");
        assert_eq!(insights[0].severity, InsightSeverity::High);
    }

    #[test]
    fn peak_shift_fires_above_thirty_percent_share() {
        let mut summary = base_summary();
        summary.total_incidents = 10;
        summary.peak_shift = Some(CategoryCount::new("Night", 4));
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Peak Activity: Night");
        assert!(insights[0].description.contains("40.0%"));

        summary.peak_shift = Some(CategoryCount::new("Night", 3));
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Analysis Complete");
    }

    #[test]
    fn unknown_dominant_type_is_not_a_focus_area() {
        let mut summary = base_summary();
        summary.most_common_type = Some(CategoryCount::new(UNKNOWN_CATEGORY, 9));
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Analysis Complete");

        summary.most_common_type = Some(CategoryCount::new("Aggression", 9));
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Focus Area: Aggression");
    }

    #[test]
    fn flags_high_frequency_resident_at_twice_the_mean() {
        // 10 incidents over 5 residents: mean 2, so >= 4 flags.
        let mut summary = base_summary();
        summary.total_incidents = 10;
        summary.residents_affected = 5;
        summary.resident_counts = vec![
            CategoryCount::new("M. Garcia", 6),
            CategoryCount::new("A. Chen", 1),
            CategoryCount::new("B. Patel", 1),
            CategoryCount::new("C. Rossi", 1),
            CategoryCount::new("D. Novak", 1),
        ];
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "High-Frequency Residents");
        assert!(insights[0].description.contains("M. Garcia"));
        assert!(!insights[0].description.contains("A. Chen"));
        assert_eq!(insights[0].severity, InsightSeverity::High);
    }

    #[test]
    fn single_resident_never_flags_high_frequency() {
        let mut summary = base_summary();
        summary.total_incidents = 6;
        summary.residents_affected = 1;
        summary.resident_counts = vec![CategoryCount::new("M. Garcia", 6)];
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Analysis Complete");
    }

    #[test]
    fn top_trigger_needs_more_than_two_occurrences() {
        let mut summary = base_summary();
        summary.top_triggers = vec![CategoryCount::new("Loud noise", 2)];
        assert_eq!(synthesize(&summary)[0].title, "Analysis Complete");

        summary.top_triggers = vec![CategoryCount::new("Loud noise", 3)];
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Common Trigger: Loud noise");
        assert!(insights[0].description.contains("3 times"));
    }

    #[test]
    fn low_effectiveness_is_flagged() {
        let mut summary = base_summary();
        summary.outcome_stats = OutcomeStats {
            with_interventions_and_outcome: 4,
            positive: 1,
        };
        let insights = synthesize(&summary);
        assert_eq!(insights[0].title, "Intervention Effectiveness");
        assert!(insights[0].description.contains("25%"));

        summary.outcome_stats = OutcomeStats {
            with_interventions_and_outcome: 4,
            positive: 2,
        };
        assert_eq!(synthesize(&summary)[0].title, "Analysis Complete");
    }

    #[test]
    fn rules_fire_in_fixed_order_without_suppression() {
        let mut summary = base_summary();
        summary.total_incidents = 10;
        summary.residents_affected = 2;
        summary.trend.direction = TrendDirection::Increasing;
        summary.peak_shift = Some(CategoryCount::new("Evening", 5));
        summary.most_common_type = Some(CategoryCount::new("Aggression", 4));
        summary.resident_counts = vec![
            CategoryCount::new("M. Garcia", 10),
            CategoryCount::new("A. Chen", 0),
        ];
        summary.top_triggers = vec![CategoryCount::new("Loud noise", 4)];
        summary.outcome_stats = OutcomeStats {
            with_interventions_and_outcome: 10,
            positive: 2,
        };

        let titles: Vec<String> = synthesize(&summary)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Increasing Trend Detected",
                "Peak Activity: Evening",
                "Focus Area: Aggression",
                "High-Frequency Residents",
                "Common Trigger: Loud noise",
                "Intervention Effectiveness",
            ]
        );
    }
}
