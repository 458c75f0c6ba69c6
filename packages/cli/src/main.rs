#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operator CLI for the behaviour incident analytics engine.
//!
//! Loads a JSON array of incident records (as exported by the dashboard's
//! persistence layer), runs the analysis for one facility, and prints the
//! report as text or JSON. `--mark-follow-ups` runs the post-fall annotation
//! pass instead and re-emits the annotated records.

use std::fs;
use std::path::PathBuf;

use carewatch_analytics::annotate::mark_post_fall_notes;
use carewatch_analytics::report::{analyze, filter_by_resident, personalized_patterns};
use carewatch_analytics_models::{AnalysisReport, PersonalizedPattern};
use carewatch_behaviour_models::IncidentRecord;
use carewatch_shifts::ShiftRegistry;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "carewatch-cli",
    about = "Behaviour incident analysis over a JSON record export"
)]
struct Args {
    /// Path to a JSON array of incident records.
    #[arg(long)]
    input: PathBuf,

    /// Facility identifier used for shift classification.
    #[arg(long)]
    facility: String,

    /// Restrict the analysis to a single resident (personalized view).
    #[arg(long)]
    resident: Option<String>,

    /// Run the post-fall annotation pass and emit the annotated records
    /// instead of a report.
    #[arg(long)]
    mark_follow_ups: bool,

    /// Emit the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)?;
    let mut records: Vec<IncidentRecord> = serde_json::from_str(&text)?;
    log::info!("loaded {} records from {}", records.len(), args.input.display());

    if args.mark_follow_ups {
        mark_post_fall_notes(&mut records);
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let registry = ShiftRegistry::embedded()?;
    let records = match args.resident.as_deref() {
        Some(resident) => filter_by_resident(&records, resident),
        None => records,
    };

    let report = analyze(&records, &args.facility, &registry);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);

    if let Some(resident) = args.resident.as_deref() {
        let patterns = personalized_patterns(&records, &args.facility, &registry);
        print_patterns(resident, &patterns);
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let summary = &report.summary;
    println!("Total incidents:  {}", summary.total_incidents);
    println!("Residents:        {}", summary.residents_affected);
    println!(
        "Average per day:  {:.1} ({} days with data)",
        summary.avg_per_day, summary.days_with_data,
    );
    println!(
        "Trend:            {} (first half {:.1}/day, second half {:.1}/day)",
        report.trend.direction, report.trend.first_half_average, report.trend.second_half_average,
    );
    if let Some(most_common) = &summary.most_common_type {
        println!(
            "Most common type: {} ({} occurrences)",
            most_common.label, most_common.count,
        );
    }
    if let Some(peak) = &summary.peak_shift {
        println!("Peak shift:       {} ({} incidents)", peak.label, peak.count);
    }

    if !report.top_triggers.is_empty() {
        println!("\nTop triggers:");
        for entry in &report.top_triggers {
            println!("  {:>4}  {}", entry.count, entry.label);
        }
    }
    if !report.top_interventions.is_empty() {
        println!("\nTop interventions:");
        for entry in &report.top_interventions {
            println!("  {:>4}  {}", entry.count, entry.label);
        }
    }

    println!("\nInsights:");
    for insight in &report.insights {
        println!("  [{}] {}", insight.severity, insight.title);
        println!("         {}", insight.description);
    }
}

fn print_patterns(resident: &str, patterns: &[PersonalizedPattern]) {
    if patterns.is_empty() {
        return;
    }
    println!("\nPatterns for {resident}:");
    for pattern in patterns {
        println!("  {}", pattern.title);
        println!("    {}", pattern.description);
        if let Some(details) = &pattern.details {
            println!("    {details}");
        }
    }
}
