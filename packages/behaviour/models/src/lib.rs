#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Behaviour incident record types and flag vocabulary.
//!
//! This crate defines the canonical incident record shape shared across the
//! CareWatch system. Records arrive from the upstream document-extraction
//! pipeline with every field optional and frequently dirty; all analytics
//! code must tolerate missing or malformed values rather than reject them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Shift-of-day classification for an incident.
///
/// `Unknown` is a reported classification for unparseable or unconfigured
/// times, not an error. It must never be counted alongside the three real
/// shifts in any aggregate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Shift {
    /// Day shift.
    Morning,
    /// Afternoon/evening shift.
    Evening,
    /// Overnight shift.
    Night,
    /// Time missing, unparseable, or facility not configured.
    Unknown,
}

impl Shift {
    /// The three real shifts, in the order they are evaluated and displayed.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &[Self::Morning, Self::Evening, Self::Night]
    }

    /// Returns `true` unless this is the `Unknown` sentinel.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Review-flag color written back onto records by the annotation pass.
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
pub enum ColorStatus {
    /// Needs follow-up.
    Red,
    /// No follow-up required.
    Default,
}

/// Record identity as it appears in extracted documents: sometimes a number,
/// sometimes a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric id.
    Number(i64),
    /// String id (usually a decimal rendering of the number).
    Text(String),
}

impl RecordId {
    /// Interprets the id as a non-negative array index, if it parses as one.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Number(n) => usize::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse::<usize>().ok(),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One documented behaviour incident.
///
/// Every field except identity is optional. Serde aliases absorb the legacy
/// spellings that still appear in documents extracted before the field names
/// were standardized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentRecord {
    /// Stable identity, unique within a reporting period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Calendar date, ISO `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Wall-clock time `HH:MM[:SS]`, facility-local.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Resident the incident concerns.
    #[serde(alias = "name", skip_serializing_if = "Option::is_none")]
    pub resident_name: Option<String>,
    /// Incident type label.
    #[serde(alias = "incident_type", skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Behaviour type label, used as an incident-type fallback by analytics.
    #[serde(alias = "behaviour_type", skip_serializing_if = "Option::is_none")]
    pub behaviour_type: Option<String>,
    /// Where the incident occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Legacy location field some extractors still emit.
    #[serde(alias = "incident_location", skip_serializing_if = "Option::is_none")]
    pub incident_location: Option<String>,
    /// Home unit/wing.
    #[serde(alias = "homeUnit", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Room, used as a unit fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Free text: what preceded the incident. Delimiter-separated list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<String>,
    /// Free text: what was done in response. Delimiter-separated list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interventions: Option<String>,
    /// Injury description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury: Option<String>,
    /// Hospital Incident Report flag ("yes"/"no").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hir: Option<String>,
    /// Whether the resident was transferred to hospital ("yes"/"no").
    #[serde(alias = "transfer_to_hospital", skip_serializing_if = "Option::is_none")]
    pub transfer_to_hospital: Option<String>,
    /// Whether the Power of Attorney was contacted ("yes"/"no").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poa_contacted: Option<String>,
    /// Number of post-fall progress notes documented.
    #[serde(alias = "postFallNotes", skip_serializing_if = "Option::is_none")]
    pub post_fall_notes_count: Option<i64>,
    /// Free text outcome of the incident/interventions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// Derived by the annotation pass: post-fall documentation flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_fall_notes_color: Option<ColorStatus>,
    /// Derived by the annotation pass: POA contact flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poa_contacted_color: Option<ColorStatus>,
}

/// Returns `true` if the flag value case-insensitively reads "yes".
#[must_use]
pub fn is_affirmative(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"))
}

/// Returns `true` if the flag value case-insensitively reads "no".
///
/// A missing flag is neither affirmative nor negative.
#[must_use]
pub fn is_negative(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("no"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_parses_as_index() {
        assert_eq!(RecordId::Number(7).as_index(), Some(7));
        assert_eq!(RecordId::Text("12".to_string()).as_index(), Some(12));
        assert_eq!(RecordId::Text(" 3 ".to_string()).as_index(), Some(3));
        assert_eq!(RecordId::Number(-1).as_index(), None);
        assert_eq!(RecordId::Text("abc".to_string()).as_index(), None);
    }

    #[test]
    fn affirmative_and_negative_flags() {
        assert!(is_affirmative(Some("Yes")));
        assert!(is_affirmative(Some(" YES ")));
        assert!(!is_affirmative(Some("no")));
        assert!(!is_affirmative(None));
        assert!(is_negative(Some("No")));
        assert!(!is_negative(Some("yes")));
        assert!(!is_negative(None));
    }

    #[test]
    fn deserializes_legacy_field_spellings() {
        let record: IncidentRecord = serde_json::from_str(
            r#"{
                "id": "4",
                "name": "J. Doe",
                "behaviour_type": "Wandering",
                "incident_location": "Hallway",
                "homeUnit": "East 2",
                "transfer_to_hospital": "No",
                "postFallNotes": 2
            }"#,
        )
        .unwrap();

        assert_eq!(record.id, Some(RecordId::Text("4".to_string())));
        assert_eq!(record.resident_name.as_deref(), Some("J. Doe"));
        assert_eq!(record.behaviour_type.as_deref(), Some("Wandering"));
        assert_eq!(record.incident_location.as_deref(), Some("Hallway"));
        assert_eq!(record.unit.as_deref(), Some("East 2"));
        assert_eq!(record.transfer_to_hospital.as_deref(), Some("No"));
        assert_eq!(record.post_fall_notes_count, Some(2));
    }

    #[test]
    fn color_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ColorStatus::Red).unwrap(),
            "\"red\""
        );
        assert_eq!(ColorStatus::Default.to_string(), "default");
    }

    #[test]
    fn unknown_shift_is_not_known() {
        assert!(Shift::Morning.is_known());
        assert!(!Shift::Unknown.is_known());
        assert_eq!(Shift::known().len(), 3);
    }
}
