//! Post-fall review annotation pass.
//!
//! Walks the records in chronological `(date, time)` order and writes two
//! review-flag colors back onto the original array: one for thin post-fall
//! documentation, one for a missed POA contact. The write-back target is
//! resolved through each record's declared id, which the upstream reporting
//! pipeline assigns as the record's offset in the uploaded document — see
//! [`resolve_original_index`].

use carewatch_behaviour_models::{ColorStatus, IncidentRecord, RecordId, is_negative};
use chrono::{NaiveDateTime, NaiveTime};

use crate::trend::parse_date;

/// Fewer documented post-fall notes than this flags the record, unless the
/// resident was transferred to hospital.
pub const REQUIRED_POST_FALL_NOTES: i64 = 3;

/// Resolves a record's declared id to a position in the original, unsorted
/// array.
///
/// The id is assumed equal to the record's offset in the uploaded document.
/// Ids that do not parse as a non-negative integer, or that fall outside the
/// array, resolve to `None` and the record is skipped without error.
#[must_use]
pub fn resolve_original_index(id: &RecordId, len: usize) -> Option<usize> {
    id.as_index().filter(|&index| index < len)
}

/// Combined `(date, time)` timestamp for chronological ordering. A missing
/// or unparseable date yields `None` (such records sort first, relative
/// order unspecified); a missing or unparseable time defaults to midnight.
fn record_timestamp(record: &IncidentRecord) -> Option<NaiveDateTime> {
    let date = record.date.as_deref().and_then(parse_date)?;
    let time = record
        .time
        .as_deref()
        .and_then(parse_time)
        .unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Flags every resolvable record with both review colors.
///
/// `postFallNotesColor` turns red when fewer than
/// [`REQUIRED_POST_FALL_NOTES`] notes are documented and the resident was
/// not transferred to hospital; `poaContactedColor` turns red when the POA
/// contact flag reads "no". Records are processed in chronological order but
/// the colors land on the original array position named by each record's id.
pub fn mark_post_fall_notes(records: &mut [IncidentRecord]) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&position| record_timestamp(&records[position]));

    for position in order {
        let record = &records[position];
        let Some(target) = record
            .id
            .as_ref()
            .and_then(|id| resolve_original_index(id, records.len()))
        else {
            continue;
        };

        let notes = record.post_fall_notes_count.unwrap_or(0);
        let not_hospitalized = is_negative(record.transfer_to_hospital.as_deref());
        let post_fall_color = if notes < REQUIRED_POST_FALL_NOTES && not_hospitalized {
            ColorStatus::Red
        } else {
            ColorStatus::Default
        };
        let poa_color = if is_negative(record.poa_contacted.as_deref()) {
            ColorStatus::Red
        } else {
            ColorStatus::Default
        };

        records[target].post_fall_notes_color = Some(post_fall_color);
        records[target].poa_contacted_color = Some(poa_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: serde_json::Value) -> IncidentRecord {
        serde_json::from_value(fields).unwrap()
    }

    #[test]
    fn thin_documentation_without_hospital_transfer_flags_red() {
        let mut records = vec![
            record(serde_json::json!({"id": 0, "date": "2024-03-01", "time": "09:00"})),
            record(serde_json::json!({"id": 1, "date": "2024-03-02", "time": "10:00"})),
            record(serde_json::json!({
                "id": "2",
                "date": "2024-03-03",
                "time": "11:00",
                "postFallNotes": 1,
                "transferToHospital": "No"
            })),
        ];
        mark_post_fall_notes(&mut records);
        assert_eq!(records[2].post_fall_notes_color, Some(ColorStatus::Red));
    }

    #[test]
    fn hospital_transfer_suppresses_the_documentation_flag() {
        let mut records = vec![record(serde_json::json!({
            "id": 0,
            "date": "2024-03-01",
            "postFallNotes": 0,
            "transferToHospital": "Yes"
        }))];
        mark_post_fall_notes(&mut records);
        assert_eq!(records[0].post_fall_notes_color, Some(ColorStatus::Default));
    }

    #[test]
    fn missing_transfer_flag_is_not_negative() {
        let mut records = vec![record(serde_json::json!({
            "id": 0,
            "date": "2024-03-01",
            "postFallNotes": 0
        }))];
        mark_post_fall_notes(&mut records);
        assert_eq!(records[0].post_fall_notes_color, Some(ColorStatus::Default));
    }

    #[test]
    fn uncontacted_poa_flags_red() {
        let mut records = vec![
            record(serde_json::json!({"id": 0, "date": "2024-03-01", "poaContacted": "No"})),
            record(serde_json::json!({"id": 1, "date": "2024-03-02", "poaContacted": "Yes"})),
        ];
        mark_post_fall_notes(&mut records);
        assert_eq!(records[0].poa_contacted_color, Some(ColorStatus::Red));
        assert_eq!(records[1].poa_contacted_color, Some(ColorStatus::Default));
    }

    #[test]
    fn colors_land_on_the_position_named_by_the_id() {
        // Stored out of chronological order; ids name original positions.
        let mut records = vec![
            record(serde_json::json!({
                "id": 1,
                "date": "2024-03-05",
                "postFallNotes": 5,
                "transferToHospital": "No"
            })),
            record(serde_json::json!({
                "id": 0,
                "date": "2024-03-01",
                "postFallNotes": 0,
                "transferToHospital": "No"
            })),
        ];
        mark_post_fall_notes(&mut records);
        // The record carrying id 0 (thin documentation) colors position 0.
        assert_eq!(records[0].post_fall_notes_color, Some(ColorStatus::Red));
        assert_eq!(records[1].post_fall_notes_color, Some(ColorStatus::Default));
    }

    #[test]
    fn unresolvable_ids_are_skipped_without_error() {
        let mut records = vec![
            record(serde_json::json!({"id": "seven", "date": "2024-03-01"})),
            record(serde_json::json!({"id": 99, "date": "2024-03-02"})),
            record(serde_json::json!({"date": "2024-03-03"})),
        ];
        mark_post_fall_notes(&mut records);
        for r in &records {
            assert_eq!(r.post_fall_notes_color, None);
            assert_eq!(r.poa_contacted_color, None);
        }
    }

    #[test]
    fn running_twice_is_idempotent() {
        let mut records = vec![
            record(serde_json::json!({
                "id": 0,
                "date": "2024-03-01",
                "time": "22:15",
                "postFallNotes": 1,
                "transferToHospital": "No",
                "poaContacted": "No"
            })),
            record(serde_json::json!({"id": 1, "date": "2024-03-02", "time": "04:00"})),
        ];
        mark_post_fall_notes(&mut records);
        let first_pass = records.clone();
        mark_post_fall_notes(&mut records);
        assert_eq!(records, first_pass);
    }

    #[test]
    fn invalid_timestamps_do_not_panic() {
        let mut records = vec![
            record(serde_json::json!({"id": 0, "date": "not-a-date", "time": "whenever"})),
            record(serde_json::json!({"id": 1, "date": "2024-03-02"})),
        ];
        mark_post_fall_notes(&mut records);
        assert!(records.iter().all(|r| r.post_fall_notes_color.is_some()));
    }
}
