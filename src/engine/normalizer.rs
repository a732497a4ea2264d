//! Turns raw device submissions into canonical [`AttendanceRecord`]s.
//!
//! Timestamps end up in UTC: explicit `Z` values are kept, offset values are
//! converted, and unmarked clock values are read as if they were UTC.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::attendance::{AttendanceRecord, RawAttendance};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug)]
pub struct NormalizedBatch {
    pub records: Vec<AttendanceRecord>,
}

impl NormalizedBatch {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn confirmation(&self) -> String {
        format!("{} records saved successfully.", self.count())
    }
}

/// Normalizes a whole submission. Only an absent or empty batch is rejected.
pub fn normalize_batch(
    batch: Option<Vec<RawAttendance>>,
    received_at: DateTime<Utc>,
) -> AppResult<NormalizedBatch> {
    let batch = match batch {
        Some(b) if !b.is_empty() => b,
        _ => return Err(AppError::InvalidInput("Empty report list".to_string())),
    };

    let mut records: Vec<AttendanceRecord> = batch
        .into_iter()
        .map(|raw| normalize_one(raw, received_at))
        .collect();

    // Runs over the accepted batch once every timestamp is already UTC.
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(records.len());
    for record in &mut records {
        if !seen.insert(record.id) {
            let replacement = Uuid::new_v4();
            warn!(duplicate = %record.id, replacement = %replacement, "Repeated record id in batch");
            record.id = replacement;
            seen.insert(replacement);
        }
        backfill_check_in_date(record);
    }

    debug!(count = records.len(), "Normalized attendance batch");

    Ok(NormalizedBatch { records })
}

fn normalize_one(raw: RawAttendance, received_at: DateTime<Utc>) -> AttendanceRecord {
    let id = raw
        .id
        .as_deref()
        .and_then(parse_uuid)
        .unwrap_or_else(Uuid::new_v4);

    let user_id = match raw.user_id.as_deref().and_then(parse_uuid) {
        Some(user_id) => user_id,
        None => {
            warn!(record_id = %id, user_id = ?raw.user_id, "Unresolvable user id, storing as orphan");
            Uuid::nil()
        }
    };

    AttendanceRecord {
        id,
        user_id,
        full_name: trimmed(raw.full_name),
        designation: raw.designation.unwrap_or_default(),
        facility: raw.facility.unwrap_or_default(),
        phone_number: raw.phone_number.unwrap_or_default(),
        state: trimmed(raw.state),
        lga: trimmed(raw.lga),
        check_in_date: raw.check_in_date.as_deref().and_then(parse_date),
        check_out_date: raw.check_out_date.as_deref().and_then(parse_date),
        check_in: raw.check_in.as_deref().and_then(parse_timestamp),
        check_out: raw.check_out.as_deref().and_then(parse_timestamp),
        message: raw.message.unwrap_or_default(),
        success: raw.success.unwrap_or(false),
        received_at,
    }
}

fn backfill_check_in_date(record: &mut AttendanceRecord) {
    if record.check_in_date.is_none() {
        record.check_in_date = record
            .check_in
            .or(record.check_out)
            .map(|at| at.date_naive());
    }
}

fn parse_uuid(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parses an inbound timestamp into UTC. Unparsable input yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Date anchors go through the same UTC policy, then keep the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|at| at.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 20, 12, 0, 0).unwrap()
    }

    fn raw() -> RawAttendance {
        RawAttendance {
            user_id: Some("9b0d1c2e-3f4a-4b5c-8d6e-7f8091a2b3c4".into()),
            full_name: Some("Amina Bello".into()),
            facility: Some("Clinic-A".into()),
            success: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_missing_or_empty_batch() {
        assert!(matches!(
            normalize_batch(None, now()),
            Err(AppError::InvalidInput(msg)) if msg == "Empty report list"
        ));
        assert!(matches!(
            normalize_batch(Some(vec![]), now()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn keeps_every_record_in_the_batch() {
        let batch = vec![
            raw(),
            RawAttendance::default(),
            RawAttendance {
                id: Some("not-a-uuid".into()),
                check_in: Some("garbage".into()),
                ..Default::default()
            },
        ];

        let normalized = normalize_batch(Some(batch), now()).unwrap();
        assert_eq!(normalized.count(), 3);
        assert_eq!(normalized.confirmation(), "3 records saved successfully.");
    }

    #[test]
    fn keeps_valid_id_and_synthesizes_invalid_ones() {
        let id = "3f2b8c1e-6a7d-4e0b-9a51-0c2d5f7e8a90";
        let batch = vec![
            RawAttendance {
                id: Some(id.into()),
                ..raw()
            },
            RawAttendance {
                id: Some("42".into()),
                ..raw()
            },
        ];

        let records = normalize_batch(Some(batch), now()).unwrap().records;
        assert_eq!(records[0].id, Uuid::parse_str(id).unwrap());
        assert_ne!(records[1].id, Uuid::nil());
        assert_ne!(records[1].id, records[0].id);
    }

    #[test]
    fn unresolvable_user_id_becomes_orphan() {
        let batch = vec![RawAttendance {
            user_id: Some("staff-17".into()),
            ..raw()
        }];
        let records = normalize_batch(Some(batch), now()).unwrap().records;
        assert_eq!(records[0].user_id, Uuid::nil());
    }

    #[test]
    fn timestamps_follow_utc_policy() {
        assert_eq!(
            parse_timestamp("2025-10-20T08:30:00Z"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-10-20T08:30:00+01:00"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 7, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-10-20T08:30:00"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-10-20 08:30:00.250"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 8, 30, 0).unwrap() + chrono::Duration::milliseconds(250))
        );
        assert_eq!(
            parse_timestamp("2025-10-20"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("  "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn offset_can_move_check_in_across_midnight() {
        let batch = vec![RawAttendance {
            check_in: Some("2025-10-21T00:30:00+01:00".into()),
            ..raw()
        }];
        let records = normalize_batch(Some(batch), now()).unwrap().records;
        assert_eq!(records[0].check_in_date, NaiveDate::from_ymd_opt(2025, 10, 20));
    }

    #[test]
    fn backfills_check_in_date_from_check_in_then_check_out() {
        let batch = vec![
            RawAttendance {
                check_in: Some("2025-10-18T07:45:00Z".into()),
                check_out: Some("2025-10-19T16:00:00Z".into()),
                ..raw()
            },
            RawAttendance {
                check_out: Some("2025-10-19T16:00:00Z".into()),
                ..raw()
            },
            RawAttendance {
                check_in_date: Some("2025-10-01".into()),
                check_in: Some("2025-10-18T07:45:00Z".into()),
                ..raw()
            },
            raw(),
        ];

        let records = normalize_batch(Some(batch), now()).unwrap().records;
        assert_eq!(records[0].check_in_date, NaiveDate::from_ymd_opt(2025, 10, 18));
        assert_eq!(records[1].check_in_date, NaiveDate::from_ymd_opt(2025, 10, 19));
        assert_eq!(records[2].check_in_date, NaiveDate::from_ymd_opt(2025, 10, 1));
        assert_eq!(records[3].check_in_date, None);
    }

    #[test]
    fn trims_identity_text_and_stamps_server_time() {
        let batch = vec![RawAttendance {
            full_name: Some("  Amina Bello \t".into()),
            state: Some(" Kano ".into()),
            lga: Some("Nassarawa  ".into()),
            received_at: Some("1999-01-01T00:00:00Z".into()),
            ..raw()
        }];

        let record = &normalize_batch(Some(batch), now()).unwrap().records[0];
        assert_eq!(record.full_name, "Amina Bello");
        assert_eq!(record.state, "Kano");
        assert_eq!(record.lga, "Nassarawa");
        assert_eq!(record.received_at, now());
    }

    #[test]
    fn missing_success_defaults_to_false() {
        let batch = vec![RawAttendance {
            success: None,
            ..raw()
        }];
        assert!(!normalize_batch(Some(batch), now()).unwrap().records[0].success);
    }

    #[test]
    fn repeated_id_in_batch_gets_a_fresh_one() {
        let id = "3f2b8c1e-6a7d-4e0b-9a51-0c2d5f7e8a90";
        let batch = vec![
            RawAttendance {
                id: Some(id.into()),
                ..raw()
            },
            RawAttendance {
                id: Some(id.into()),
                ..raw()
            },
            RawAttendance {
                id: Some(id.to_uppercase()),
                ..raw()
            },
        ];

        let records = normalize_batch(Some(batch), now()).unwrap().records;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, Uuid::parse_str(id).unwrap());

        let distinct: HashSet<Uuid> = records.iter().map(|r| r.id).collect();
        assert_eq!(distinct.len(), 3);
    }
}
