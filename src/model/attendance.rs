use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One normalized check-in/out event as persisted in `attendance_logs`.
///
/// Identity fields are a snapshot taken at submission time and are never
/// re-joined against the current roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Amina Bello")]
    pub full_name: String,

    #[schema(example = "Nurse")]
    pub designation: String,

    #[schema(example = "Clinic-A")]
    pub facility: String,

    #[schema(example = "+2348012345678")]
    pub phone_number: String,

    #[schema(example = "Kano")]
    pub state: String,

    #[schema(example = "Nassarawa")]
    pub lga: String,

    #[schema(example = "2025-10-20", nullable = true)]
    pub check_in_date: Option<NaiveDate>,

    #[schema(example = "2025-10-20", nullable = true)]
    pub check_out_date: Option<NaiveDate>,

    #[schema(example = "2025-10-20T07:58:12Z", nullable = true)]
    pub check_in: Option<DateTime<Utc>>,

    #[schema(example = "2025-10-20T16:04:40Z", nullable = true)]
    pub check_out: Option<DateTime<Utc>>,

    #[schema(example = "Check-in successful")]
    pub message: String,

    pub success: bool,

    pub received_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// First present value among `check_in_date`, `check_in`, `check_out`.
    pub fn coalesced_instant(&self) -> Option<DateTime<Utc>> {
        self.check_in_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .or(self.check_in)
            .or(self.check_out)
    }

    pub fn coalesced_date(&self) -> Option<NaiveDate> {
        self.coalesced_instant().map(|dt| dt.date_naive())
    }
}

/// A single device submission, exactly as received on the wire.
///
/// Everything is optional and loosely typed so one malformed item never
/// rejects the rest of the batch.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttendance {
    #[schema(example = "3f2b8c1e-6a7d-4e0b-9a51-0c2d5f7e8a90")]
    pub id: Option<String>,
    #[schema(example = "9b0d1c2e-3f4a-4b5c-8d6e-7f8091a2b3c4")]
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub designation: Option<String>,
    pub facility: Option<String>,
    pub phone_number: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    #[schema(example = "2025-10-20")]
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    #[schema(example = "2025-10-20T08:58:12+01:00")]
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub message: Option<String>,
    pub success: Option<bool>,
    /// Ignored; the server stamps its own ingestion time.
    pub received_at: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReportRequest {
    #[serde(default)]
    pub reports: Option<Vec<RawAttendance>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: "Amina Bello".into(),
            designation: "Nurse".into(),
            facility: "Clinic-A".into(),
            phone_number: String::new(),
            state: "Kano".into(),
            lga: "Nassarawa".into(),
            check_in_date: None,
            check_out_date: None,
            check_in: None,
            check_out: None,
            message: String::new(),
            success: true,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn coalesced_instant_prefers_check_in_date() {
        let mut r = record();
        r.check_in = Some(Utc.with_ymd_and_hms(2025, 10, 21, 8, 0, 0).unwrap());
        r.check_in_date = NaiveDate::from_ymd_opt(2025, 10, 20);

        assert_eq!(
            r.coalesced_instant(),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn coalesced_instant_falls_back_to_check_out() {
        let mut r = record();
        let out = Utc.with_ymd_and_hms(2025, 10, 22, 17, 30, 0).unwrap();
        r.check_out = Some(out);

        assert_eq!(r.coalesced_instant(), Some(out));
        assert_eq!(r.coalesced_date(), NaiveDate::from_ymd_opt(2025, 10, 22));
    }

    #[test]
    fn raw_attendance_tolerates_missing_fields() {
        let raw: RawAttendance = serde_json::from_str(r#"{"fullName":" Amina "}"#).unwrap();
        assert_eq!(raw.full_name.as_deref(), Some(" Amina "));
        assert!(raw.id.is_none());
        assert!(raw.success.is_none());
    }

    #[test]
    fn report_request_without_reports_is_none() {
        let req: ReportRequest = serde_json::from_str("{}").unwrap();
        assert!(req.reports.is_none());
    }
}
