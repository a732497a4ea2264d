//! Monthly per-user and per-facility timesheets, and their renderer-neutral
//! document form.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::percentage;
use crate::error::{AppError, AppResult};
use crate::model::{attendance::AttendanceRecord, staff::StaffRecord};
use crate::store::DateRange;

const NO_RECORDS: &str = "No attendance records";

/// Roster identity printed in the timesheet header.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetIdentity {
    pub user_id: Uuid,
    pub full_name: String,
    pub designation: String,
    pub facility: String,
    pub state: String,
    pub lga: String,
    pub phone_number: String,
}

impl From<&StaffRecord> for TimesheetIdentity {
    fn from(s: &StaffRecord) -> Self {
        TimesheetIdentity {
            user_id: s.id,
            full_name: s.full_name.clone(),
            designation: s.designation.clone(),
            facility: s.facility.clone(),
            state: s.state.clone(),
            lga: s.lga.clone(),
            phone_number: s.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    pub total_records: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percent, one decimal.
    pub success_rate: f64,
}

impl TimesheetSummary {
    fn of(records: &[AttendanceRecord]) -> Self {
        let total_records = records.len();
        let successful = records.iter().filter(|r| r.success).count();
        TimesheetSummary {
            total_records,
            successful,
            failed: total_records - successful,
            success_rate: percentage(successful, total_records, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTimesheet {
    pub user: TimesheetIdentity,
    pub year: i32,
    pub month: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub records: Vec<AttendanceRecord>,
    pub summary: TimesheetSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberTimesheet {
    pub user: TimesheetIdentity,
    pub has_records: bool,
    pub records: Vec<AttendanceRecord>,
    pub summary: TimesheetSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityTimesheet {
    pub facility: String,
    pub year: i32,
    pub month: u32,
    pub total_users: usize,
    pub users_with_records: usize,
    pub users_without_records: usize,
    pub members: Vec<MemberTimesheet>,
}

/// Keeps records inside `period` by coalesced date, ascending by it.
fn in_period(mut records: Vec<AttendanceRecord>, period: &DateRange) -> Vec<AttendanceRecord> {
    records.retain(|r| r.coalesced_instant().is_some_and(|at| period.contains(at)));
    records.sort_by_key(|r| r.coalesced_instant());
    records
}

/// Builds one user's month. An empty month is a valid, zero-record timesheet.
pub fn build_user_timesheet(
    staff: &StaffRecord,
    events: Vec<AttendanceRecord>,
    period: &DateRange,
) -> UserTimesheet {
    let records: Vec<AttendanceRecord> = in_period(events, period)
        .into_iter()
        .filter(|r| r.user_id == staff.id)
        .collect();

    UserTimesheet {
        user: TimesheetIdentity::from(staff),
        year: period.year(),
        month: period.month_number(),
        period_start: period.start.date_naive(),
        period_end: period.last_day(),
        summary: TimesheetSummary::of(&records),
        records,
    }
}

/// Builds a facility's month with every roster member listed alphabetically,
/// including members with no records.
pub fn build_facility_timesheet(
    facility: &str,
    mut roster: Vec<StaffRecord>,
    events: Vec<AttendanceRecord>,
    period: &DateRange,
) -> AppResult<FacilityTimesheet> {
    if roster.is_empty() {
        return Err(AppError::NotFound(format!(
            "No staff found for facility '{facility}'"
        )));
    }
    roster.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    let mut by_user: HashMap<Uuid, Vec<AttendanceRecord>> = HashMap::new();
    for record in in_period(events, period) {
        by_user.entry(record.user_id).or_default().push(record);
    }

    let members: Vec<MemberTimesheet> = roster
        .iter()
        .map(|staff| {
            let records = by_user.remove(&staff.id).unwrap_or_default();
            MemberTimesheet {
                user: TimesheetIdentity::from(staff),
                has_records: !records.is_empty(),
                summary: TimesheetSummary::of(&records),
                records,
            }
        })
        .collect();

    let users_with_records = members.iter().filter(|m| m.has_records).count();

    Ok(FacilityTimesheet {
        facility: facility.to_string(),
        year: period.year(),
        month: period.month_number(),
        total_users: members.len(),
        users_with_records,
        users_without_records: members.len() - users_with_records,
        members,
    })
}

/// Plain header fields and string rows; the renderer decides presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetDocument {
    pub title: String,
    pub file_stem: String,
    pub header: Vec<(String, String)>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<(String, String)>,
}

fn time_cell(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn date_cell(record: &AttendanceRecord) -> String {
    record
        .coalesced_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn status_cell(record: &AttendanceRecord) -> String {
    let status = if record.success { "Success" } else { "Failed" };
    status.to_string()
}

fn pair(label: &str, value: impl ToString) -> (String, String) {
    (label.to_string(), value.to_string())
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

impl UserTimesheet {
    pub fn to_document(&self) -> TimesheetDocument {
        let rows = self
            .records
            .iter()
            .map(|r| {
                vec![
                    date_cell(r),
                    time_cell(r.check_in),
                    time_cell(r.check_out),
                    status_cell(r),
                    r.message.clone(),
                ]
            })
            .collect();

        TimesheetDocument {
            title: format!("Monthly Timesheet {}-{:02}", self.year, self.month),
            file_stem: format!("Timesheet_{}_{}_{:02}", self.user.user_id, self.year, self.month),
            header: vec![
                pair("Name", &self.user.full_name),
                pair("Designation", &self.user.designation),
                pair("Facility", &self.user.facility),
                pair("State", &self.user.state),
                pair("LGA", &self.user.lga),
                pair("Period", format!("{} to {}", self.period_start, self.period_end)),
            ],
            columns: columns(&["Date", "Check In", "Check Out", "Status", "Message"]),
            rows,
            footer: vec![
                pair("Total Records", self.summary.total_records),
                pair("Successful", self.summary.successful),
                pair("Failed", self.summary.failed),
                pair("Success Rate", format!("{:.1}%", self.summary.success_rate)),
            ],
        }
    }
}

impl FacilityTimesheet {
    pub fn to_document(&self) -> TimesheetDocument {
        let mut rows = Vec::new();
        for member in &self.members {
            if member.records.is_empty() {
                rows.push(vec![
                    member.user.full_name.clone(),
                    member.user.designation.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    NO_RECORDS.to_string(),
                    String::new(),
                ]);
                continue;
            }
            for r in &member.records {
                rows.push(vec![
                    member.user.full_name.clone(),
                    member.user.designation.clone(),
                    date_cell(r),
                    time_cell(r.check_in),
                    time_cell(r.check_out),
                    status_cell(r),
                    r.message.clone(),
                ]);
            }
        }

        TimesheetDocument {
            title: format!("Facility Timesheet {}-{:02}", self.year, self.month),
            file_stem: format!("Facility_Timesheet_{}_{}_{:02}", self.facility, self.year, self.month),
            header: vec![pair("Facility", &self.facility)],
            columns: columns(&[
                "Name",
                "Designation",
                "Date",
                "Check In",
                "Check Out",
                "Status",
                "Message",
            ]),
            rows,
            footer: vec![
                pair("Total Users", self.total_users),
                pair("Users With Records", self.users_with_records),
                pair("Users Without Records", self.users_without_records),
            ],
        }
    }
}
