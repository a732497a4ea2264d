//! Facility rollups expressed against roster population.
//!
//! `total` is always the roster head count for the facility and `failed` is
//! `total - success`; a member who never reported is not told apart from one
//! whose check failed.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::percentage;
use crate::model::{attendance::AttendanceRecord, staff::StaffRecord};
use crate::store::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilitySummary {
    #[schema(example = "Clinic-A")]
    pub facility: String,
    #[schema(example = 10)]
    pub total: i64,
    #[schema(example = 3)]
    pub success: i64,
    #[schema(example = 7)]
    pub failed: i64,
    #[schema(example = "2025-10-20", nullable = true)]
    pub last_check_in: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityTodaySummary {
    pub facility: String,
    pub total: i64,
    pub checked_in: i64,
    pub not_checked_in: i64,
    pub success: i64,
    pub failed: i64,
    #[schema(example = 66.67)]
    pub attendance_rate: f64,
    pub last_check_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub total_facilities: usize,
    pub total_staff: i64,
    pub total_checked_in: i64,
    pub overall_attendance_rate: f64,
    pub facilities: Vec<FacilityTodaySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalytics {
    pub year: i32,
    pub month: u32,
    pub total_staff: i64,
    pub total_success: i64,
    pub total_failed: i64,
    pub facilities: Vec<FacilitySummary>,
}

/// Roster head count per non-empty facility name, ascending by name.
fn roster_totals(roster: &[StaffRecord]) -> BTreeMap<&str, i64> {
    let mut totals = BTreeMap::new();
    for staff in roster.iter().filter(|s| !s.facility.is_empty()) {
        *totals.entry(staff.facility.as_str()).or_insert(0) += 1;
    }
    totals
}

/// Successful event count and latest `check_in_date` per facility.
fn rollup<'a, I>(roster: &[StaffRecord], events: I) -> Vec<FacilitySummary>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut success: HashMap<&str, i64> = HashMap::new();
    let mut last: HashMap<&str, NaiveDate> = HashMap::new();

    for event in events {
        let facility = event.facility.as_str();
        if event.success {
            *success.entry(facility).or_insert(0) += 1;
        }
        if let Some(date) = event.check_in_date {
            last.entry(facility)
                .and_modify(|d| *d = (*d).max(date))
                .or_insert(date);
        }
    }

    roster_totals(roster)
        .into_iter()
        .map(|(facility, total)| {
            let success = success.get(facility).copied().unwrap_or(0);
            FacilitySummary {
                facility: facility.to_string(),
                total,
                success,
                failed: total - success,
                last_check_in: last.get(facility).copied(),
            }
        })
        .collect()
}

/// All-time summary. Facilities come from the roster; events filed under a
/// facility nobody is rostered at do not appear.
pub fn facility_summary(roster: &[StaffRecord], events: &[AttendanceRecord]) -> Vec<FacilitySummary> {
    rollup(roster, events)
}

/// Today's summary: distinct users with a successful event dated `today`.
pub fn facility_today_summary(
    roster: &[StaffRecord],
    events: &[AttendanceRecord],
    today: NaiveDate,
) -> TodaySummary {
    let todays = events.iter().filter(|e| e.check_in_date == Some(today));

    let mut checked_in: HashMap<&str, HashSet<Uuid>> = HashMap::new();
    let mut last: HashMap<&str, DateTime<Utc>> = HashMap::new();

    for event in todays {
        let facility = event.facility.as_str();
        if event.success {
            checked_in.entry(facility).or_default().insert(event.user_id);
        }
        if let Some(at) = event.check_in {
            last.entry(facility)
                .and_modify(|t| *t = (*t).max(at))
                .or_insert(at);
        }
    }

    let mut facilities: Vec<FacilityTodaySummary> = roster_totals(roster)
        .into_iter()
        .map(|(facility, total)| {
            let unique = checked_in.get(facility).map_or(0, |users| users.len());
            let present = unique as i64;
            FacilityTodaySummary {
                facility: facility.to_string(),
                total,
                checked_in: present,
                not_checked_in: total - present,
                success: present,
                failed: total - present,
                attendance_rate: percentage(unique, total as usize, 2),
                last_check_in: last.get(facility).copied(),
            }
        })
        .collect();

    // Stable, so equal rates stay in facility-name order.
    facilities.sort_by(|a, b| b.attendance_rate.total_cmp(&a.attendance_rate));

    let total_staff: i64 = facilities.iter().map(|f| f.total).sum();
    let total_checked_in: i64 = facilities.iter().map(|f| f.checked_in).sum();

    TodaySummary {
        date: today,
        total_facilities: facilities.len(),
        total_staff,
        total_checked_in,
        overall_attendance_rate: percentage(total_checked_in as usize, total_staff as usize, 2),
        facilities,
    }
}

/// Facility rollup restricted to events whose `check_in_date` is in `period`.
pub fn chart_analytics(
    roster: &[StaffRecord],
    events: &[AttendanceRecord],
    period: &DateRange,
) -> ChartAnalytics {
    let first = period.start.date_naive();
    let last = period.last_day();
    let in_period = events
        .iter()
        .filter(|e| e.check_in_date.is_some_and(|d| first <= d && d <= last));

    let facilities = rollup(roster, in_period);

    ChartAnalytics {
        year: period.year(),
        month: period.month_number(),
        total_staff: facilities.iter().map(|f| f.total).sum(),
        total_success: facilities.iter().map(|f| f.success).sum(),
        total_failed: facilities.iter().map(|f| f.failed).sum(),
        facilities,
    }
}
