//! Storage seams for the roster, the attendance log and device liveness.
//!
//! Every query returns whole rows; the report engine joins them in memory.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::AttendanceRecord,
    device::{DevicePing, DeviceStatus},
    staff::StaffRecord,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// `[first day of month, first day of next month)`.
    pub fn month(year: i32, month: u32) -> AppResult<Self> {
        let invalid = || AppError::InvalidInput(format!("Invalid period {year}-{month:02}"));

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Self::between_dates(first, next))
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between_dates(date, date + Duration::days(1))
    }

    fn between_dates(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month_number(&self) -> u32 {
        self.start.month()
    }

    /// Last calendar day inside the range.
    pub fn last_day(&self) -> NaiveDate {
        (self.end - Duration::days(1)).date_naive()
    }
}

/// Read/write access to the roster. Only roster sync writes here.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<StaffRecord>>;

    async fn list_by_facility(&self, facility: &str) -> AppResult<Vec<StaffRecord>>;

    async fn list_all(&self) -> AppResult<Vec<StaffRecord>>;

    /// Create-if-absent, else overwrite every field. Atomic for the batch.
    async fn upsert_batch(&self, staff: &[StaffRecord]) -> AppResult<u64>;
}

/// Append-only attendance log.
///
/// Range filters apply to the coalesced date and results are ordered by it
/// ascending.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All-or-nothing insert of one normalized batch.
    async fn append_batch(&self, records: &[AttendanceRecord]) -> AppResult<u64>;

    async fn query_by_user(&self, user_id: Uuid, range: &DateRange)
    -> AppResult<Vec<AttendanceRecord>>;

    async fn query_by_users(
        &self,
        user_ids: &[Uuid],
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>>;

    async fn query_by_facility(
        &self,
        facility: &str,
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>>;

    /// `None` returns the whole log.
    async fn query_all(&self, range: Option<&DateRange>) -> AppResult<Vec<AttendanceRecord>>;
}

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Upsert keyed by (device_name, facility), stamping `last_checked = now`.
    async fn record_ping(&self, ping: &DevicePing, now: DateTime<Utc>) -> AppResult<()>;

    /// Most recently checked first.
    async fn list_all(&self) -> AppResult<Vec<DeviceStatus>>;

    /// Flip every online device last checked before `cutoff` to offline.
    async fn mark_offline_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
