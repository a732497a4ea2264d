use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::{AppState, RenderedDocument};
use crate::engine::{
    aggregation::{self, ChartAnalytics, FacilitySummary, TodaySummary},
    normalizer,
    timesheet::{self, FacilityTimesheet, TimesheetDocument, UserTimesheet},
};
use crate::error::{AppError, AppResult};
use crate::model::attendance::RawAttendance;
use crate::store::DateRange;

impl AppState {
    /// Normalizes and stores one device submission; returns the confirmation.
    pub async fn ingest(&self, batch: Option<Vec<RawAttendance>>) -> AppResult<String> {
        let normalized = normalizer::normalize_batch(batch, Utc::now())?;
        let stored = self.events.append_batch(&normalized.records).await?;

        info!(count = stored, "Attendance batch stored");
        Ok(normalized.confirmation())
    }

    pub async fn facility_summary(&self) -> AppResult<Vec<FacilitySummary>> {
        let (roster, events) =
            futures::try_join!(self.staff.list_all(), self.events.query_all(None))?;
        Ok(aggregation::facility_summary(&roster, &events))
    }

    pub async fn facility_today_summary(&self, today: NaiveDate) -> AppResult<TodaySummary> {
        let range = DateRange::day(today);
        let (roster, events) =
            futures::try_join!(self.staff.list_all(), self.events.query_all(Some(&range)))?;
        Ok(aggregation::facility_today_summary(&roster, &events, today))
    }

    pub async fn chart_analytics(&self, year: i32, month: u32) -> AppResult<ChartAnalytics> {
        let period = DateRange::month(year, month)?;
        let (roster, events) =
            futures::try_join!(self.staff.list_all(), self.events.query_all(Some(&period)))?;
        Ok(aggregation::chart_analytics(&roster, &events, &period))
    }

    pub async fn user_timesheet(&self, user_id: Uuid, year: i32, month: u32) -> AppResult<UserTimesheet> {
        let period = DateRange::month(year, month)?;
        let staff = self
            .staff
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        let events = self.events.query_by_user(user_id, &period).await?;
        Ok(timesheet::build_user_timesheet(&staff, events, &period))
    }

    pub async fn facility_timesheet(
        &self,
        facility: &str,
        year: i32,
        month: u32,
    ) -> AppResult<FacilityTimesheet> {
        let period = DateRange::month(year, month)?;
        let roster = self.staff.list_by_facility(facility).await?;
        if roster.is_empty() {
            warn!(facility, "Timesheet requested for facility without staff");
        }

        let ids: Vec<Uuid> = roster.iter().map(|s| s.id).collect();
        let events = if ids.is_empty() {
            Vec::new()
        } else {
            self.events.query_by_users(&ids, &period).await?
        };

        timesheet::build_facility_timesheet(facility, roster, events, &period)
    }

    pub async fn user_timesheet_document(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<RenderedDocument> {
        let sheet = self.user_timesheet(user_id, year, month).await?;
        self.render(&sheet.to_document())
    }

    pub async fn facility_timesheet_document(
        &self,
        facility: &str,
        year: i32,
        month: u32,
    ) -> AppResult<RenderedDocument> {
        let sheet = self.facility_timesheet(facility, year, month).await?;
        self.render(&sheet.to_document())
    }

    fn render(&self, document: &TimesheetDocument) -> AppResult<RenderedDocument> {
        Ok(RenderedDocument {
            file_name: self.renderer.file_name(document),
            content_type: self.renderer.content_type(),
            bytes: self.renderer.render(document)?,
        })
    }
}
