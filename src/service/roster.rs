use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::engine::demographics::{
    self, ComprehensiveAnalysis, ContactFilter, DesignationBreakdown, FacilityRoster, StaffContact,
    StateBreakdown, StateContacts, StateDesignationGroup,
};
use crate::error::{AppError, AppResult};
use crate::model::staff::{StaffRecord, StaffSync};

impl AppState {
    /// Upserts the pushed roster; returns the confirmation message.
    pub async fn sync_roster(&self, batch: Option<Vec<StaffSync>>) -> AppResult<String> {
        let batch = match batch {
            Some(b) if !b.is_empty() => b,
            _ => return Err(AppError::InvalidInput("Empty user list".to_string())),
        };

        let staff: Vec<StaffRecord> = batch.into_iter().map(StaffRecord::from).collect();
        self.staff.upsert_batch(&staff).await?;

        info!(count = staff.len(), "Roster synchronized");
        Ok(format!("{} users saved/updated successfully.", staff.len()))
    }

    pub async fn list_staff(&self) -> AppResult<Vec<StaffRecord>> {
        self.staff.list_all().await
    }

    pub async fn get_staff(&self, id: Uuid) -> AppResult<StaffRecord> {
        self.staff
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    pub async fn staff_by_facility(&self, facility: &str) -> AppResult<Vec<StaffRecord>> {
        self.staff.list_by_facility(facility).await
    }

    pub async fn facility_names(&self) -> AppResult<Vec<String>> {
        Ok(demographics::facilities(&self.staff.list_all().await?))
    }

    pub async fn facility_rosters(&self) -> AppResult<Vec<FacilityRoster>> {
        Ok(demographics::facility_rosters(&self.staff.list_all().await?))
    }

    pub async fn state_analysis(&self) -> AppResult<Vec<StateBreakdown>> {
        Ok(demographics::by_state(&self.staff.list_all().await?))
    }

    pub async fn designation_analysis(&self) -> AppResult<Vec<DesignationBreakdown>> {
        Ok(demographics::by_designation(&self.staff.list_all().await?))
    }

    pub async fn state_designation_analysis(&self) -> AppResult<Vec<StateDesignationGroup>> {
        Ok(demographics::by_state_and_designation(&self.staff.list_all().await?))
    }

    pub async fn staff_contacts(&self, filter: &ContactFilter) -> AppResult<Vec<StaffContact>> {
        Ok(demographics::staff_contacts(&self.staff.list_all().await?, filter))
    }

    pub async fn state_contacts(&self, state: &str) -> AppResult<StateContacts> {
        let roster = self.staff.list_all().await?;
        Ok(demographics::contacts_by_designation_for_state(&roster, state))
    }

    pub async fn contact_coverage(&self) -> AppResult<ComprehensiveAnalysis> {
        let roster = self.staff.list_all().await?;
        Ok(demographics::contact_coverage(&roster, chrono::Utc::now()))
    }
}
