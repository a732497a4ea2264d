use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One roster entry; the expected population for every summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "9b0d1c2e-3f4a-4b5c-8d6e-7f8091a2b3c4",
        "fullName": "Amina Bello",
        "designation": "Nurse",
        "facility": "Clinic-A",
        "phoneNumber": "+2348012345678",
        "state": "Kano",
        "lga": "Nassarawa"
    })
)]
pub struct StaffRecord {
    pub id: Uuid,
    pub full_name: String,
    pub designation: String,
    pub facility: String,
    pub phone_number: String,
    pub state: String,
    pub lga: String,
}

impl StaffRecord {
    pub fn has_contact(&self) -> bool {
        !self.phone_number.trim().is_empty()
    }
}

/// Roster entry as pushed by the upstream directory during a sync.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffSync {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub facility: Option<String>,
    #[serde(default, rename = "phone_number", alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lga: Option<String>,
}

impl From<StaffSync> for StaffRecord {
    fn from(s: StaffSync) -> Self {
        StaffRecord {
            id: s.id,
            full_name: s.full_name.unwrap_or_default().trim().to_string(),
            designation: s.designation.unwrap_or_default(),
            facility: s.facility.unwrap_or_default(),
            phone_number: s.phone_number.unwrap_or_default(),
            state: s.state.unwrap_or_default(),
            lga: s.lga.unwrap_or_default(),
        }
    }
}
