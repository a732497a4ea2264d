use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Liveness record for one attendance device, keyed by (device_name, facility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub id: Uuid,
    #[schema(example = "GATE-01")]
    pub device_name: String,
    #[schema(example = "Clinic-A")]
    pub facility: String,
    #[schema(example = "10.0.0.21", nullable = true)]
    pub ip_address: Option<String>,
    pub is_online: bool,
    pub facility_code: String,
    pub facility_state: String,
    pub facility_lga: String,
    pub last_checked: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevicePing {
    pub device_name: String,
    pub facility: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default = "default_online")]
    pub is_online: bool,
    #[serde(default)]
    pub facility_code: String,
    #[serde(default)]
    pub facility_state: String,
    #[serde(default)]
    pub facility_lga: String,
}

fn default_online() -> bool {
    true
}
