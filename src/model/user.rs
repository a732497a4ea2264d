use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::role::Role;

/// Administrative account row; only written by startup seeding.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
