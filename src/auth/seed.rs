use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::info;
use uuid::Uuid;

use super::password::hash_password;
use crate::config::Config;
use crate::model::{role::Role, user::NewUser};

/// Builds the default administrator from configuration.
pub fn admin_from_config(config: &Config) -> Result<NewUser> {
    let password_hash = hash_password(&config.admin_password)
        .map_err(|e| anyhow!("Failed to hash admin password: {e}"))?;

    Ok(NewUser {
        id: Uuid::new_v4(),
        full_name: config.admin_full_name.clone(),
        email: config.admin_email.clone(),
        password_hash,
        role: Role::Admin,
        created_at: Utc::now(),
    })
}

/// Inserts the administrator when no `Admin` user exists. Returns whether a
/// row was created.
pub async fn ensure_admin(pool: &MySqlPool, config: &Config) -> Result<bool> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(Role::Admin.as_ref())
        .fetch_one(pool)
        .await
        .context("Failed to look up admin user")?;

    if existing > 0 {
        return Ok(false);
    }

    let admin = admin_from_config(config)?;
    sqlx::query(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(admin.id)
    .bind(&admin.full_name)
    .bind(&admin.email)
    .bind(&admin.password_hash)
    .bind(admin.role.as_ref())
    .bind(admin.created_at)
    .execute(pool)
    .await
    .context("Failed to insert admin user")?;

    info!(email = %admin.email, "Default admin user created");
    Ok(true)
}
