use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::warn;

use crate::engine::sweep::SweepSettings;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub db_max_connections: u32,

    // Rate limiting, per peer IP
    pub rate_ingest_per_min: u32,
    pub rate_report_per_min: u32,

    // Device liveness
    pub device_sweep_interval_secs: u64,
    pub device_offline_after_mins: i64,

    pub log_dir: String,
    pub log_level: String,

    // Seeded on first start
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 10),

            rate_ingest_per_min: var_or("RATE_INGEST_PER_MIN", 600),
            rate_report_per_min: var_or("RATE_REPORT_PER_MIN", 1000),

            device_sweep_interval_secs: var_or("DEVICE_SWEEP_INTERVAL_SECS", 600),
            device_offline_after_mins: var_or("DEVICE_OFFLINE_AFTER_MINS", 15),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),

            admin_full_name: env::var("ADMIN_FULL_NAME")
                .unwrap_or_else(|_| "System Administrator".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@attendanceservice.com".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".to_string()),
        })
    }

    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            interval: Duration::from_secs(self.device_sweep_interval_secs.max(1)),
            offline_after: chrono::Duration::minutes(self.device_offline_after_mins),
        }
    }

    /// Falls back to `DEBUG` on an unknown name.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::DEBUG)
    }
}

/// Parsed value of `key`, or `default` when unset or unparsable.
fn var_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|e| {
        warn!(key, value = raw, error = %e, fallback = %default, "Invalid setting, using default");
        default
    })
}
