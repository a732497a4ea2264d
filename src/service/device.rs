use chrono::Utc;
use tracing::debug;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::model::device::{DevicePing, DeviceStatus};

impl AppState {
    pub async fn record_ping(&self, ping: DevicePing) -> AppResult<()> {
        if ping.device_name.trim().is_empty() || ping.facility.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "deviceName and facility are required".to_string(),
            ));
        }

        self.devices.record_ping(&ping, Utc::now()).await?;
        debug!(device = %ping.device_name, facility = %ping.facility, "Device ping recorded");
        Ok(())
    }

    pub async fn device_statuses(&self) -> AppResult<Vec<DeviceStatus>> {
        self.devices.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::memory_state;

    fn ping(name: &str, online: bool) -> DevicePing {
        DevicePing {
            device_name: name.into(),
            facility: "Clinic-A".into(),
            ip_address: Some("10.0.0.21".into()),
            is_online: online,
            facility_code: "KN-001".into(),
            facility_state: "Kano".into(),
            facility_lga: "Nassarawa".into(),
        }
    }

    #[actix_web::test]
    async fn repeated_pings_update_one_device() {
        let (state, _) = memory_state(Vec::new());

        state.record_ping(ping("GATE-01", true)).await.unwrap();
        state.record_ping(ping("GATE-01", false)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        state.record_ping(ping("GATE-02", true)).await.unwrap();

        let devices = state.device_statuses().await.unwrap();
        assert_eq!(devices.len(), 2);
        // Most recently checked first.
        assert_eq!(devices[0].device_name, "GATE-02");
        assert!(!devices[1].is_online);
    }

    #[actix_web::test]
    async fn blank_device_name_is_rejected() {
        let (state, _) = memory_state(Vec::new());
        let err = state.record_ping(ping("  ", true)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
