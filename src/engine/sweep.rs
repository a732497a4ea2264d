//! Background job flipping silent devices offline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::AppResult;
use crate::store::DeviceRegistry;

#[derive(Debug, Clone, Copy)]
pub struct SweepSettings {
    pub interval: Duration,
    pub offline_after: chrono::Duration,
}

impl Default for SweepSettings {
    fn default() -> Self {
        SweepSettings {
            interval: Duration::from_secs(10 * 60),
            offline_after: chrono::Duration::minutes(15),
        }
    }
}

/// One pass: every online device not seen for `offline_after` goes offline.
pub async fn sweep_once(
    registry: &dyn DeviceRegistry,
    offline_after: chrono::Duration,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    registry.mark_offline_before(now - offline_after).await
}

/// Runs until `shutdown` flips to `true` or its sender is dropped.
///
/// A failed pass is logged and the loop carries on. Shutdown is only
/// observed between passes.
pub async fn run_liveness_sweep(
    registry: Arc<dyn DeviceRegistry>,
    settings: SweepSettings,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        interval_secs = settings.interval.as_secs(),
        offline_after_mins = settings.offline_after.num_minutes(),
        "Device liveness sweep started"
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        match sweep_once(registry.as_ref(), settings.offline_after, Utc::now()).await {
            Ok(0) => debug!("No stale devices"),
            Ok(count) => info!(count, at = %Utc::now(), "Devices marked offline"),
            Err(e) => error!(error = %e, "Device liveness sweep failed"),
        }

        tokio::select! {
            _ = tokio::time::sleep(settings.interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Device liveness sweep stopped");
}
