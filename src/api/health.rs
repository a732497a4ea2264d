use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::error::AppError;
use crate::model::device::DevicePing;
use crate::service::AppState;

/// Read side of `/health`; `ping` sits behind the ingest limiter.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/status").route(web::get().to(status)));
}

/// Device heartbeat
#[utoipa::path(
    post,
    path = "/api/health/ping",
    request_body = DevicePing,
    responses(
        (status = 200, description = "Heartbeat recorded", body = Object, example = json!({
            "status": "success",
            "message": "Ping recorded"
        })),
        (status = 400, description = "Missing device name or facility")
    ),
    tag = "Devices"
)]
pub async fn ping(
    state: web::Data<AppState>,
    payload: web::Json<DevicePing>,
) -> Result<HttpResponse, AppError> {
    state.record_ping(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Ping recorded"
    })))
}

#[utoipa::path(
    get,
    path = "/api/health/status",
    responses((status = 200, description = "Devices, most recently seen first", body = [crate::model::device::DeviceStatus])),
    tag = "Devices"
)]
pub async fn status(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.device_statuses().await?))
}
