use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::attendance::ReportRequest;
use crate::service::{AppState, RenderedDocument};

/// GET routes under `/reports`; `receive` is mounted separately behind the
/// ingest limiter.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/facility-summary").route(web::get().to(facility_summary)))
        .service(web::resource("/facility-today-summary").route(web::get().to(facility_today_summary)))
        .service(web::resource("/analytics/{year}/{month}").route(web::get().to(chart_analytics)))
        .service(
            web::resource("/timesheet/{user_id}/{year}/{month}").route(web::get().to(user_timesheet)),
        )
        .service(
            web::resource("/timesheet-document/{user_id}/{year}/{month}")
                .route(web::get().to(user_timesheet_document)),
        )
        .service(
            web::resource("/facility-timesheet-data/{facility}/{year}/{month}")
                .route(web::get().to(facility_timesheet)),
        )
        .service(
            web::resource("/facility-timesheet-document/{facility}/{year}/{month}")
                .route(web::get().to(facility_timesheet_document)),
        )
        .service(
            web::resource("/facility/{facility}/{year}/{month}").route(web::get().to(facility_report)),
        );
}

/// Receive a batch of attendance events from a device
#[utoipa::path(
    post,
    path = "/api/reports/receive",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Batch stored", body = Object, example = json!({
            "status": "success",
            "message": "2 records saved successfully."
        })),
        (status = 400, description = "Empty or missing report list", body = Object, example = json!({
            "status": "error",
            "message": "Empty report list"
        })),
        (status = 500, description = "Store failure")
    ),
    tag = "Reports"
)]
pub async fn receive(
    state: web::Data<AppState>,
    payload: web::Json<ReportRequest>,
) -> Result<HttpResponse, AppError> {
    let message = state.ingest(payload.into_inner().reports).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": message
    })))
}

/// All-time per-facility totals against the roster
#[utoipa::path(
    get,
    path = "/api/reports/facility-summary",
    responses(
        (status = 200, description = "One entry per rostered facility", body = [crate::engine::aggregation::FacilitySummary]),
        (status = 500, description = "Store failure")
    ),
    tag = "Reports"
)]
pub async fn facility_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.facility_summary().await?))
}

/// Today's check-ins per facility, best attendance rate first
#[utoipa::path(
    get,
    path = "/api/reports/facility-today-summary",
    responses(
        (status = 200, description = "Today's summary", body = crate::engine::aggregation::TodaySummary),
        (status = 500, description = "Store failure")
    ),
    tag = "Reports"
)]
pub async fn facility_today_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(state.facility_today_summary(today).await?))
}

/// Monthly facility rollup for charts
#[utoipa::path(
    get,
    path = "/api/reports/analytics/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Chart analytics", body = crate::engine::aggregation::ChartAnalytics),
        (status = 400, description = "Invalid period")
    ),
    tag = "Reports"
)]
pub async fn chart_analytics(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (year, month) = path.into_inner();
    Ok(HttpResponse::Ok().json(state.chart_analytics(year, month).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/timesheet/{user_id}/{year}/{month}",
    params(
        ("user_id" = Uuid, Path, description = "Roster id"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Monthly timesheet", body = crate::engine::timesheet::UserTimesheet),
        (status = 400, description = "Invalid period"),
        (status = 404, description = "Unknown user", body = Object, example = json!({
            "status": "error",
            "message": "User 9b0d1c2e-3f4a-4b5c-8d6e-7f8091a2b3c4 not found"
        }))
    ),
    tag = "Timesheets"
)]
pub async fn user_timesheet(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, year, month) = path.into_inner();
    Ok(HttpResponse::Ok().json(state.user_timesheet(user_id, year, month).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/timesheet-document/{user_id}/{year}/{month}",
    params(
        ("user_id" = Uuid, Path, description = "Roster id"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Timesheet file", body = String, content_type = "text/csv"),
        (status = 404, description = "Unknown user")
    ),
    tag = "Timesheets"
)]
pub async fn user_timesheet_document(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, year, month) = path.into_inner();
    let document = state.user_timesheet_document(user_id, year, month).await?;
    Ok(attachment(document))
}

#[utoipa::path(
    get,
    path = "/api/reports/facility-timesheet-data/{facility}/{year}/{month}",
    params(
        ("facility" = String, Path, description = "Facility name"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Facility timesheet", body = crate::engine::timesheet::FacilityTimesheet),
        (status = 404, description = "No staff at facility")
    ),
    tag = "Timesheets"
)]
pub async fn facility_timesheet(
    state: web::Data<AppState>,
    path: web::Path<(String, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (facility, year, month) = path.into_inner();
    Ok(HttpResponse::Ok().json(state.facility_timesheet(&facility, year, month).await?))
}

/// Older path for the facility timesheet; same body as `facility-timesheet-data`
#[utoipa::path(
    get,
    path = "/api/reports/facility/{facility}/{year}/{month}",
    params(
        ("facility" = String, Path, description = "Facility name"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Facility timesheet", body = crate::engine::timesheet::FacilityTimesheet),
        (status = 404, description = "No staff at facility")
    ),
    tag = "Timesheets"
)]
pub async fn facility_report(
    state: web::Data<AppState>,
    path: web::Path<(String, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    facility_timesheet(state, path).await
}

#[utoipa::path(
    get,
    path = "/api/reports/facility-timesheet-document/{facility}/{year}/{month}",
    params(
        ("facility" = String, Path, description = "Facility name"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Facility timesheet file", body = String, content_type = "text/csv"),
        (status = 404, description = "No staff at facility")
    ),
    tag = "Timesheets"
)]
pub async fn facility_timesheet_document(
    state: web::Data<AppState>,
    path: web::Path<(String, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (facility, year, month) = path.into_inner();
    let document = state.facility_timesheet_document(&facility, year, month).await?;
    Ok(attachment(document))
}

fn attachment(document: RenderedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name)],
        })
        .body(document.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregation::tests::staff;
    use crate::service::testing::memory_state;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn receive_stores_batch_and_reports_count() {
        let ada = staff("Ada", "Clinic-A");
        let (state, store) = memory_state(vec![ada.clone()]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/reports/receive", web::post().to(receive)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/reports/receive")
            .set_json(json!({
                "reports": [
                    { "userId": ada.id, "facility": "Clinic-A", "checkIn": "2025-10-20T08:00:00Z", "success": true },
                    { "userId": "not-a-uuid", "checkIn": "garbage", "success": false }
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "2 records saved successfully.");
        assert_eq!(store.event_count(), 2);
    }

    #[actix_web::test]
    async fn receive_rejects_empty_list() {
        let (state, _) = memory_state(Vec::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/reports/receive", web::post().to(receive)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/reports/receive")
            .set_json(json!({ "reports": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Empty report list");
    }

    #[actix_web::test]
    async fn bad_month_and_unknown_user_map_to_client_errors() {
        let (state, _) = memory_state(Vec::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/reports").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/reports/analytics/2025/13")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/reports/timesheet/{}/2025/10", Uuid::new_v4());
        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn timesheet_document_is_an_attachment() {
        let ada = staff("Ada", "Clinic-A");
        let (state, _) = memory_state(vec![ada.clone()]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/reports").configure(configure)),
        )
        .await;

        let uri = format!("/api/reports/timesheet-document/{}/2025/10", ada.id);
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(&format!("Timesheet_{}_2025_10.csv", ada.id)));
    }

    #[actix_web::test]
    async fn facility_summary_lists_rostered_facilities() {
        let (state, _) = memory_state(vec![staff("Ada", "Clinic-A"), staff("Bola", "Clinic-B")]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/reports").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/reports/facility-summary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let facilities: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["facility"].as_str().unwrap())
            .collect();
        assert_eq!(facilities, vec!["Clinic-A", "Clinic-B"]);
        assert_eq!(body[0]["failed"], 1);
    }

    #[actix_web::test]
    async fn facility_path_matches_facility_timesheet_data() {
        let (state, _) = memory_state(vec![staff("Ada", "Clinic-A"), staff("Bola", "Clinic-A")]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/reports").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/reports/facility/Clinic-A/2025/10")
            .to_request();
        let short: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::get()
            .uri("/api/reports/facility-timesheet-data/Clinic-A/2025/10")
            .to_request();
        let long: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(short, long);
        assert_eq!(short["totalUsers"], 2);

        let req = test::TestRequest::get()
            .uri("/api/reports/facility/Nowhere/2025/10")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
