use actix_web::{HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

use crate::engine::demographics::ContactFilter;
use crate::error::AppError;
use crate::model::staff::StaffSync;
use crate::service::AppState;

/// Routes under `/users`. `/{id}` goes last so the literal segments win.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list_users)))
        .service(web::resource("/sync").route(web::post().to(sync_users)))
        .service(web::resource("/facilities").route(web::get().to(facilities)))
        .service(web::resource("/facility-summary").route(web::get().to(facility_summary)))
        .service(web::resource("/facility/{facility}").route(web::get().to(users_by_facility)))
        .service(web::resource("/analysis/state").route(web::get().to(state_analysis)))
        .service(web::resource("/analysis/designation").route(web::get().to(designation_analysis)))
        .service(
            web::resource("/analysis/state-designation")
                .route(web::get().to(state_designation_analysis)),
        )
        .service(web::resource("/analysis/comprehensive").route(web::get().to(comprehensive_analysis)))
        .service(web::resource("/contacts").route(web::get().to(contacts)))
        .service(web::resource("/contacts/state/{state}").route(web::get().to(contacts_for_state)))
        .service(web::resource("/{id}").route(web::get().to(get_user)));
}

/// Create or overwrite roster entries by id
#[utoipa::path(
    post,
    path = "/api/users/sync",
    request_body = [StaffSync],
    responses(
        (status = 200, description = "Roster updated", body = Object, example = json!({
            "status": "success",
            "message": "3 users saved/updated successfully."
        })),
        (status = 400, description = "Empty user list"),
        (status = 500, description = "Store failure")
    ),
    tag = "Users"
)]
pub async fn sync_users(
    state: web::Data<AppState>,
    payload: web::Json<Vec<StaffSync>>,
) -> Result<HttpResponse, AppError> {
    let message = state.sync_roster(Some(payload.into_inner())).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": message
    })))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "Whole roster", body = [crate::model::staff::StaffRecord])),
    tag = "Users"
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.list_staff().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Roster id")),
    responses(
        (status = 200, description = "Roster entry", body = crate::model::staff::StaffRecord),
        (status = 404, description = "Unknown user")
    ),
    tag = "Users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.get_staff(id.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/facility/{facility}",
    params(("facility" = String, Path, description = "Facility name")),
    responses((status = 200, description = "Facility roster by name", body = [crate::model::staff::StaffRecord])),
    tag = "Users"
)]
pub async fn users_by_facility(
    state: web::Data<AppState>,
    facility: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.staff_by_facility(&facility).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/facilities",
    responses((status = 200, description = "Distinct facility names", body = [String])),
    tag = "Users"
)]
pub async fn facilities(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.facility_names().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/facility-summary",
    responses((status = 200, description = "Head count and members per facility", body = [crate::engine::demographics::FacilityRoster])),
    tag = "Users"
)]
pub async fn facility_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.facility_rosters().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/analysis/state",
    responses((status = 200, description = "Designations within each state", body = [crate::engine::demographics::StateBreakdown])),
    tag = "Analysis"
)]
pub async fn state_analysis(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.state_analysis().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/analysis/designation",
    responses((status = 200, description = "States within each designation", body = [crate::engine::demographics::DesignationBreakdown])),
    tag = "Analysis"
)]
pub async fn designation_analysis(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.designation_analysis().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/analysis/state-designation",
    responses((status = 200, description = "Staff grouped by state and designation", body = [crate::engine::demographics::StateDesignationGroup])),
    tag = "Analysis"
)]
pub async fn state_designation_analysis(
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.state_designation_analysis().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/analysis/comprehensive",
    responses((status = 200, description = "Contact coverage overview", body = crate::engine::demographics::ComprehensiveAnalysis)),
    tag = "Analysis"
)]
pub async fn comprehensive_analysis(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.contact_coverage().await?))
}

/// Staff with a phone number on file
#[utoipa::path(
    get,
    path = "/api/users/contacts",
    params(ContactFilter),
    responses((status = 200, description = "Contacts ordered by state then name", body = [crate::engine::demographics::StaffContact])),
    tag = "Analysis"
)]
pub async fn contacts(
    state: web::Data<AppState>,
    filter: web::Query<ContactFilter>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.staff_contacts(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/contacts/state/{state}",
    params(("state" = String, Path, description = "State name")),
    responses((status = 200, description = "Contacts by designation", body = crate::engine::demographics::StateContacts)),
    tag = "Analysis"
)]
pub async fn contacts_for_state(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.state_contacts(&name).await?))
}
