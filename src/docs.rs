use crate::engine::aggregation::{ChartAnalytics, FacilitySummary, FacilityTodaySummary, TodaySummary};
use crate::engine::demographics::{
    ComprehensiveAnalysis, ContactFilter, CoverageOverall, DesignationBreakdown, DesignationContacts,
    DesignationCoverage, FacilityRoster, MemberBrief, Share, StaffBrief, StaffContact,
    StateBreakdown, StateContacts, StateCoverage, StateDesignationGroup, TopCategory,
};
use crate::engine::timesheet::{
    FacilityTimesheet, MemberTimesheet, TimesheetIdentity, TimesheetSummary, UserTimesheet,
};
use crate::model::attendance::{AttendanceRecord, RawAttendance, ReportRequest};
use crate::model::device::{DevicePing, DeviceStatus};
use crate::model::staff::{StaffRecord, StaffSync};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Report API",
        version = "1.0.0",
        description = r#"
## Attendance Normalization & Aggregation

Receives check-in/out events from facility devices and reports them against
the staff roster.

### 🔹 Key Features
- **Ingestion**
  - Batched device submissions, normalized to UTC
- **Facility reports**
  - All-time and today's summaries, monthly chart analytics
- **Timesheets**
  - Per user and per facility, as JSON or a downloadable file
- **Roster**
  - Sync from the upstream directory, demographic and contact analyses
- **Devices**
  - Heartbeats, with silent devices swept offline in the background

### 📦 Response Format
- JSON bodies in camelCase
- Errors as `{"status": "error", "message": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::reports::receive,
        crate::api::reports::facility_summary,
        crate::api::reports::facility_today_summary,
        crate::api::reports::chart_analytics,
        crate::api::reports::user_timesheet,
        crate::api::reports::user_timesheet_document,
        crate::api::reports::facility_timesheet,
        crate::api::reports::facility_report,
        crate::api::reports::facility_timesheet_document,

        crate::api::users::sync_users,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::users_by_facility,
        crate::api::users::facilities,
        crate::api::users::facility_summary,
        crate::api::users::state_analysis,
        crate::api::users::designation_analysis,
        crate::api::users::state_designation_analysis,
        crate::api::users::comprehensive_analysis,
        crate::api::users::contacts,
        crate::api::users::contacts_for_state,

        crate::api::health::ping,
        crate::api::health::status
    ),
    components(
        schemas(
            ReportRequest,
            RawAttendance,
            AttendanceRecord,
            FacilitySummary,
            FacilityTodaySummary,
            TodaySummary,
            ChartAnalytics,
            TimesheetIdentity,
            TimesheetSummary,
            UserTimesheet,
            MemberTimesheet,
            FacilityTimesheet,
            StaffRecord,
            StaffSync,
            MemberBrief,
            FacilityRoster,
            Share,
            TopCategory,
            StateBreakdown,
            DesignationBreakdown,
            StaffBrief,
            StateDesignationGroup,
            StaffContact,
            ContactFilter,
            DesignationContacts,
            StateContacts,
            CoverageOverall,
            StateCoverage,
            DesignationCoverage,
            ComprehensiveAnalysis,
            DevicePing,
            DeviceStatus
        )
    ),
    tags(
        (name = "Reports", description = "Ingestion and facility reports"),
        (name = "Timesheets", description = "Monthly timesheets and documents"),
        (name = "Users", description = "Roster sync and reads"),
        (name = "Analysis", description = "Roster demographics and contact coverage"),
        (name = "Devices", description = "Device liveness"),
    )
)]
pub struct ApiDoc;
