use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::{debug, error};
use uuid::Uuid;

use super::{DateRange, DeviceRegistry, EventStore, StaffDirectory};
use crate::error::AppResult;
use crate::model::{
    attendance::AttendanceRecord,
    device::{DevicePing, DeviceStatus},
    staff::StaffRecord,
};

// Keeps one INSERT well under MySQL's placeholder limit.
const INSERT_CHUNK: usize = 1000;

const COALESCED_DATE: &str = "COALESCE(CAST(check_in_date AS DATETIME), check_in, check_out)";

const ATTENDANCE_COLUMNS: &str = "id, user_id, full_name, designation, facility, phone_number, \
     state, lga, check_in_date, check_out_date, check_in, check_out, message, success, received_at";

const STAFF_COLUMNS: &str = "id, full_name, designation, facility, phone_number, state, lga";

#[derive(Clone)]
pub struct MySqlStaffDirectory {
    pool: MySqlPool,
}

impl MySqlStaffDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffDirectory for MySqlStaffDirectory {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<StaffRecord>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?");
        let staff = sqlx::query_as::<_, StaffRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(staff)
    }

    async fn list_by_facility(&self, facility: &str) -> AppResult<Vec<StaffRecord>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE facility = ? ORDER BY full_name");
        let staff = sqlx::query_as::<_, StaffRecord>(&sql)
            .bind(facility)
            .fetch_all(&self.pool)
            .await?;
        Ok(staff)
    }

    async fn list_all(&self) -> AppResult<Vec<StaffRecord>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY full_name, id");
        let staff = sqlx::query_as::<_, StaffRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(staff)
    }

    async fn upsert_batch(&self, staff: &[StaffRecord]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        for chunk in staff.chunks(INSERT_CHUNK) {
            staff_upsert(chunk).build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(staff.len() as u64)
    }
}

#[derive(Clone)]
pub struct MySqlEventStore {
    pool: MySqlPool,
}

impl MySqlEventStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, mut qb: QueryBuilder<'_, MySql>) -> AppResult<Vec<AttendanceRecord>> {
        debug!(sql = %qb.sql(), "Fetching attendance records");

        let records = qb
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }
}

fn select_events() -> QueryBuilder<'static, MySql> {
    QueryBuilder::new(format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance_logs"))
}

/// Appends the optional range filter and the chronological ordering.
fn with_range<'a>(
    mut qb: QueryBuilder<'a, MySql>,
    range: Option<&DateRange>,
    has_condition: bool,
) -> QueryBuilder<'a, MySql> {
    if let Some(range) = range {
        qb.push(if has_condition { " AND " } else { " WHERE " });
        qb.push(COALESCED_DATE)
            .push(" >= ")
            .push_bind(range.start.naive_utc())
            .push(" AND ")
            .push(COALESCED_DATE)
            .push(" < ")
            .push_bind(range.end.naive_utc());
    }
    qb.push(" ORDER BY ").push(COALESCED_DATE).push(", received_at");
    qb
}

fn user_events(user_id: Uuid, range: &DateRange) -> QueryBuilder<'static, MySql> {
    let mut qb = select_events();
    qb.push(" WHERE user_id = ").push_bind(user_id);
    with_range(qb, Some(range), true)
}

/// Caller guarantees `user_ids` is non-empty; `IN ()` is a syntax error.
fn users_events(user_ids: &[Uuid], range: &DateRange) -> QueryBuilder<'static, MySql> {
    let mut qb = select_events();
    qb.push(" WHERE user_id IN (");
    let mut ids = qb.separated(", ");
    for id in user_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
    with_range(qb, Some(range), true)
}

fn facility_events(facility: &str, range: &DateRange) -> QueryBuilder<'static, MySql> {
    let mut qb = select_events();
    qb.push(" WHERE facility = ").push_bind(facility.to_string());
    with_range(qb, Some(range), true)
}

fn all_events(range: Option<&DateRange>) -> QueryBuilder<'static, MySql> {
    with_range(select_events(), range, false)
}

fn staff_upsert(chunk: &[StaffRecord]) -> QueryBuilder<'_, MySql> {
    let mut qb: QueryBuilder<MySql> =
        QueryBuilder::new(format!("INSERT INTO staff ({STAFF_COLUMNS}) "));
    qb.push_values(chunk, |mut row, s| {
        row.push_bind(s.id)
            .push_bind(&s.full_name)
            .push_bind(&s.designation)
            .push_bind(&s.facility)
            .push_bind(&s.phone_number)
            .push_bind(&s.state)
            .push_bind(&s.lga);
    });
    qb.push(
        " ON DUPLICATE KEY UPDATE \
         full_name = VALUES(full_name), \
         designation = VALUES(designation), \
         facility = VALUES(facility), \
         phone_number = VALUES(phone_number), \
         state = VALUES(state), \
         lga = VALUES(lga)",
    );
    qb
}

#[async_trait]
impl EventStore for MySqlEventStore {
    async fn append_batch(&self, records: &[AttendanceRecord]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        for chunk in records.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<MySql> =
                QueryBuilder::new(format!("INSERT INTO attendance_logs ({ATTENDANCE_COLUMNS}) "));
            qb.push_values(chunk, |mut row, r| {
                row.push_bind(r.id)
                    .push_bind(r.user_id)
                    .push_bind(&r.full_name)
                    .push_bind(&r.designation)
                    .push_bind(&r.facility)
                    .push_bind(&r.phone_number)
                    .push_bind(&r.state)
                    .push_bind(&r.lga)
                    .push_bind(r.check_in_date)
                    .push_bind(r.check_out_date)
                    .push_bind(r.check_in)
                    .push_bind(r.check_out)
                    .push_bind(&r.message)
                    .push_bind(r.success)
                    .push_bind(r.received_at);
            });

            if let Err(e) = qb.build().execute(&mut *tx).await {
                error!(error = %e, batch = records.len(), "Attendance batch insert failed");
                return Err(e.into());
            }
        }

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    async fn query_by_user(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        self.fetch(user_events(user_id, range)).await
    }

    async fn query_by_users(
        &self,
        user_ids: &[Uuid],
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(users_events(user_ids, range)).await
    }

    async fn query_by_facility(
        &self,
        facility: &str,
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        self.fetch(facility_events(facility, range)).await
    }

    async fn query_all(&self, range: Option<&DateRange>) -> AppResult<Vec<AttendanceRecord>> {
        self.fetch(all_events(range)).await
    }
}

#[derive(Clone)]
pub struct MySqlDeviceRegistry {
    pool: MySqlPool,
}

impl MySqlDeviceRegistry {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRegistry for MySqlDeviceRegistry {
    async fn record_ping(&self, ping: &DevicePing, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO device_health
            (id, device_name, facility, ip_address, is_online, facility_code, facility_state, facility_lga, last_checked)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                ip_address = VALUES(ip_address),
                is_online = VALUES(is_online),
                facility_code = VALUES(facility_code),
                facility_state = VALUES(facility_state),
                facility_lga = VALUES(facility_lga),
                last_checked = VALUES(last_checked)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&ping.device_name)
        .bind(&ping.facility)
        .bind(&ping.ip_address)
        .bind(ping.is_online)
        .bind(&ping.facility_code)
        .bind(&ping.facility_state)
        .bind(&ping.facility_lga)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<DeviceStatus>> {
        let devices = sqlx::query_as::<_, DeviceStatus>(
            r#"
            SELECT id, device_name, facility, ip_address, is_online,
                   facility_code, facility_state, facility_lga, last_checked
            FROM device_health
            ORDER BY last_checked DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(devices)
    }

    async fn mark_offline_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE device_health
            SET is_online = FALSE
            WHERE is_online = TRUE
            AND last_checked < ?
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
