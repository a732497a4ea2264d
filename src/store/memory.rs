use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DateRange, DeviceRegistry, EventStore, StaffDirectory};
use crate::error::AppResult;
use crate::model::{
    attendance::AttendanceRecord,
    device::{DevicePing, DeviceStatus},
    staff::StaffRecord,
};

/// Process-local stores with the same ordering rules as the MySQL ones.
#[derive(Default)]
pub struct MemoryStore {
    staff: Mutex<Vec<StaffRecord>>,
    events: Mutex<Vec<AttendanceRecord>>,
    devices: Mutex<Vec<DeviceStatus>>,
}

impl MemoryStore {
    pub fn with_staff(staff: Vec<StaffRecord>) -> Self {
        Self {
            staff: Mutex::new(staff),
            ..Default::default()
        }
    }

    pub fn insert_device(&self, device: DeviceStatus) {
        self.devices.lock().unwrap().push(device);
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn events_where<F>(&self, range: Option<&DateRange>, keep: F) -> Vec<AttendanceRecord>
    where
        F: Fn(&AttendanceRecord) -> bool,
    {
        let mut out: Vec<AttendanceRecord> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|r| keep(r))
            .filter(|r| match range {
                Some(range) => r.coalesced_instant().is_some_and(|at| range.contains(at)),
                None => true,
            })
            .cloned()
            .collect();
        out.sort_by_key(|r| (r.coalesced_instant(), r.received_at));
        out
    }
}

#[async_trait]
impl StaffDirectory for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<StaffRecord>> {
        Ok(self.staff.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_facility(&self, facility: &str) -> AppResult<Vec<StaffRecord>> {
        let mut staff: Vec<StaffRecord> = self
            .staff
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.facility == facility)
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(staff)
    }

    async fn list_all(&self) -> AppResult<Vec<StaffRecord>> {
        Ok(self.staff.lock().unwrap().clone())
    }

    async fn upsert_batch(&self, incoming: &[StaffRecord]) -> AppResult<u64> {
        let mut staff = self.staff.lock().unwrap();
        for s in incoming {
            match staff.iter_mut().find(|existing| existing.id == s.id) {
                Some(existing) => *existing = s.clone(),
                None => staff.push(s.clone()),
            }
        }
        Ok(incoming.len() as u64)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append_batch(&self, records: &[AttendanceRecord]) -> AppResult<u64> {
        self.events.lock().unwrap().extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn query_by_user(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self.events_where(Some(range), |r| r.user_id == user_id))
    }

    async fn query_by_users(
        &self,
        user_ids: &[Uuid],
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self.events_where(Some(range), |r| user_ids.contains(&r.user_id)))
    }

    async fn query_by_facility(
        &self,
        facility: &str,
        range: &DateRange,
    ) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self.events_where(Some(range), |r| r.facility == facility))
    }

    async fn query_all(&self, range: Option<&DateRange>) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self.events_where(range, |_| true))
    }
}

#[async_trait]
impl DeviceRegistry for MemoryStore {
    async fn record_ping(&self, ping: &DevicePing, now: DateTime<Utc>) -> AppResult<()> {
        let mut devices = self.devices.lock().unwrap();
        let existing = devices
            .iter_mut()
            .find(|d| d.device_name == ping.device_name && d.facility == ping.facility);

        match existing {
            Some(d) => {
                d.ip_address = ping.ip_address.clone();
                d.is_online = ping.is_online;
                d.facility_code = ping.facility_code.clone();
                d.facility_state = ping.facility_state.clone();
                d.facility_lga = ping.facility_lga.clone();
                d.last_checked = now;
            }
            None => devices.push(DeviceStatus {
                id: Uuid::new_v4(),
                device_name: ping.device_name.clone(),
                facility: ping.facility.clone(),
                ip_address: ping.ip_address.clone(),
                is_online: ping.is_online,
                facility_code: ping.facility_code.clone(),
                facility_state: ping.facility_state.clone(),
                facility_lga: ping.facility_lga.clone(),
                last_checked: now,
            }),
        }
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<DeviceStatus>> {
        let mut devices = self.devices.lock().unwrap().clone();
        devices.sort_by(|a, b| b.last_checked.cmp(&a.last_checked));
        Ok(devices)
    }

    async fn mark_offline_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut flipped = 0;
        for device in self.devices.lock().unwrap().iter_mut() {
            if is_stale(device, cutoff) {
                device.is_online = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

/// Online and not heard from since `cutoff`; mirrors the MySQL UPDATE filter.
fn is_stale(device: &DeviceStatus, cutoff: DateTime<Utc>) -> bool {
    device.is_online && device.last_checked < cutoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregation::tests::{event, staff};
    use chrono::NaiveDate;

    #[actix_web::test]
    async fn facility_query_filters_by_range_and_orders_by_date() {
        let ada = staff("Ada", "Clinic-A");
        let bola = staff("Bola", "Clinic-B");
        let day = |d| NaiveDate::from_ymd_opt(2025, 10, d).unwrap();

        let store = MemoryStore::default();
        store
            .append_batch(&[
                event(&ada, day(9), true),
                event(&bola, day(2), true),
                event(&ada, day(3), false),
            ])
            .await
            .unwrap();

        let october = DateRange::month(2025, 10).unwrap();
        let found = store.query_by_facility("Clinic-A", &october).await.unwrap();
        let dates: Vec<_> = found.iter().map(|r| r.check_in_date).collect();
        assert_eq!(dates, vec![Some(day(3)), Some(day(9))]);

        let november = DateRange::month(2025, 11).unwrap();
        assert!(store.query_all(Some(&november)).await.unwrap().is_empty());
        assert_eq!(store.query_all(None).await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn only_online_devices_older_than_cutoff_are_flipped() {
        let now = Utc::now();
        let cutoff = now - chrono::Duration::minutes(15);
        let device = |name: &str, is_online: bool, last_checked: DateTime<Utc>| DeviceStatus {
            id: Uuid::new_v4(),
            device_name: name.into(),
            facility: "Clinic-A".into(),
            ip_address: None,
            is_online,
            facility_code: String::new(),
            facility_state: String::new(),
            facility_lga: String::new(),
            last_checked,
        };

        let store = MemoryStore::default();
        store.insert_device(device("old", true, now - chrono::Duration::minutes(16)));
        store.insert_device(device("recent", true, now - chrono::Duration::minutes(14)));
        store.insert_device(device("off", false, now - chrono::Duration::hours(3)));

        assert_eq!(store.mark_offline_before(cutoff).await.unwrap(), 1);
        let online: Vec<String> = DeviceRegistry::list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .filter(|d| d.is_online)
            .map(|d| d.device_name)
            .collect();
        assert_eq!(online, vec!["recent".to_string()]);
    }
}
