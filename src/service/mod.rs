//! Operations behind the HTTP handlers: fetch from the stores, hand the rows
//! to the engine.

use std::sync::Arc;

use crate::render::DocumentRenderer;
use crate::store::{DeviceRegistry, EventStore, StaffDirectory};

pub mod device;
pub mod report;
pub mod roster;

/// Shared as `web::Data<AppState>`; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub staff: Arc<dyn StaffDirectory>,
    pub events: Arc<dyn EventStore>,
    pub devices: Arc<dyn DeviceRegistry>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl AppState {
    pub fn new(
        staff: Arc<dyn StaffDirectory>,
        events: Arc<dyn EventStore>,
        devices: Arc<dyn DeviceRegistry>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        AppState {
            staff,
            events,
            devices,
            renderer,
        }
    }
}

/// Rendered bytes plus what the handler needs for the download headers.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
