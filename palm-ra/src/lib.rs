//! palm-ra library - palm reading analysis service
//!
//! Accepts palm photo uploads, runs a staged analysis per upload on a
//! background task and serves the analysis status for polling clients.

pub mod api;
pub mod client;
pub mod error;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use crate::services::{AnalysisProgressor, StageSchedule};
use crate::store::SharedStore;

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Room for multipart boundaries and headers around the file body
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Analysis record store
    pub store: SharedStore,
    /// Launches background analyses for new uploads
    pub progressor: AnalysisProgressor,
    /// Largest accepted image, in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: SharedStore, schedule: StageSchedule) -> Self {
        let progressor = AnalysisProgressor::new(store.clone(), schedule);
        Self {
            store,
            progressor,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            startup_time: Utc::now(),
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .merge(api::analysis_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
