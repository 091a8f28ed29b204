//! HTTP API handlers for palm-ra

pub mod analysis;
pub mod health;

pub use analysis::{analysis_routes, get_analysis, upload_palm, AnalysisResponse, UploadResponse};
pub use health::health_routes;
