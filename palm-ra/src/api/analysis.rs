//! Palm analysis API handlers
//!
//! POST /api/upload, GET /api/analysis/:id

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::{DateTime, Utc};
use palm_common::{AnalysisRecord, AnalysisStatus, NewAnalysis, Reading};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "palm";

/// POST /api/upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: Uuid,
}

/// GET /api/analysis/:id response
///
/// The stored fingerprint (the encoded image) is never sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub status: AnalysisStatus,
    pub progress: u8,
    pub result: Option<Reading>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnalysisRecord> for AnalysisResponse {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            id: record.id,
            status: record.status,
            progress: record.progress,
            result: record.result,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// POST /api/upload
///
/// Accepts one image in the `palm` multipart field, stores it as a new
/// analysis and starts the staged analysis in the background. Returns as
/// soon as the record exists.
pub async fn upload_palm(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest(
                "Only image files are allowed".to_string(),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len() + chunk.len() > state.max_upload_bytes {
                return Err(ApiError::PayloadTooLarge(format!(
                    "Image exceeds the {} byte limit",
                    state.max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        image = Some(bytes);
        break;
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    let fingerprint = BASE64_STANDARD.encode(&image);

    let record = state.store.create(NewAnalysis::new(fingerprint)).await?;

    tracing::info!(
        analysis_id = %record.id,
        image_bytes = image.len(),
        storage = state.store.backend(),
        "Palm image accepted"
    );

    // detached: progress and result surface through the store only
    state.progressor.spawn(record.id);

    Ok(Json(UploadResponse { id: record.id }))
}

/// GET /api/analysis/:id
///
/// Unknown and malformed ids both answer 404.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AnalysisResponse>> {
    let not_found = || ApiError::NotFound(format!("Analysis not found: {}", id));

    let analysis_id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let record = state.store.get(analysis_id).await?.ok_or_else(not_found)?;

    tracing::debug!(
        analysis_id = %analysis_id,
        status = %record.status,
        progress = record.progress,
        "Status query"
    );

    Ok(Json(record.into()))
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_palm))
        .route("/api/analysis/:id", get(get_analysis))
}
