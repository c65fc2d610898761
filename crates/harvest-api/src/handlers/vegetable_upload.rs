use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use harvest_core::models::{IngestionRequest, UploadResponse};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST allowed";

/// Upload a vegetable weighing record
///
/// Stores the image in the blob store, then the record in the document store, and
/// returns the record id and the image's public URL.
///
/// # Errors
/// - `400` - missing fields, invalid weight, invalid base64, unparseable `dateTime`
/// - `500` - blob or document store failure, store unreachable or missing
pub async fn upload_vegetable_data(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<IngestionRequest>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let response = state.ingestion.ingest(request).await?;
    Ok(Json(response))
}

/// Any method other than POST (and the CORS preflight) on the upload routes.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new(METHOD_NOT_ALLOWED_MESSAGE)),
    )
}
