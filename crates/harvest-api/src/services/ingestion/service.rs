//! Ingestion pipeline
//!
//! validate → decode → classify → derive key → upload → normalise timestamp → probe → persist
//!
//! Every step short-circuits on failure. The blob upload and the document write are the only
//! durable effects, and an uploaded blob is kept even when a later step fails.

use std::sync::Arc;

use harvest_core::error::UNKNOWN_CODE;
use harvest_core::models::{
    IngestionRequest, UploadData, UploadResponse, VegetableRecord, WeightInput, REQUIRED_FIELDS,
    UPLOADED_AT_FIELD,
};
use harvest_core::AppError;
use harvest_db::{DocumentStore, DocumentStoreError, DocumentWrite};
use harvest_storage::{vegetable_key, BlobStore, SaveOptions};
use serde_json::json;

use super::decoder::decode_image;
use super::sniffer::sniff;
use super::timestamp::{format_instant, normalize_timestamp};
use crate::clock::Clock;

/// Sentinel document written before every record to confirm the store is reachable.
pub const PROBE_DOCUMENT_ID: &str = "test-connection";

pub const SUCCESS_MESSAGE: &str = "Upload successful";

const INVALID_WEIGHT_MESSAGE: &str = "Invalid weight: must be a positive number";

/// Request with every required field present and the weight parsed.
struct ValidatedRequest {
    image_base64: String,
    weight: WeightInput,
    weight_value: f64,
    veg_name: String,
    date_time: String,
}

fn missing_fields_error(missing: &[&str]) -> AppError {
    AppError::Validation(format!("Missing required fields: {}", missing.join(", ")))
}

fn validate_request(request: IngestionRequest) -> Result<ValidatedRequest, AppError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(missing_fields_error(&missing));
    }

    match (
        request.image_base64,
        request.weight,
        request.veg_name,
        request.date_time,
    ) {
        (Some(image_base64), Some(weight), Some(veg_name), Some(date_time)) => {
            let weight_value = weight
                .positive_value()
                .ok_or_else(|| AppError::Validation(INVALID_WEIGHT_MESSAGE.to_string()))?;
            Ok(ValidatedRequest {
                image_base64,
                weight,
                weight_value,
                veg_name,
                date_time,
            })
        }
        _ => Err(missing_fields_error(&REQUIRED_FIELDS)),
    }
}

/// Map a failed record write: a missing store is a deployment problem, anything else is
/// reported as a storage failure with the store's code.
fn record_write_error(err: DocumentStoreError) -> AppError {
    let code = err.code().unwrap_or_else(|| UNKNOWN_CODE.to_string());
    if err.is_not_found() {
        AppError::Configuration {
            message: err.to_string(),
            code,
        }
    } else {
        AppError::Storage {
            message: format!("Document store error: {}", err),
            code: Some(code),
        }
    }
}

/// Orchestrates one weighing upload against the injected stores.
#[derive(Clone)]
pub struct IngestionService {
    blob_store: Arc<dyn BlobStore>,
    document_store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
}

impl IngestionService {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        document_store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            blob_store,
            document_store,
            clock,
            collection: collection.into(),
        }
    }

    /// Run the full pipeline for one request.
    #[tracing::instrument(
        skip(self, request),
        fields(
            veg_name = ?request.veg_name,
            collection = %self.collection,
            operation = "upload_vegetable_data"
        )
    )]
    pub async fn ingest(&self, request: IngestionRequest) -> Result<UploadResponse, AppError> {
        let start = std::time::Instant::now();
        let request = validate_request(request)?;

        let bytes = decode_image(&request.image_base64)?;
        let classification = sniff(&request.image_base64);

        let key = vegetable_key(
            &request.veg_name,
            self.clock.now_millis(),
            classification.extension,
        );
        let size_bytes = bytes.len();

        let image_url = self
            .blob_store
            .save(&key, bytes, &SaveOptions::public(classification.content_type))
            .await
            .map_err(|e| AppError::Storage {
                message: format!("Storage error: {}", e),
                code: None,
            })?;

        tracing::debug!(
            key = %key,
            size_bytes,
            content_type = classification.content_type,
            "Image stored"
        );

        let date_time = normalize_timestamp(&request.date_time).inspect_err(|_| {
            tracing::warn!(key = %key, "dateTime rejected after upload; blob retained");
        })?;

        self.probe_document_store().await?;

        let record = VegetableRecord {
            image_url: image_url.clone(),
            weight: request.weight_value,
            veg_name: request.veg_name.clone(),
            date_time,
        };
        let write = DocumentWrite::from_serialize(&record)
            .map_err(record_write_error)?
            .with_server_timestamp(UPLOADED_AT_FIELD);

        let id = self
            .document_store
            .add(&self.collection, write)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Record write failed; blob retained");
                record_write_error(e)
            })?;

        tracing::info!(
            id = %id,
            key = %key,
            size_bytes,
            content_type = classification.content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Vegetable data uploaded"
        );

        Ok(UploadResponse {
            message: SUCCESS_MESSAGE.to_string(),
            id,
            data: UploadData {
                image_url,
                weight: request.weight,
                veg_name: request.veg_name,
                date_time: format_instant(&date_time),
                format: classification.content_type.to_string(),
            },
        })
    }

    async fn probe_document_store(&self) -> Result<(), AppError> {
        self.document_store
            .set(
                &self.collection,
                PROBE_DOCUMENT_ID,
                json!({ "test": true }),
                true,
            )
            .await
            .map_err(|e| AppError::Connectivity {
                code: e.code().unwrap_or_else(|| UNKNOWN_CODE.to_string()),
                message: e.to_string(),
            })
    }
}
