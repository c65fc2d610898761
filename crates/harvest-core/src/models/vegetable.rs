use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Required request fields, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 4] = ["imageBase64", "weight", "vegName", "dateTime"];

/// Weight exactly as the client sent it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(serde_json::Number),
    Text(String),
}

impl WeightInput {
    /// Parse to a finite, strictly positive real.
    pub fn positive_value(&self) -> Option<f64> {
        let value = match self {
            WeightInput::Number(n) => n.as_f64()?,
            WeightInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// An empty string or the number zero counts as not supplied.
    fn is_blank(&self) -> bool {
        match self {
            WeightInput::Text(s) => s.is_empty(),
            WeightInput::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

/// Body of a weighing upload.
///
/// Every field is optional at the type level so that a missing field is reported
/// by name instead of as a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRequest {
    pub image_base64: Option<String>,
    pub weight: Option<WeightInput>,
    pub veg_name: Option<String>,
    pub date_time: Option<String>,
}

impl IngestionRequest {
    /// Names of required fields that are absent, null or empty, in request field order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.image_base64.as_deref().is_some_and(|s| !s.is_empty()),
            self.weight.as_ref().is_some_and(|w| !w.is_blank()),
            self.veg_name.as_deref().is_some_and(|s| !s.is_empty()),
            self.date_time.as_deref().is_some_and(|s| !s.is_empty()),
        ];

        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Content type and file extension detected from an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageClassification {
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Document written to the store for every successful upload.
///
/// `uploadedAt` is not part of this struct: the store stamps it at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetableRecord {
    pub image_url: String,
    pub weight: f64,
    pub veg_name: String,
    pub date_time: DateTime<Utc>,
}

/// Field name the document store fills with its own write time.
pub const UPLOADED_AT_FIELD: &str = "uploadedAt";

/// Payload echoed back to the client on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub image_url: String,
    pub weight: WeightInput,
    pub veg_name: String,
    /// ISO-8601 instant, millisecond precision, UTC
    pub date_time: String,
    /// Detected MIME type
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub id: String,
    pub data: UploadData,
}
