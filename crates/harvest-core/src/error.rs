//! Error types module
//!
//! Every failure of the ingestion pipeline is one of the `AppError` variants below.
//! The HTTP layer maps them to status codes through [`ErrorMetadata`], so the mapping is
//! an exhaustive match rather than string inspection.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error kind (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Diagnostic code passed through to the client, if any.
    ///
    /// This is the underlying store's native code (or `UNKNOWN`) for store failures,
    /// and `None` for caller mistakes.
    fn diagnostic_code(&self) -> Option<String>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Code reported when a store failure carries no native code.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// The image payload is not valid base64. A validation subtype.
    #[error("Invalid base64 image data: {0}")]
    Decode(String),

    /// The dateTime field does not parse to an instant. A validation subtype.
    #[error("Invalid dateTime format: {0}")]
    InvalidTimestamp(String),

    /// The request body exceeds the configured size limit. A validation subtype.
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Blob upload or document write failed.
    #[error("{message}")]
    Storage {
        message: String,
        code: Option<String>,
    },

    /// The document store could not be reached.
    #[error("Document store connection error: {message}")]
    Connectivity { message: String, code: String },

    /// The document store (or its collection) does not exist, or access is denied.
    #[error("Document store configuration error ({code}): {message}")]
    Configuration { message: String, code: String },

    /// Anything not translated at its call site.
    #[error("{message}")]
    Unexpected {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Unexpected {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "VALIDATION_ERROR", LogLevel::Debug),
        AppError::Decode(_) => (400, "DECODE_ERROR", LogLevel::Debug),
        AppError::InvalidTimestamp(_) => (400, "INVALID_TIMESTAMP", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::Storage { .. } => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::Connectivity { .. } => (500, "CONNECTIVITY_ERROR", LogLevel::Error),
        AppError::Configuration { .. } => (500, "CONFIGURATION_ERROR", LogLevel::Error),
        AppError::Unexpected { .. } => (500, "UNEXPECTED_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::Decode(_) => "DecodeError",
            AppError::InvalidTimestamp(_) => "InvalidTimestampError",
            AppError::PayloadTooLarge(_) => "PayloadTooLargeError",
            AppError::Storage { .. } => "StorageError",
            AppError::Connectivity { .. } => "ConnectivityError",
            AppError::Configuration { .. } => "ConfigurationError",
            AppError::Unexpected { .. } => "UnexpectedError",
        }
    }

    /// True for the caller-input family.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Decode(_)
                | AppError::InvalidTimestamp(_)
                | AppError::PayloadTooLarge(_)
        )
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Decode(_) => "Invalid base64 image data".to_string(),
            AppError::InvalidTimestamp(_) => "Invalid dateTime format".to_string(),
            AppError::PayloadTooLarge(_) => "Request body too large".to_string(),
            AppError::Storage { message, .. } => message.clone(),
            AppError::Connectivity { message, .. } => {
                format!("Document store connection error: {}", message)
            }
            AppError::Configuration { .. } => "Database configuration error. Please check that \
                the document store exists and the service account has proper permissions."
                .to_string(),
            AppError::Unexpected { message, .. } => message.clone(),
        }
    }

    fn diagnostic_code(&self) -> Option<String> {
        match self {
            AppError::Validation(_)
            | AppError::Decode(_)
            | AppError::InvalidTimestamp(_)
            | AppError::PayloadTooLarge(_) => None,
            AppError::Storage { code, .. } => code.clone(),
            AppError::Connectivity { code, .. } | AppError::Configuration { code, .. } => {
                Some(code.clone())
            }
            AppError::Unexpected { .. } => Some(UNKNOWN_CODE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_family_maps_to_400() {
        let errors = [
            AppError::Validation("Missing required fields: weight".to_string()),
            AppError::Decode("bad symbol".to_string()),
            AppError::InvalidTimestamp("not-a-date".to_string()),
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 400);
            assert!(err.is_validation());
            assert_eq!(err.diagnostic_code(), None);
            assert_eq!(err.log_level(), LogLevel::Debug);
        }
    }

    #[test]
    fn test_decode_and_timestamp_client_messages() {
        assert_eq!(
            AppError::Decode("Invalid symbol 33".to_string()).client_message(),
            "Invalid base64 image data"
        );
        assert_eq!(
            AppError::InvalidTimestamp("yesterday".to_string()).client_message(),
            "Invalid dateTime format"
        );
    }

    #[test]
    fn test_payload_too_large_is_413() {
        let err = AppError::PayloadTooLarge("limit is 1024 bytes".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert!(err.is_validation());
        assert_eq!(err.client_message(), "Request body too large");
        assert_eq!(err.diagnostic_code(), None);
    }

    #[test]
    fn test_store_failures_map_to_500_with_passthrough_code() {
        let err = AppError::Storage {
            message: "Document store error: boom".to_string(),
            code: Some("23505".to_string()),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert_eq!(err.diagnostic_code().as_deref(), Some("23505"));

        let err = AppError::Connectivity {
            message: "pool timed out".to_string(),
            code: "UNAVAILABLE".to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "CONNECTIVITY_ERROR");
        assert!(err.client_message().contains("pool timed out"));
        assert_eq!(err.diagnostic_code().as_deref(), Some("UNAVAILABLE"));
    }

    #[test]
    fn test_configuration_error_is_distinct_from_storage() {
        let err = AppError::Configuration {
            message: "relation \"documents\" does not exist".to_string(),
            code: "NOT_FOUND".to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.error_type(), "ConfigurationError");
        assert!(err.client_message().contains("configuration"));
        assert_eq!(err.diagnostic_code().as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn test_unexpected_error_keeps_source_chain() {
        let source = anyhow::anyhow!("socket closed").context("reading body");
        let err = AppError::from(source);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.diagnostic_code().as_deref(), Some(UNKNOWN_CODE));
        assert_eq!(err.client_message(), "reading body");
        assert!(err.detailed_message().contains("Caused by: reading body"));
    }
}
