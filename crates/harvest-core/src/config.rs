//! Configuration module
//!
//! Settings are read from the environment (with `.env` support) once at startup,
//! then validated before any store client is built.

use std::env;

use crate::storage_types::{DocumentBackend, StorageBackend};

const SERVER_PORT: u16 = 8080;
const MAX_BODY_SIZE_MB: usize = 20;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COLLECTION: &str = "vegetables";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_body_size_bytes: usize,
    /// Emit JSON log lines instead of the compact console format
    pub log_json: bool,
    // Blob storage
    pub storage_backend: StorageBackend,
    pub storage_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Document store
    pub document_backend: DocumentBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub document_collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_body_size_bytes: MAX_BODY_SIZE_MB * 1024 * 1024,
            log_json: false,
            storage_backend: StorageBackend::Local,
            storage_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("./data/blobs".to_string()),
            local_storage_base_url: Some(format!("http://localhost:{}/blobs", SERVER_PORT)),
            document_backend: DocumentBackend::Memory,
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            db_timeout_seconds: DB_TIMEOUT_SECS,
            document_collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(SERVER_PORT);

        let max_body_size_mb = env::var("MAX_BODY_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_BODY_SIZE_MB);

        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let storage_backend = match optional_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        let document_backend = match optional_var("DOCUMENT_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.document_backend,
        };

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DB_MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DB_TIMEOUT_SECS);

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            max_body_size_bytes: max_body_size_mb * 1024 * 1024,
            log_json,
            storage_backend,
            storage_bucket: optional_var("STORAGE_BUCKET"),
            s3_region: optional_var("S3_REGION").or_else(|| optional_var("AWS_REGION")),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH")
                .or(defaults.local_storage_path),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL")
                .or_else(|| Some(format!("http://localhost:{}/blobs", server_port))),
            document_backend,
            database_url: optional_var("DATABASE_URL"),
            db_max_connections,
            db_timeout_seconds,
            document_collection: optional_var("DOCUMENT_COLLECTION")
                .unwrap_or(defaults.document_collection),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::Gcs => {
                if self.storage_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using the gcs storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.storage_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using the s3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    ));
                }
            }
        }

        if self.document_backend == DocumentBackend::Postgres {
            let url = self.database_url.as_deref().unwrap_or_default();
            if !(url.starts_with("postgresql://") || url.starts_with("postgres://")) {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.document_collection.trim().is_empty() {
            return Err(anyhow::anyhow!("DOCUMENT_COLLECTION must not be empty"));
        }

        Ok(())
    }
}
