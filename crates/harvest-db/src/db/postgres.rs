use super::document::{
    DocumentResult, DocumentStore, DocumentStoreError, DocumentWrite,
};
use async_trait::async_trait;
use harvest_core::DocumentBackend;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

// SQLSTATE classes that mean the store itself is missing or inaccessible.
const UNDEFINED_TABLE: &str = "42P01";
const INVALID_CATALOG_NAME: &str = "3D000";
const INSUFFICIENT_PRIVILEGE: &str = "42501";
const INVALID_AUTHORIZATION: &str = "28000";
const INVALID_PASSWORD: &str = "28P01";

/// Documents stored as JSONB rows in the `documents` table, keyed by (collection, id).
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for DocumentStoreError {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        match &err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    Some(UNDEFINED_TABLE) | Some(INVALID_CATALOG_NAME) => {
                        DocumentStoreError::NotFound { message, code }
                    }
                    Some(INSUFFICIENT_PRIVILEGE)
                    | Some(INVALID_AUTHORIZATION)
                    | Some(INVALID_PASSWORD) => {
                        DocumentStoreError::PermissionDenied { message, code }
                    }
                    _ => DocumentStoreError::Backend { message, code },
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DocumentStoreError::Unavailable {
                message,
                code: None,
            },
            _ => DocumentStoreError::Backend {
                message,
                code: None,
            },
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[tracing::instrument(skip(self, document), fields(db.table = "documents", db.operation = "insert"))]
    async fn add(&self, collection: &str, document: DocumentWrite) -> DocumentResult<String> {
        let id = Uuid::new_v4().simple().to_string();

        sqlx::query::<Postgres>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES (
                $1,
                $2,
                CASE
                    WHEN $4::text IS NULL THEN $3::jsonb
                    ELSE $3::jsonb || jsonb_build_object($4::text, to_jsonb(now()))
                END
            )
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(JsonValue::Object(document.data))
        .bind(document.server_timestamp_field)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self, data), fields(db.table = "documents", db.operation = "upsert"))]
    async fn set(
        &self,
        collection: &str,
        doc_id: &str,
        data: JsonValue,
        merge: bool,
    ) -> DocumentResult<()> {
        if !data.is_object() {
            return Err(DocumentStoreError::InvalidDocument(
                "document data must be a JSON object".to_string(),
            ));
        }

        sqlx::query::<Postgres>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
            SET data = CASE WHEN $4 THEN documents.data || EXCLUDED.data ELSE EXCLUDED.data END,
                updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(doc_id)
        .bind(data)
        .bind(merge)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> DocumentResult<()> {
        sqlx::query::<Postgres>("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_type(&self) -> DocumentBackend {
        DocumentBackend::Postgres
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pool_errors_are_unavailable() {
        let err = DocumentStoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DocumentStoreError::Unavailable { .. }));
        assert_eq!(err.code().as_deref(), Some("UNAVAILABLE"));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DocumentStoreError::from(sqlx::Error::Io(io));
        assert!(matches!(err, DocumentStoreError::Unavailable { .. }));
    }

    #[test]
    fn test_other_errors_are_backend_errors() {
        let err = DocumentStoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DocumentStoreError::Backend { .. }));
        assert!(!err.is_not_found());
    }

    /// Requires a reachable Postgres. Run with:
    /// `TEST_DATABASE_URL=postgres://... cargo test -p harvest-db -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_postgres_add_and_set() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");
        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let store = PostgresDocumentStore::new(pool.clone());
        let collection = format!("test_{}", Uuid::new_v4().simple());

        let write = DocumentWrite::from_serialize(&json!({ "vegName": "Okra", "weight": 1.5 }))
            .unwrap()
            .with_server_timestamp("uploadedAt");
        let id = store.add(&collection, write).await.unwrap();

        let data: JsonValue =
            sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(&collection)
                .bind(&id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(data["vegName"], json!("Okra"));
        assert!(data["uploadedAt"].is_string());

        store
            .set(&collection, "test-connection", json!({ "test": true }), true)
            .await
            .unwrap();
        store
            .set(&collection, "test-connection", json!({ "other": 1 }), true)
            .await
            .unwrap();
        let merged: JsonValue = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND id = 'test-connection'",
        )
        .bind(&collection)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(merged, json!({ "test": true, "other": 1 }));

        store.ping().await.unwrap();
    }
}
