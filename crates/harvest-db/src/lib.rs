//! Harvest document store
//!
//! Schema-flexible records grouped into named collections. Weighing records are written
//! once and never updated; the store stamps the server-side write time.

pub mod db;

pub use db::{
    create_document_store, DocumentResult, DocumentStore, DocumentStoreError, DocumentWrite,
    MemoryDocumentStore, PostgresDocumentStore,
};
