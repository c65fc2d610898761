//! Data models for the ingestion pipeline

mod vegetable;

pub use vegetable::*;
