//! Vegetable weighing ingestion: payload decoding, format detection, timestamp
//! normalisation and the orchestrating service.

pub mod decoder;
pub mod service;
pub mod sniffer;
pub mod timestamp;

pub use decoder::decode_image;
pub use service::{IngestionService, PROBE_DOCUMENT_ID, SUCCESS_MESSAGE};
pub use sniffer::{sniff, ImageFormat};
pub use timestamp::{format_instant, normalize_timestamp};
