//! Harvest Storage Library
//!
//! Blob storage for uploaded vegetable images. It includes the `BlobStore` trait and
//! implementations for object stores (Google Cloud Storage, S3) and the local filesystem.
//!
//! # Storage key format
//!
//! Every image is stored under `vegetables/{sanitized_name}_{epoch_millis}.{extension}`,
//! where whitespace runs in the vegetable name become a single underscore. Key generation
//! lives in the `keys` module so the pipeline and all backends agree on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-object")]
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_blob_store;
pub use harvest_core::StorageBackend;
pub use keys::{sanitize_name, vegetable_key};
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
#[cfg(feature = "storage-object")]
pub use object::ObjectBlobStore;
pub use traits::{BlobStore, SaveOptions, StorageError, StorageResult};
