//! Harvest API Library
//!
//! HTTP handlers, the ingestion pipeline and application setup.

mod handlers;
mod telemetry;

pub mod clock;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use error::{ErrorResponse, HttpAppError};
pub use services::IngestionService;
pub use state::AppState;
