use base64::{engine::general_purpose::STANDARD, Engine as _};
use harvest_core::AppError;

/// Decode the image payload from standard (padded) base64.
///
/// The alphabet and padding are enforced; URL-safe or unpadded input is rejected.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Decode(e.to_string()))
}
