//! Image format detection from the encoded payload.
//!
//! The signatures below are the base64 renderings of each format's magic bytes, so the
//! check runs on the text the client sent rather than on the decoded buffer.

use harvest_core::models::ImageClassification;

/// Supported image formats, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Detection order matters: the first matching prefix wins.
    const DETECTION_ORDER: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Webp,
    ];

    /// Base64 prefix of the format's magic bytes.
    ///
    /// `\x89PNG` -> `iVBOR`, `FF D8 FF` -> `/9j/`, `GIF8` -> `R0lGOD`, `RIFF` -> `UklGR`.
    fn encoded_signature(self) -> &'static str {
        match self {
            ImageFormat::Png => "iVBOR",
            ImageFormat::Jpeg => "/9j/",
            ImageFormat::Gif => "R0lGOD",
            ImageFormat::Webp => "UklGR",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    /// Match a known signature, or `None` for anything unrecognised.
    pub fn detect(encoded: &str) -> Option<Self> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|format| encoded.starts_with(format.encoded_signature()))
    }

    pub fn classification(self) -> ImageClassification {
        ImageClassification {
            content_type: self.content_type(),
            extension: self.extension(),
        }
    }
}

/// Classify an encoded image payload. Unrecognised input is treated as JPEG.
pub fn sniff(encoded: &str) -> ImageClassification {
    ImageFormat::detect(encoded)
        .unwrap_or(ImageFormat::Jpeg)
        .classification()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_signatures() {
        let cases = [
            ("iVBORw0KGgoAAAANSUhEUg", "image/png", "png"),
            ("/9j/4AAQSkZJRgABAQ", "image/jpeg", "jpg"),
            ("R0lGODlhAQABAIAAAP", "image/gif", "gif"),
            ("UklGRiQAAABXRUJQVlA4", "image/webp", "webp"),
        ];
        for (encoded, content_type, extension) in cases {
            let classification = sniff(encoded);
            assert_eq!(classification.content_type, content_type, "{}", encoded);
            assert_eq!(classification.extension, extension, "{}", encoded);
        }
    }

    #[test]
    fn test_unknown_defaults_to_jpeg() {
        let classification = sniff("AAAAIGZ0eXBhdmlm");
        assert_eq!(classification.content_type, "image/jpeg");
        assert_eq!(classification.extension, "jpg");

        assert_eq!(sniff(""), ImageFormat::Jpeg.classification());
        assert_eq!(ImageFormat::detect("AAAA"), None);
    }

    #[test]
    fn test_prefix_must_be_at_start() {
        assert_eq!(ImageFormat::detect("xxiVBOR"), None);
        assert_eq!(ImageFormat::detect("iVBO"), None);
    }

    #[test]
    fn test_signatures_match_magic_bytes() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let png = STANDARD.encode(b"\x89PNG\r\n\x1a\n");
        let jpeg = STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
        let gif = STANDARD.encode(b"GIF89a");
        let webp = STANDARD.encode(b"RIFF\x24\x00\x00\x00WEBP");

        assert_eq!(ImageFormat::detect(&png), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(&jpeg), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::detect(&gif), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(&webp), Some(ImageFormat::Webp));
    }
}
