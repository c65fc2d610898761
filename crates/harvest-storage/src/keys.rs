//! Shared key generation for storage backends.

/// Directory every vegetable image is stored under.
pub const KEY_PREFIX: &str = "vegetables";

/// Replace every run of whitespace in `name` with a single underscore.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }

    out
}

/// Storage key for one upload: `vegetables/{sanitized_name}_{epoch_millis}.{extension}`.
pub fn vegetable_key(veg_name: &str, epoch_millis: i64, extension: &str) -> String {
    format!(
        "{}/{}_{}.{}",
        KEY_PREFIX,
        sanitize_name(veg_name),
        epoch_millis,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_name("Tomato Crate"), "Tomato_Crate");
        assert_eq!(sanitize_name("Red  \t Onion"), "Red_Onion");
        assert_eq!(sanitize_name(" Leek "), "_Leek_");
        assert_eq!(sanitize_name("Okra"), "Okra");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii_names() {
        assert_eq!(sanitize_name("ہری مرچ"), "ہری_مرچ");
    }

    #[test]
    fn test_vegetable_key_layout() {
        assert_eq!(
            vegetable_key("Tomato Crate", 1_709_287_200_000, "png"),
            "vegetables/Tomato_Crate_1709287200000.png"
        );
    }

    #[test]
    fn test_keys_differ_by_timestamp() {
        let a = vegetable_key("Carrot", 1, "jpg");
        let b = vegetable_key("Carrot", 2, "jpg");
        assert_ne!(a, b);
    }
}
