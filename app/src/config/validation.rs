//! Setting value validation.

use std::sync::LazyLock;

use image_processor::BlendMode;
use page_annotation::RegionSelector;
use regex::Regex;

static RE_SEED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,20}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "DOCBLEND_SEED" => {
            if !RE_SEED.is_match(value) || value.parse::<u64>().is_err() {
                return Err("must be an unsigned 64-bit integer".into());
            }
        }
        "DOCBLEND_BLEND_MODE" => {
            value.parse::<BlendMode>().map_err(|e| e.to_string())?;
        }
        "DOCBLEND_SCALE_MIN" | "DOCBLEND_SCALE_MAX" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(v > 0.0 && v <= 1.0) {
                return Err("must be greater than 0.0 and at most 1.0".into());
            }
        }
        "DOCBLEND_ON_ERROR" => {
            if value != "abort" && value != "skip" {
                return Err("must be 'abort' or 'skip'".into());
            }
        }
        "DOCBLEND_SELECTOR" => {
            value
                .parse::<RegionSelector>()
                .map_err(|e| e.to_string())?;
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "DOCBLEND_DEBUG_DRAW")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("DOCBLEND_DEBUG_DRAW", "true").is_ok());
        assert!(validate_setting("DOCBLEND_DEBUG_DRAW", "false").is_ok());
        assert!(validate_setting("DOCBLEND_DEBUG_DRAW", "yes").is_err());
    }

    #[test]
    fn test_valid_seed() {
        assert!(validate_setting("DOCBLEND_SEED", "10").is_ok());
        assert!(validate_setting("DOCBLEND_SEED", "18446744073709551615").is_ok());
        assert!(validate_setting("DOCBLEND_SEED", "18446744073709551616").is_err());
        assert!(validate_setting("DOCBLEND_SEED", "-1").is_err());
        assert!(validate_setting("DOCBLEND_SEED", "").is_err());
    }

    #[test]
    fn test_valid_scale() {
        assert!(validate_setting("DOCBLEND_SCALE_MIN", "0.7").is_ok());
        assert!(validate_setting("DOCBLEND_SCALE_MAX", "1.0").is_ok());
        assert!(validate_setting("DOCBLEND_SCALE_MAX", "1.1").is_err());
        assert!(validate_setting("DOCBLEND_SCALE_MIN", "0").is_err());
        assert!(validate_setting("DOCBLEND_SCALE_MIN", "big").is_err());
    }

    #[test]
    fn test_valid_enums() {
        assert!(validate_setting("DOCBLEND_BLEND_MODE", "mask").is_ok());
        assert!(validate_setting("DOCBLEND_BLEND_MODE", "screen").is_err());
        assert!(validate_setting("DOCBLEND_ON_ERROR", "skip").is_ok());
        assert!(validate_setting("DOCBLEND_ON_ERROR", "retry").is_err());
        assert!(validate_setting("DOCBLEND_SELECTOR", "entity=sketch").is_ok());
        assert!(validate_setting("DOCBLEND_SELECTOR", "entity=").is_err());
    }
}
