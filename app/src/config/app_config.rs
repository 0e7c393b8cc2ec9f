//! Runtime configuration loaded from the environment.

use std::fmt;
use std::str::FromStr;

use image_processor::{BlendMode, CompositeOptions, SampleRange};
use page_annotation::RegionSelector;

use super::defaults::get_default;
use super::validation::validate_setting;

/// What dataset generation does when one document fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop the batch and return the error.
    #[default]
    Abort,
    /// Log a warning, count the failure and continue.
    Skip,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(OnError::Abort),
            "skip" => Ok(OnError::Skip),
            other => Err(format!("unknown error policy '{other}' (expected abort or skip)")),
        }
    }
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnError::Abort => "abort",
            OnError::Skip => "skip",
        })
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub seed: u64,
    pub blend_mode: BlendMode,
    pub scale_min: f64,
    pub scale_max: f64,
    pub on_error: OnError,
    pub selector: RegionSelector,
    pub debug_draw: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 10,
            blend_mode: BlendMode::Multiply,
            scale_min: 0.7,
            scale_max: 1.0,
            on_error: OnError::Abort,
            selector: RegionSelector::default(),
            debug_draw: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Missing keys fall back to their
    /// defaults; invalid values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String {
            let fallback = get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(v) if v.trim().is_empty() => fallback.to_string(),
                Some(v) => match validate_setting(key, v.trim()) {
                    Ok(()) => v.trim().to_string(),
                    Err(e) => {
                        tracing::warn!(key, value = %v, "Invalid setting ({e}), using default");
                        fallback.to_string()
                    }
                },
                None => fallback.to_string(),
            }
        };

        let defaults = Self::default();
        let mut scale_min = g("DOCBLEND_SCALE_MIN").parse().unwrap_or(defaults.scale_min);
        let mut scale_max = g("DOCBLEND_SCALE_MAX").parse().unwrap_or(defaults.scale_max);
        if scale_min > scale_max {
            tracing::warn!(scale_min, scale_max, "Scale range is inverted, using defaults");
            scale_min = defaults.scale_min;
            scale_max = defaults.scale_max;
        }

        Self {
            seed: g("DOCBLEND_SEED").parse().unwrap_or(defaults.seed),
            blend_mode: g("DOCBLEND_BLEND_MODE")
                .parse()
                .unwrap_or(defaults.blend_mode),
            scale_min,
            scale_max,
            on_error: g("DOCBLEND_ON_ERROR").parse().unwrap_or(defaults.on_error),
            selector: g("DOCBLEND_SELECTOR")
                .parse()
                .unwrap_or(defaults.selector),
            debug_draw: g("DOCBLEND_DEBUG_DRAW") == "true",
        }
    }

    /// Compositor options derived from this configuration.
    pub fn composite_options(&self) -> CompositeOptions {
        CompositeOptions {
            scale_range: SampleRange::new(self.scale_min, self.scale_max),
            mode: self.blend_mode,
            ..CompositeOptions::default()
        }
    }
}
