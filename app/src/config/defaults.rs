//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("DOCBLEND_SEED", "10", "Seed for the batch random generator"),
    ("DOCBLEND_BLEND_MODE", "multiply", "multiply, alpha or mask"),
    ("DOCBLEND_SCALE_MIN", "0.7", "Lower bound of the random scale factor"),
    ("DOCBLEND_SCALE_MAX", "1.0", "Upper bound (exclusive) of the random scale factor"),
    ("DOCBLEND_ON_ERROR", "abort", "abort or skip a document that fails"),
    ("DOCBLEND_SELECTOR", "entity=signature", "Region selector for target regions"),
    ("DOCBLEND_DEBUG_DRAW", "false", "Outline target regions and placements in the output"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting definitions in declaration order.
pub fn definitions() -> impl Iterator<Item = &'static SettingDef> {
    DEFS.iter().filter_map(|(key, _, _)| DEFAULT_SETTINGS.get(key))
}

/// `--help` section listing every setting with its default.
pub fn environment_help() -> String {
    let width = definitions().map(|d| d.key.len()).max().unwrap_or(0);
    let mut help = String::from("Environment (also read from .env):\n");
    for def in definitions() {
        help.push_str(&format!(
            "  {:<width$}  {} [default: {}]\n",
            def.key, def.description, def.default
        ));
    }
    help
}
