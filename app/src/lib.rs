//! Synthetic document-image dataset generation.
//!
//! Wires configuration, PAGE-XML region lookup and the compositing engine
//! into batch generation and region cropping.

pub mod config;
pub mod crop;
pub mod dataset;

pub use config::{AppConfig, OnError};
pub use crop::crop_command;
pub use dataset::{DatasetReport, DatasetRequest, generate_dataset, read_list};

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
