//! Configuration: setting definitions, validation, loading from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::{AppConfig, OnError};
pub use defaults::environment_help;
pub use validation::validate_setting;
