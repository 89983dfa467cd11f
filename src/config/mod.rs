// src/config/mod.rs

//! TOML configuration: raw deserialization, validation, defaults.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_optional};
pub use model::{ConfigFile, OutputSection, ProbeSection, RawConfigFile, UrlOverride};
