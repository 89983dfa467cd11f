// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("duplicate module submission: '{0}'")]
    DuplicateModule(String),

    #[error("module not found in reactor tree: '{0}'")]
    ModuleNotFound(String),

    #[error("module '{child}' was never declared by parent '{parent}'")]
    UndeclaredModule { parent: String, child: String },

    #[error("cycle detected in module graph involving '{0}'")]
    ModuleCycle(String),

    #[error("reactor walk finished with modules that never became eligible: {0:?}")]
    PendingModules(Vec<String>),

    #[error("action for module '{module}' failed: {source}")]
    ActionFailed {
        module: String,
        source: anyhow::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DocdagError>;
