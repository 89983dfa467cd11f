// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DocdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DocdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.output,
            raw.probe,
            raw.overrides,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_probe(cfg)?;
    validate_overrides(cfg)?;
    Ok(())
}

fn validate_probe(cfg: &RawConfigFile) -> Result<()> {
    if cfg.probe.timeout_secs == 0 {
        return Err(DocdagError::ConfigError(
            "[probe].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_overrides(cfg: &RawConfigFile) -> Result<()> {
    for entry in cfg.overrides.iter() {
        let mut parts = entry.dependency.split(':');
        let group = parts.next().unwrap_or("");
        let artifact = parts.next().unwrap_or("");
        if group.is_empty() || artifact.is_empty() || parts.next().is_some() {
            return Err(DocdagError::ConfigError(format!(
                "override dependency '{}' must be a 'group:artifact' coordinate",
                entry.dependency
            )));
        }
        if entry.url.is_empty() {
            return Err(DocdagError::ConfigError(format!(
                "override for '{}' has an empty url",
                entry.dependency
            )));
        }
    }
    Ok(())
}
