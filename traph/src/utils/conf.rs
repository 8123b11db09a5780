use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    magic::{ENV_CONFIG_PATH, ENV_VALIDATION},
    utils::error::{TraphError, TraphResult},
};

/// How input reads are checked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ValidationMode {
    /// Reading an absent input key fails with [`TraphError::MissingInputField`].
    #[default]
    Strict,
    /// Absent input keys read as a `Value::Null` placeholder.
    #[strum(to_string = "pass-through", serialize = "off")]
    PassThrough,
}

/// Configuration of a transformer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraphConfig {
    pub validation: ValidationMode,
}

impl TraphConfig {
    /// Configuration taken from the environment.
    ///
    /// If [`ENV_CONFIG_PATH`] is set the TOML file it points to is loaded first, then
    /// [`ENV_VALIDATION`] (when set) overrides the validation mode.
    pub fn from_env() -> TraphResult<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load_from_toml(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(value) = std::env::var(ENV_VALIDATION) {
            config.validation = parse_validation(&value)?;
        }

        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> TraphResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        toml::from_str(&toml_str).map_err(|e| TraphError::ConfigParseError {
            source: e,
            file: path.display().to_string(),
        })
    }

    /// Parse a configuration from TOML text. `origin` names the source in errors.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> TraphResult<Self> {
        toml::from_str(toml_str).map_err(|e| TraphError::ConfigParseError {
            source: e,
            file: origin.to_string(),
        })
    }
}

fn parse_validation(value: &str) -> TraphResult<ValidationMode> {
    ValidationMode::from_str(value.trim()).map_err(|_| TraphError::InvalidEnvValue {
        var: ENV_VALIDATION.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_strict() {
        assert_eq!(TraphConfig::default().validation, ValidationMode::Strict);
    }

    #[test]
    fn parses_validation_from_toml() {
        let text = "validation = \"pass-through\"\n";
        let config = TraphConfig::from_toml_str(text, "inline").unwrap();
        assert_eq!(config.validation, ValidationMode::PassThrough);

        let config = TraphConfig::from_toml_str("", "inline").unwrap();
        assert_eq!(config.validation, ValidationMode::Strict);
    }

    #[test]
    fn rejects_unknown_validation_in_toml() {
        let text = "validation = \"sometimes\"\n";
        let err = TraphConfig::from_toml_str(text, "inline").unwrap_err();
        match err {
            TraphError::ConfigParseError { file, .. } => assert_eq!(file, "inline"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn validation_env_values() {
        assert_eq!(parse_validation("strict").unwrap(), ValidationMode::Strict);
        assert_eq!(
            parse_validation("OFF").unwrap(),
            ValidationMode::PassThrough
        );
        assert_eq!(
            parse_validation(" pass-through ").unwrap(),
            ValidationMode::PassThrough
        );
        let err = parse_validation("maybe").unwrap_err();
        assert!(err.is_invalid_env_value());
        assert_eq!(ValidationMode::PassThrough.to_string(), "pass-through");
    }
}
