/// Service configuration
///
/// Every key is optional; a missing key takes the default of the original
/// webhook deployment.

use crate::decoder::DEFAULT_PREVIEW_CHARS;
use crate::store::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Upper bound on the retained window
pub const MAX_CAPACITY: usize = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`{field}` must be greater than zero")]
    Zero { field: &'static str },

    #[error("`{field}` must be at most {max}")]
    TooLarge { field: &'static str, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub capacity: usize,
    pub max_payload_bytes: usize,
    pub preview_chars: usize,
    pub topic_name: String,
    pub service_name: String,
    pub service_version: String,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            capacity: DEFAULT_CAPACITY,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            topic_name: "bronze_dbo_trans_hst2".to_string(),
            service_name: "bronze-dbo-trans-hst2-webhook".to_string(),
            service_version: "2.0.0".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServiceConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Zero { field: "capacity" });
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::TooLarge {
                field: "capacity",
                max: MAX_CAPACITY,
            });
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Zero { field: "max_payload_bytes" });
        }
        if self.preview_chars == 0 {
            return Err(ConfigError::Zero { field: "preview_chars" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.capacity, 10);
        assert_eq!(config.preview_chars, 100);
    }

    #[test]
    fn test_partial_override() {
        let config = ServiceConfig::from_toml_str(
            r#"
            capacity = 25
            topic_name = "silver_trans"
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.capacity, 25);
        assert_eq!(config.topic_name, "silver_trans");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ServiceConfig::from_toml_str("capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "capacity" }));
    }

    #[test]
    fn test_huge_capacity_rejected() {
        let err = ServiceConfig::from_toml_str("capacity = 100000000000000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooLarge { field: "capacity", max: MAX_CAPACITY }
        ));
        assert!(ServiceConfig::from_toml_str("capacity = 10000").is_ok());
    }

    #[test]
    fn test_bad_toml() {
        let err = ServiceConfig::from_toml_str("capacity = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
