//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum provider calls per extraction (including the first)
    pub max_attempts: u32,

    /// Base backoff delay (milliseconds); attempt `n` waits `n * base`
    pub base_delay_ms: u64,

    /// Maximum time for a single provider call (seconds)
    pub attempt_timeout_secs: u64,

    /// Largest document accepted (bytes)
    pub max_document_bytes: usize,
}

impl ExtractorConfig {
    /// Get the base backoff delay as a Duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Get the per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Delay before the attempt following `attempt` (linear backoff)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay().saturating_mul(attempt)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.attempt_timeout_secs == 0 {
            return Err("attempt_timeout_secs must be greater than 0".to_string());
        }
        if self.max_document_bytes == 0 {
            return Err("max_document_bytes must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            attempt_timeout_secs: 120,
            max_document_bytes: 32 * 1024 * 1024,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fewer attempts, shorter waits
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 250,
            attempt_timeout_secs: 60,
            max_document_bytes: 16 * 1024 * 1024,
        }
    }

    /// Lenient preset: more attempts, longer waits, larger documents
    pub fn lenient() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2_000,
            attempt_timeout_secs: 300,
            max_document_bytes: 64 * 1024 * 1024,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
        assert!(ExtractorConfig::lenient().max_attempts > ExtractorConfig::aggressive().max_attempts);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = ExtractorConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_delay_allowed() {
        let config = ExtractorConfig {
            base_delay_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.backoff_delay(2), Duration::ZERO);
    }

    #[test]
    fn test_backoff_is_linear() {
        let config = ExtractorConfig::default();
        assert_eq!(config.backoff_delay(1), Duration::from_millis(1_000));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(2_000));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(3_000));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_parse_error() {
        assert!(ExtractorConfig::from_toml("max_attempts = \"three\"").is_err());
    }
}
