//! Configuration validation

use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a request deadline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeout` if the timeout is zero or longer
    /// than one hour.
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(format!("{name} cannot be zero")));
        }
        if timeout.as_secs() > 3600 {
            return Err(ConfigError::InvalidTimeout(format!("{name} cannot exceed 1 hour")));
        }
        Ok(())
    }

    /// Validate a base URL: absolute with an http(s) scheme.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse or uses
    /// another scheme.
    pub fn validate_base_url(base: &str) -> ConfigResult<()> {
        let parsed = url::Url::parse(base).map_err(|e| ConfigError::InvalidBaseUrl(format!("{base}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidBaseUrl(format!("unsupported scheme {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts() {
        assert!(ConfigValidator::validate_timeout(Duration::from_secs(5), "timeout").is_ok());
        assert!(matches!(
            ConfigValidator::validate_timeout(Duration::ZERO, "timeout"),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(ConfigValidator::validate_timeout(Duration::from_secs(7200), "timeout").is_err());
    }

    #[test]
    fn base_urls() {
        assert!(ConfigValidator::validate_base_url("https://api.example.com/v1").is_ok());
        assert!(ConfigValidator::validate_base_url("ftp://files.example.com").is_err());
        assert!(ConfigValidator::validate_base_url("/relative").is_err());
    }
}
