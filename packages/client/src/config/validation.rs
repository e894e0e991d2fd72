//! Configuration validation

use std::time::Duration;

use super::core::HttpConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidTimeout` - if timeout values are zero or exceed one hour
    /// - `InvalidBufferSize` - if the body limit is zero
    /// - `InvalidParameter` - if the user agent is empty
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if:
    /// - The timeout duration is zero
    /// - The timeout duration exceeds 1 hour (3600 seconds)
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout.as_secs() > 3600 {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }

    /// Validate buffer size
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidBufferSize` if the size is zero.
    pub fn validate_buffer_size(size: usize, name: &str) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "{name} cannot be zero"
            )));
        }

        Ok(())
    }
}

impl Validator for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.connect_timeout, "connect_timeout")?;
        ConfigValidator::validate_timeout(self.tls_handshake_timeout, "tls_handshake_timeout")?;
        ConfigValidator::validate_timeout(self.response_timeout, "response_timeout")?;
        if let Some(keepalive) = self.tcp_keepalive {
            ConfigValidator::validate_timeout(keepalive, "tcp_keepalive")?;
        }
        ConfigValidator::validate_buffer_size(self.max_body_size, "max_body_size")?;

        if self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::InvalidParameter(
                "user_agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(HttpConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_connect_timeout_is_rejected() {
        let config = HttpConfig::default().with_connect_timeout(Duration::ZERO);
        let err = config.validate().expect_err("zero timeout must be rejected");
        assert!(matches!(err, ConfigurationError::InvalidTimeout(ref msg) if msg.contains("connect_timeout")));
    }

    #[test]
    fn excessive_response_timeout_is_rejected() {
        let config = HttpConfig::default().with_response_timeout(Duration::from_secs(7200));
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let config = HttpConfig::default().with_max_body_size(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidBufferSize(_))
        ));
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let config = HttpConfig::default().with_user_agent("   ");
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter(_))
        ));
    }
}
