//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parseable)
//! - Check the auth section is usable when enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BffConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BffConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("{section}.address is not a valid socket address: {value}")]
    InvalidBackendAddress { section: &'static str, value: String },

    #[error("recommendations.request_timeout_ms must be greater than zero")]
    ZeroRequestTimeout,

    #[error("recommendations.reset_window_secs must be greater than zero")]
    ZeroResetWindow,

    #[error("timeouts.{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("auth.issuer must not be empty when auth is enabled")]
    EmptyIssuer,

    #[error("auth.subjects must not be empty when auth is enabled")]
    EmptySubjects,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &BffConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    for (section, address) in [
        ("catalog", &config.catalog.address),
        ("recommendations", &config.recommendations.address),
    ] {
        if address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBackendAddress {
                section,
                value: address.clone(),
            });
        }
    }

    if config.recommendations.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.recommendations.reset_window_secs == 0 {
        errors.push(ValidationError::ZeroResetWindow);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "connect_secs",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "request_secs",
        });
    }

    if config.auth.enabled {
        if config.auth.issuer.is_empty() {
            errors.push(ValidationError::EmptyIssuer);
        }
        if config.auth.subjects.is_empty() {
            errors.push(ValidationError::EmptySubjects);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BffConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = BffConfig::default();
        config.catalog.address = "not-an-address".into();
        config.recommendations.request_timeout_ms = 0;
        config.recommendations.reset_window_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::ZeroResetWindow));
    }

    #[test]
    fn auth_checked_only_when_enabled() {
        let mut config = BffConfig::default();
        config.auth.subjects.clear();
        assert!(validate_config(&config).is_err());

        config.auth.enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
