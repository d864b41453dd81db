use std::net::SocketAddr;

use url::Url;

use crate::config::models::GatewayConfig;

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

pub struct GatewayConfigValidator;

impl GatewayConfigValidator {
    /// Validate the whole configuration, reporting every problem at once.
    pub fn validate(config: &GatewayConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_listen_address(&config.listen_addr) {
            errors.push(e);
        }

        if config.api_keys.iter().all(|key| key.trim().is_empty()) {
            errors.push(ValidationError::MissingField {
                field: "api_keys".to_string(),
            });
        }

        for (name, url) in config.upstreams.entries() {
            if let Err(e) = Self::validate_upstream_url(name, url) {
                errors.push(e);
            }
        }

        if config.request_timeout_secs == 0 {
            errors.push(ValidationError::InvalidField {
                field: "request_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::ValidationFailed {
                message: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }

    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        address
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    fn validate_upstream_url(name: &str, url: &str) -> ValidationResult<()> {
        let field = format!("upstreams.{name}");
        if url.trim().is_empty() {
            return Err(ValidationError::MissingField { field });
        }

        let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidField {
            field: field.clone(),
            message: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ValidationError::InvalidField {
                field,
                message: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_is_valid() {
        assert!(GatewayConfigValidator::validate(&GatewayConfig::example()).is_ok());
    }

    #[test]
    fn test_single_problem_reported_directly() {
        let mut config = GatewayConfig::example();
        config.upstreams.posts = "ftp://posts".to_string();

        let err = GatewayConfigValidator::validate(&config).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidField {
                field: "upstreams.posts".to_string(),
                message: "unsupported scheme 'ftp'".to_string(),
            }
        );
    }

    #[test]
    fn test_all_problems_aggregated() {
        let config = GatewayConfig {
            listen_addr: "not-an-address".to_string(),
            request_timeout_secs: 0,
            ..GatewayConfig::default()
        };

        let err = GatewayConfigValidator::validate(&config).unwrap_err();
        let ValidationError::ValidationFailed { message } = err else {
            panic!("expected aggregated error");
        };
        assert!(message.contains("not-an-address"));
        assert!(message.contains("api_keys"));
        assert!(message.contains("upstreams.auth"));
        assert!(message.contains("upstreams.image_recognition"));
        assert!(message.contains("request_timeout_secs"));
    }
}
