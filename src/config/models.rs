//! Configuration data structures for the gateway.
//!
//! These map directly to YAML / JSON / TOML files and to `GATEWAY__*`
//! environment variables. Every section has defaults so a minimal
//! configuration only needs the upstream URLs and the API keys.
use serde::{Deserialize, Serialize};

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Base URL of every upstream microservice.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub auth: String,
    pub catalog: String,
    pub ai: String,
    /// Image upload endpoint; requests are posted to this URL as-is.
    pub image_recognition: String,
    pub scrapping: String,
    pub posts: String,
}

impl UpstreamsConfig {
    /// `(name, url)` pairs in a stable order, for validation and logging.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("auth", self.auth.as_str()),
            ("catalog", self.catalog.as_str()),
            ("ai", self.ai.as_str()),
            ("image_recognition", self.image_recognition.as_str()),
            ("scrapping", self.scrapping.as_str()),
            ("posts", self.posts.as_str()),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `cococtel_gateway=debug,info`.
    pub level: String,
    /// JSON lines instead of the pretty console format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level gateway configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Keys accepted in the `x-api-key` header.
    #[serde(default)]
    pub api_keys: Vec<String>,

    #[serde(default)]
    pub upstreams: UpstreamsConfig,

    /// Deadline for each outbound upstream call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            api_keys: Vec::new(),
            upstreams: UpstreamsConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// A configuration pointing at local services, matching the `init` template.
    pub fn example() -> Self {
        Self {
            api_keys: vec!["change-me".to_string()],
            upstreams: UpstreamsConfig {
                auth: "http://localhost:8081".to_string(),
                catalog: "http://localhost:8082".to_string(),
                ai: "http://localhost:8083".to_string(),
                image_recognition: "http://localhost:8084/extract".to_string(),
                scrapping: "http://localhost:8085".to_string(),
                posts: "http://localhost:8086".to_string(),
            },
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.api_keys.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{ "api_keys": ["k1"], "upstreams": { "catalog": "http://catalog" } }"#,
        )
        .unwrap();

        assert_eq!(config.api_keys, vec!["k1".to_string()]);
        assert_eq!(config.upstreams.catalog, "http://catalog");
        assert!(config.upstreams.auth.is_empty());
        assert_eq!(config.request_timeout_secs, 30);
    }
}
