use std::{collections::HashMap, path::Path};

use config::{Config, Environment, File, FileFormat};
use eyre::{Context, Result};

use crate::config::models::GatewayConfig;

/// Prefix of structured environment overrides, e.g. `GATEWAY__UPSTREAMS__AUTH`.
pub const ENV_PREFIX: &str = "GATEWAY";

/// Deployment variables mapped onto upstream URLs.
const UPSTREAM_ENV_VARS: [(&str, &str); 6] = [
    ("MS_AUTH_DOMAIN", "upstreams.auth"),
    ("MS_CATALOG_DOMAIN", "upstreams.catalog"),
    ("MS_AI_DOMAIN", "upstreams.ai"),
    ("MS_IMAGE_RECOGNITION_DOMAIN", "upstreams.image_recognition"),
    ("MS_SCRAPPING_DOMAIN", "upstreams.scrapping"),
    ("MS_POSTS_DOMAIN", "upstreams.posts"),
];

const API_KEYS_ENV_VAR: &str = "VALID_API_KEYS";
const PORT_ENV_VAR: &str = "PORT";

/// Load configuration from an optional file plus the process environment.
///
/// Precedence, lowest first: file, `GATEWAY__*` variables, deployment
/// variables (`MS_*_DOMAIN`, `VALID_API_KEYS`, `PORT`).
pub fn load_config(config_path: Option<&str>) -> Result<GatewayConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_config_with_env(config_path, &env)
}

/// Same as [`load_config`] with an explicit environment.
pub fn load_config_with_env(
    config_path: Option<&str>,
    env: &HashMap<String, String>,
) -> Result<GatewayConfig> {
    let mut builder = Config::builder();

    if let Some(config_path) = config_path {
        let path = Path::new(config_path);
        builder = builder.add_source(File::new(config_path, file_format(path)));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("api_keys")
            .try_parsing(true)
            .source(Some(env.clone())),
    );

    for (var, key) in UPSTREAM_ENV_VARS {
        builder = builder
            .set_override_option(key, non_empty(env, var))
            .with_context(|| format!("Failed to apply {var}"))?;
    }

    if let Some(keys) = non_empty(env, API_KEYS_ENV_VAR) {
        builder = builder
            .set_override("api_keys", split_api_keys(&keys))
            .with_context(|| format!("Failed to apply {API_KEYS_ENV_VAR}"))?;
    }

    if let Some(port) = non_empty(env, PORT_ENV_VAR) {
        builder = builder
            .set_override("listen_addr", format!("0.0.0.0:{port}"))
            .with_context(|| format!("Failed to apply {PORT_ENV_VAR}"))?;
    }

    let settings = builder
        .build()
        .with_context(|| match config_path {
            Some(path) => format!("Failed to build config from {path}"),
            None => "Failed to build config from environment".to_string(),
        })?;

    settings
        .try_deserialize()
        .context("Failed to deserialize gateway configuration")
}

fn file_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Yaml,
    }
}

fn non_empty(env: &HashMap<String, String>, var: &str) -> Option<String> {
    env.get(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Split a comma separated key list, dropping blanks.
pub fn split_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
