use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::models::LoggingConfig;

/// Initialize logging from the `logging` section of the gateway configuration.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_from_config(logging: &LoggingConfig) -> Result<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone());
    init_tracing_with_config(&level, logging.json)
}

/// Initialize tracing with an explicit filter directive and output format.
pub fn init_tracing_with_config(level: &str, json_format: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_new(level).wrap_err_with(|| format!("Invalid log level: {level}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if json_format {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.json().with_current_span(true).with_span_list(true))
            .try_init()
            .wrap_err("Failed to install JSON tracing subscriber")?;
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.pretty().with_ansi(true))
            .try_init()
            .wrap_err("Failed to install console tracing subscriber")?;
    }

    tracing::info!(level, json = json_format, "Gateway logging initialized");
    Ok(())
}

/// Span wrapping one inbound request.
pub fn create_request_span(method: &str, path: &str, request_id: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        http.method = method,
        http.path = path,
        request.id = request_id,
        http.status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Span wrapping one outbound upstream call. `http.status_code` is recorded
/// once a response arrives and stays empty on transport failure.
pub fn create_upstream_span(
    repository: &str,
    operation: &str,
    method: &str,
    url: &str,
) -> tracing::Span {
    tracing::info_span!(
        "upstream_request",
        upstream.repository = repository,
        upstream.operation = operation,
        http.method = method,
        http.url = url,
        http.status_code = tracing::field::Empty,
    )
}
