//! Cococtel gateway: REST and GraphQL front door for the Cococtel microservices.
//!
//! The gateway owns no data. Every inbound operation becomes one (or a short,
//! fixed sequence of) outbound HTTP calls to the auth, catalog, AI, scrapping
//! or posts service, and every answer is normalized into the same
//! `{ data, error }` envelope.
//!
//! # Layout
//! - [`core`] holds the domain records, the [`ApiError`] taxonomy and the
//!   domain services that validate input and relabel upstream failures.
//! - [`ports`] declares one trait per upstream domain; the services only see
//!   these traits.
//! - [`adapters`] implements them over `reqwest` ([`adapters::upstream`]) and
//!   exposes the services through axum routes and an `async-graphql` schema.
//! - [`metrics`] records one latency/traffic/error sample per upstream call
//!   and tracks in-flight calls per upstream.
//!
//! # Quick Example
//! ```no_run
//! use cococtel_gateway::{
//!     GatewayServices, MetricsRecorder, build_http_client, build_router, config::load_config,
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let config = load_config(Some("gateway.toml"))?;
//! let http = build_http_client(config.request_timeout())?;
//! let services = GatewayServices::from_upstreams(&config.upstreams, http, &MetricsRecorder::new());
//! let app = build_router(services, config.api_keys.clone(), None);
//!
//! let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(()) }
//! ```
//!
//! # Error Handling
//! Request-path failures are [`ApiError`] values carrying a kind, a message
//! and an HTTP status. Startup and configuration use `eyre::Result` with
//! context attached through `WrapErr`.
pub mod config;
pub mod metrics;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

pub mod adapters;
pub mod core;

pub use crate::{
    adapters::{GatewayServices, build_http_client, build_router, build_schema},
    core::{ApiError, ApiResult, ErrorKind},
    metrics::{MetricsRecorder, MetricsSnapshot},
    utils::{GracefulShutdown, ShutdownReason},
};
