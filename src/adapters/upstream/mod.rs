//! Outbound HTTP clients, one per upstream domain.
//!
//! All of them share [`UpstreamClient`], which owns the dispatch contract:
//! one request, one metric sample, and a fixed classification order
//! (transport failure, body read, status, decode).
pub mod ai;
pub mod auth;
pub mod catalog;
pub mod posts;
pub mod scrapping;

use std::time::Duration;

use eyre::{Result, WrapErr};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::Instrument;

pub use ai::AiClient;
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use posts::PostsClient;
pub use scrapping::ScrappingClient;

use crate::{
    core::error::{ApiError, ApiResult},
    metrics::MetricsRecorder,
    tracing_setup::create_upstream_span,
};

/// Build the outbound HTTP client shared by every upstream.
///
/// `timeout` is the only deadline applied to upstream calls; cancelling the
/// inbound request does not abort an outbound call already in progress.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cococtel-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .wrap_err("Failed to build outbound HTTP client")
}

/// Dispatch core bound to one upstream base URL and metrics repository label.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    repository: &'static str,
    metrics: MetricsRecorder,
}

impl UpstreamClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        repository: &'static str,
        metrics: MetricsRecorder,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            repository,
            metrics,
        }
    }

    pub fn repository(&self) -> &'static str {
        self.repository
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Send `request` and classify the outcome.
    ///
    /// Exactly one metric sample is recorded on every path, including when the
    /// returned future is dropped before completion. A transport failure or a
    /// cancelled call is recorded with status code 0. Any status >= 300 is
    /// rejected with that status before the body is decoded. `decode` runs
    /// only on an OK status; an error it returns is recorded as a failed call.
    pub async fn execute<T, F>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        decode: F,
    ) -> ApiResult<T>
    where
        F: FnOnce(&[u8]) -> ApiResult<T>,
    {
        let sample = self.metrics.start_sample(self.repository, operation);
        let request = match request.build() {
            Ok(request) => request,
            Err(err) => {
                sample.finish(0, true);
                return Err(ApiError::transport(format!(
                    "invalid {} request: {err}",
                    self.repository
                )));
            }
        };

        let span = create_upstream_span(
            self.repository,
            operation,
            request.method().as_str(),
            request.url().as_str(),
        );

        async move {
            let exchange = {
                let _in_flight = self.metrics.track_in_flight(self.repository);
                match self.http.execute(request).await {
                    Ok(response) => {
                        let status = response.status();
                        Ok((status, response.bytes().await))
                    }
                    Err(err) => Err(err),
                }
            };

            let (status, body) = match exchange {
                Ok(exchange) => exchange,
                Err(err) => {
                    tracing::warn!(error = %err, "Upstream unreachable");
                    sample.finish(0, true);
                    return Err(ApiError::transport(format!(
                        "{} service unreachable: {err}",
                        self.repository
                    )));
                }
            };
            tracing::Span::current().record("http.status_code", status.as_u16());

            let body = match body {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to read upstream body");
                    sample.finish(status.as_u16(), true);
                    return Err(ApiError::decode(format!(
                        "failed to read {} response: {err}",
                        self.repository
                    )));
                }
            };

            if status.as_u16() >= 300 {
                tracing::warn!(status = status.as_u16(), "Upstream rejected request");
                sample.finish(status.as_u16(), true);
                return Err(ApiError::rejected(
                    status,
                    rejection_message(self.repository, status, &body),
                ));
            }

            let outcome = decode(&body);
            if let Err(err) = &outcome {
                tracing::warn!(error = %err, "Upstream payload rejected");
            }
            sample.finish(status.as_u16(), outcome.is_err());
            outcome
        }
        .instrument(span)
        .await
    }
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Prefer the upstream's own `message`/`error` field when it sent one.
fn rejection_message(repository: &str, status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<UpstreamErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => format!("{repository} service answered {status}"),
    }
}

/// Decode a JSON body into `T`.
pub fn json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::decode(format!("invalid upstream payload: {err}")))
}

/// Return the body as UTF-8 text.
pub fn text(body: &[u8]) -> ApiResult<String> {
    String::from_utf8(body.to_vec())
        .map_err(|err| ApiError::decode(format!("upstream answered non UTF-8 text: {err}")))
}

/// Ignore the body entirely.
pub fn discard(_body: &[u8]) -> ApiResult<()> {
    Ok(())
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
