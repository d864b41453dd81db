//! Application assembly: services, shared state and the top-level router.
use std::{collections::HashSet, sync::Arc};

use async_graphql_axum::GraphQL;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::compression::CompressionLayer;

use super::{
    graphql::build_schema,
    middleware::{
        ApiKeys, api_key_middleware, api_metrics_middleware, cors_middleware,
        request_id_middleware,
    },
    rest,
    upstream::{AiClient, AuthClient, CatalogClient, PostsClient, ScrappingClient},
};
use crate::{
    config::models::UpstreamsConfig,
    core::services::{AiService, AuthService, CatalogService, PostsService, ScrappingService},
    metrics::MetricsRecorder,
};

/// Every domain service, shared by the REST and GraphQL surfaces.
#[derive(Clone)]
pub struct GatewayServices {
    pub catalog: CatalogService,
    pub ai: AiService,
    pub scrapping: ScrappingService,
    pub auth: AuthService,
    pub posts: PostsService,
}

impl GatewayServices {
    /// Wire one upstream client per domain, all reporting to `metrics`.
    pub fn from_upstreams(
        upstreams: &UpstreamsConfig,
        http: reqwest::Client,
        metrics: &MetricsRecorder,
    ) -> Self {
        Self {
            catalog: CatalogService::new(Arc::new(CatalogClient::new(
                http.clone(),
                &upstreams.catalog,
                metrics.clone(),
            ))),
            ai: AiService::new(Arc::new(AiClient::new(
                http.clone(),
                &upstreams.ai,
                &upstreams.image_recognition,
                metrics.clone(),
            ))),
            scrapping: ScrappingService::new(Arc::new(ScrappingClient::new(
                http.clone(),
                &upstreams.scrapping,
                metrics.clone(),
            ))),
            auth: AuthService::new(Arc::new(AuthClient::new(
                http.clone(),
                &upstreams.auth,
                metrics.clone(),
            ))),
            posts: PostsService::new(Arc::new(PostsClient::new(
                http,
                &upstreams.posts,
                metrics.clone(),
            ))),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub services: GatewayServices,
    pub prometheus: Option<PrometheusHandle>,
}

/// Build the gateway router: REST routes, `/graphql`, `/metrics` and the
/// middleware stack (request id, CORS, inbound metrics, API key).
pub fn build_router(
    services: GatewayServices,
    api_keys: impl IntoIterator<Item = String>,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let api_keys: ApiKeys = Arc::new(api_keys.into_iter().collect::<HashSet<_>>());
    let schema = build_schema(services.clone());
    let state = AppState {
        services,
        prometheus,
    };

    rest::routes()
        .route("/metrics", get(render_metrics))
        .with_state(state)
        .route_service("/graphql", GraphQL::new(schema))
        .layer(middleware::from_fn_with_state(api_keys, api_key_middleware))
        .layer(middleware::from_fn(api_metrics_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
