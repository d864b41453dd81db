pub mod app;
pub mod envelope;
pub mod graphql;
pub mod middleware;
pub mod rest;
pub mod upstream;

pub use app::{AppState, GatewayServices, build_router};
pub use envelope::{Envelope, ErrorBody};
pub use graphql::{GatewaySchema, build_schema};
pub use upstream::{
    AiClient, AuthClient, CatalogClient, PostsClient, ScrappingClient, UpstreamClient,
    build_http_client,
};
