//! Domain services: thin orchestration over the upstream ports.
//!
//! Services never inspect an upstream error beyond its kind and status. They
//! log the failure and re-label it with a caller-facing message, keeping the
//! status the upstream client assigned.
mod ai;
mod auth;
mod catalog;
mod posts;
mod scrapping;

pub use ai::AiService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use posts::PostsService;
pub use scrapping::ScrappingService;

use crate::core::error::ApiError;

/// Message returned when an update carries no fields at all.
pub const EMPTY_UPDATE_MESSAGE: &str = "no fields to update";

fn relabel(err: ApiError, message: &'static str) -> ApiError {
    tracing::warn!(status = err.status(), error = %err, "{message}");
    err.relabel(message)
}
