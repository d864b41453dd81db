pub mod dtos;
pub mod entities;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult, ErrorKind};
pub use services::{AiService, AuthService, CatalogService, PostsService, ScrappingService};
