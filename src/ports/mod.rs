pub mod upstream;

pub use upstream::{AiUpstream, AuthUpstream, CatalogUpstream, PostsUpstream, ScrappingUpstream};
