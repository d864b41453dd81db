use async_trait::async_trait;
use bytes::Bytes;

use crate::core::{
    dtos::{
        LiquorInput, LiquorPatch, LoginInput, PostInput, PostPatch, ProfileInput, RecipeInput,
        RecipePatch, RegisterInput,
    },
    entities::{AiRecipe, Liquor, Post, Product, Recipe, SuccessfulLogin, User},
    error::ApiResult,
};

/// Port for the catalog microservice (liquors and recipes).
///
/// Every method performs exactly one upstream HTTP call and records exactly
/// one metric sample, whatever the outcome.
#[async_trait]
pub trait CatalogUpstream: Send + Sync + 'static {
    async fn fetch_liquors(&self) -> ApiResult<Vec<Liquor>>;
    async fn fetch_liquor_by_id(&self, id: &str) -> ApiResult<Liquor>;
    async fn create_liquor(&self, liquor: &LiquorInput) -> ApiResult<Liquor>;
    async fn update_liquor(&self, id: &str, changes: &LiquorPatch) -> ApiResult<Liquor>;
    async fn delete_liquor(&self, id: &str) -> ApiResult<()>;

    async fn fetch_recipes(&self) -> ApiResult<Vec<Recipe>>;
    async fn fetch_recipe_by_id(&self, id: &str) -> ApiResult<Recipe>;
    async fn create_recipe(&self, recipe: &RecipeInput) -> ApiResult<Recipe>;
    async fn update_recipe(&self, id: &str, changes: &RecipePatch) -> ApiResult<Recipe>;
    async fn delete_recipe(&self, id: &str) -> ApiResult<()>;
}

/// Port for the AI and image-recognition microservices.
#[async_trait]
pub trait AiUpstream: Send + Sync + 'static {
    /// Deduce a liquor name from loose text fragments. Returns the raw answer.
    async fn process_strings(&self, input: &[String]) -> ApiResult<String>;
    async fn create_recipe(&self, liquor: &str) -> ApiResult<AiRecipe>;
    async fn extract_text_from_image(&self, image: Bytes) -> ApiResult<Vec<String>>;
}

/// Port for the barcode scrapping microservice.
#[async_trait]
pub trait ScrappingUpstream: Send + Sync + 'static {
    async fn product_by_code(&self, code: &str) -> ApiResult<Product>;
}

/// Port for the authentication microservice. `token` is forwarded verbatim
/// as `x-auth-token`.
#[async_trait]
pub trait AuthUpstream: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> ApiResult<()>;
    async fn register(&self, user: &RegisterInput) -> ApiResult<User>;
    async fn login(&self, credentials: &LoginInput) -> ApiResult<SuccessfulLogin>;
    async fn user(&self, id: &str, token: &str) -> ApiResult<User>;
    async fn edit_user(&self, profile: &ProfileInput, token: &str) -> ApiResult<()>;
}

/// Port for the posts microservice.
#[async_trait]
pub trait PostsUpstream: Send + Sync + 'static {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>>;
    async fn fetch_post_by_id(&self, id: &str) -> ApiResult<Post>;
    async fn create_post(&self, post: &PostInput) -> ApiResult<Post>;
    async fn update_post(&self, id: &str, changes: &PostPatch) -> ApiResult<Post>;
    async fn delete_post(&self, id: &str) -> ApiResult<()>;
}
