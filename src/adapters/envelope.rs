//! The `{ data, error }` payload shared by the REST and GraphQL surfaces.
use async_graphql::{OutputType, SimpleObject};
use serde::Serialize;

use crate::core::{
    entities::{AiRecipe, Liquor, Post, Product, Recipe, SuccessfulLogin, User},
    error::ApiError,
};

pub const LIQUOR_DELETED: &str = "liquor deleted successfully";
pub const RECIPE_DELETED: &str = "recipe deleted successfully";
pub const POST_DELETED: &str = "post deleted successfully";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const TOKEN_VERIFIED: &str = "successfully verify";

/// Error half of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[graphql(name = "Error")]
pub struct ErrorBody {
    pub message: String,
    pub status: i32,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.message().to_string(),
            status: i32::from(err.status()),
        }
    }
}

// `concrete(params(..))` only accepts plain paths, so generic params go through aliases.
type LiquorList = Vec<Liquor>;
type RecipeList = Vec<Recipe>;
type PostList = Vec<Post>;
type TextList = Vec<String>;

/// Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(concrete(name = "LiquorResponse", params(Liquor)))]
#[graphql(concrete(name = "LiquorsResponse", params(LiquorList)))]
#[graphql(concrete(name = "RecipeResponse", params(Recipe)))]
#[graphql(concrete(name = "RecipesResponse", params(RecipeList)))]
#[graphql(concrete(name = "PostResponse", params(Post)))]
#[graphql(concrete(name = "PostsResponse", params(PostList)))]
#[graphql(concrete(name = "UserResponse", params(User)))]
#[graphql(concrete(name = "LoginResponse", params(SuccessfulLogin)))]
#[graphql(concrete(name = "ProductResponse", params(Product)))]
#[graphql(concrete(name = "AIRecipeResponse", params(AiRecipe)))]
#[graphql(concrete(name = "MessageResponse", params(String)))]
#[graphql(concrete(name = "TextsResponse", params(TextList)))]
pub struct Envelope<T: OutputType> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T: OutputType> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody::from(err)),
        }
    }
}

impl<T: OutputType> From<Result<T, ApiError>> for Envelope<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_failure_serializes_null_data() {
        let envelope = Envelope::<Liquor>::failure(&ApiError::not_found("liquor not found"));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "data": null,
                "error": { "message": "liquor not found", "status": 404 }
            })
        );
    }

    #[test]
    fn test_from_ok_result() {
        let envelope: Envelope<String> = Ok::<_, ApiError>("pong".to_string()).into();
        assert_eq!(envelope.data.as_deref(), Some("pong"));
        assert!(envelope.error.is_none());
    }
}
