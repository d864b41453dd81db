use async_trait::async_trait;
use reqwest::{Client, Method};

use super::{UpstreamClient, discard, json, segment};
use crate::{
    core::{
        dtos::{LiquorInput, LiquorPatch, RecipeInput, RecipePatch},
        entities::{Liquor, Recipe},
        error::{ApiError, ApiResult},
    },
    metrics::MetricsRecorder,
    ports::CatalogUpstream,
};

pub const REPOSITORY: &str = "catalog";

/// Client for the catalog service (liquors and recipes).
#[derive(Clone)]
pub struct CatalogClient {
    upstream: UpstreamClient,
}

impl CatalogClient {
    pub fn new(http: Client, base_url: impl Into<String>, metrics: MetricsRecorder) -> Self {
        Self {
            upstream: UpstreamClient::new(http, base_url, REPOSITORY, metrics),
        }
    }
}

fn liquor_with_id(body: &[u8]) -> ApiResult<Liquor> {
    let liquor: Liquor = json(body)?;
    if liquor.id.is_empty() {
        return Err(ApiError::not_found("liquor not found"));
    }
    Ok(liquor)
}

fn recipe_with_id(body: &[u8]) -> ApiResult<Recipe> {
    let recipe: Recipe = json(body)?;
    if recipe.id.is_empty() {
        return Err(ApiError::not_found("recipe not found"));
    }
    Ok(recipe)
}

#[async_trait]
impl CatalogUpstream for CatalogClient {
    async fn fetch_liquors(&self) -> ApiResult<Vec<Liquor>> {
        let request = self.upstream.request(Method::GET, "/liquors");
        self.upstream
            .execute("FetchLiquors", request, |body| {
                let liquors: Vec<Liquor> = json(body)?;
                if liquors.is_empty() {
                    return Err(ApiError::not_found("no liquors found"));
                }
                Ok(liquors)
            })
            .await
    }

    async fn fetch_liquor_by_id(&self, id: &str) -> ApiResult<Liquor> {
        let request = self
            .upstream
            .request(Method::GET, &format!("/liquors/{}", segment(id)));
        self.upstream
            .execute("FetchLiquorByID", request, liquor_with_id)
            .await
    }

    async fn create_liquor(&self, liquor: &LiquorInput) -> ApiResult<Liquor> {
        let request = self.upstream.request(Method::POST, "/liquors").json(liquor);
        self.upstream.execute("CreateLiquor", request, json).await
    }

    async fn update_liquor(&self, id: &str, changes: &LiquorPatch) -> ApiResult<Liquor> {
        let request = self
            .upstream
            .request(Method::PUT, &format!("/liquors/{}", segment(id)))
            .json(changes);
        self.upstream.execute("UpdateLiquor", request, json).await
    }

    async fn delete_liquor(&self, id: &str) -> ApiResult<()> {
        let request = self
            .upstream
            .request(Method::DELETE, &format!("/liquors/{}", segment(id)));
        self.upstream.execute("DeleteLiquor", request, discard).await
    }

    async fn fetch_recipes(&self) -> ApiResult<Vec<Recipe>> {
        let request = self.upstream.request(Method::GET, "/recipes");
        self.upstream.execute("FetchRecipes", request, json).await
    }

    async fn fetch_recipe_by_id(&self, id: &str) -> ApiResult<Recipe> {
        let request = self
            .upstream
            .request(Method::GET, &format!("/recipes/{}", segment(id)));
        self.upstream
            .execute("FetchRecipeByID", request, recipe_with_id)
            .await
    }

    async fn create_recipe(&self, recipe: &RecipeInput) -> ApiResult<Recipe> {
        let request = self.upstream.request(Method::POST, "/recipes").json(recipe);
        self.upstream.execute("CreateRecipe", request, json).await
    }

    async fn update_recipe(&self, id: &str, changes: &RecipePatch) -> ApiResult<Recipe> {
        let request = self
            .upstream
            .request(Method::PUT, &format!("/recipes/{}", segment(id)))
            .json(changes);
        self.upstream.execute("UpdateRecipe", request, json).await
    }

    async fn delete_recipe(&self, id: &str) -> ApiResult<()> {
        let request = self
            .upstream
            .request(Method::DELETE, &format!("/recipes/{}", segment(id)));
        self.upstream.execute("DeleteRecipe", request, discard).await
    }
}
