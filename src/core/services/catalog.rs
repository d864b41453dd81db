use std::sync::Arc;

use super::{EMPTY_UPDATE_MESSAGE, relabel};
use crate::{
    core::{
        dtos::{LiquorInput, LiquorPatch, RecipeInput, RecipePatch},
        entities::{Liquor, Recipe},
        error::{ApiError, ApiResult},
    },
    ports::CatalogUpstream,
};

/// Liquor and recipe operations.
#[derive(Clone)]
pub struct CatalogService {
    upstream: Arc<dyn CatalogUpstream>,
}

impl CatalogService {
    pub fn new(upstream: Arc<dyn CatalogUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn liquors(&self) -> ApiResult<Vec<Liquor>> {
        self.upstream
            .fetch_liquors()
            .await
            .map_err(|err| relabel(err, "error getting liquors"))
    }

    pub async fn liquor(&self, id: &str) -> ApiResult<Liquor> {
        self.upstream
            .fetch_liquor_by_id(id)
            .await
            .map_err(|err| relabel(err, "liquor not found"))
    }

    pub async fn create_liquor(&self, liquor: &LiquorInput) -> ApiResult<Liquor> {
        self.upstream
            .create_liquor(liquor)
            .await
            .map_err(|err| relabel(err, "error saving liquor"))
    }

    /// Apply the supplied fields that differ from the stored liquor.
    ///
    /// When nothing differs, including an empty patch, the stored liquor is
    /// returned and no write is sent.
    pub async fn update_liquor(&self, id: &str, patch: &LiquorPatch) -> ApiResult<Liquor> {
        let current = self.liquor(id).await?;
        let changes = patch.changes_from(&current);
        if changes.is_empty() {
            tracing::debug!(liquor_id = id, "Liquor update is a no-op");
            return Ok(current);
        }

        self.upstream
            .update_liquor(id, &changes)
            .await
            .map_err(|err| relabel(err, "error saving liquor"))
    }

    pub async fn delete_liquor(&self, id: &str) -> ApiResult<()> {
        self.upstream
            .delete_liquor(id)
            .await
            .map_err(|err| relabel(err, "error deleting liquor"))
    }

    pub async fn recipes(&self) -> ApiResult<Vec<Recipe>> {
        self.upstream
            .fetch_recipes()
            .await
            .map_err(|err| relabel(err, "error getting recipes"))
    }

    pub async fn recipe(&self, id: &str) -> ApiResult<Recipe> {
        self.upstream
            .fetch_recipe_by_id(id)
            .await
            .map_err(|err| relabel(err, "recipe not found"))
    }

    pub async fn create_recipe(&self, recipe: &RecipeInput) -> ApiResult<Recipe> {
        self.upstream
            .create_recipe(recipe)
            .await
            .map_err(|err| relabel(err, "error saving recipe"))
    }

    /// Same rule as [`Self::update_liquor`], except that `ingredients` and
    /// `liquors` are forwarded whenever they are supplied.
    pub async fn update_recipe(&self, id: &str, patch: &RecipePatch) -> ApiResult<Recipe> {
        if patch.is_empty() {
            return Err(ApiError::bad_request(EMPTY_UPDATE_MESSAGE));
        }

        let current = self.recipe(id).await?;
        let changes = patch.changes_from(&current);
        if changes.is_empty() {
            tracing::debug!(recipe_id = id, "Recipe update is a no-op");
            return Ok(current);
        }

        self.upstream
            .update_recipe(id, &changes)
            .await
            .map_err(|err| relabel(err, "error updating recipe"))
    }

    pub async fn delete_recipe(&self, id: &str) -> ApiResult<()> {
        self.upstream
            .delete_recipe(id)
            .await
            .map_err(|err| relabel(err, "error deleting recipe"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use http::StatusCode;

    use super::*;
    use crate::core::{dtos::IngredientInput, error::ErrorKind};

    #[derive(Default)]
    struct FakeCatalog {
        liquor: Option<Liquor>,
        recipe: Option<Recipe>,
        sent_liquor_patches: Mutex<Vec<LiquorPatch>>,
        sent_recipe_patches: Mutex<Vec<RecipePatch>>,
        writes: AtomicUsize,
        reject_with: Option<StatusCode>,
    }

    impl FakeCatalog {
        fn check(&self) -> ApiResult<()> {
            match self.reject_with {
                Some(status) => Err(ApiError::rejected(status, "upstream says no")),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CatalogUpstream for FakeCatalog {
        async fn fetch_liquors(&self) -> ApiResult<Vec<Liquor>> {
            self.check()?;
            Ok(self.liquor.clone().into_iter().collect())
        }

        async fn fetch_liquor_by_id(&self, _id: &str) -> ApiResult<Liquor> {
            self.check()?;
            self.liquor
                .clone()
                .ok_or_else(|| ApiError::not_found("liquor not found"))
        }

        async fn create_liquor(&self, liquor: &LiquorInput) -> ApiResult<Liquor> {
            self.check()?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(Liquor {
                id: "new".to_string(),
                name: liquor.name.clone(),
                ..Default::default()
            })
        }

        async fn update_liquor(&self, id: &str, changes: &LiquorPatch) -> ApiResult<Liquor> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.sent_liquor_patches.lock().unwrap().push(changes.clone());
            let mut liquor = self.liquor.clone().unwrap_or_default();
            liquor.id = id.to_string();
            if let Some(name) = &changes.name {
                liquor.name = name.clone();
            }
            Ok(liquor)
        }

        async fn delete_liquor(&self, _id: &str) -> ApiResult<()> {
            self.check()
        }

        async fn fetch_recipes(&self) -> ApiResult<Vec<Recipe>> {
            self.check()?;
            Ok(self.recipe.clone().into_iter().collect())
        }

        async fn fetch_recipe_by_id(&self, _id: &str) -> ApiResult<Recipe> {
            self.check()?;
            self.recipe
                .clone()
                .ok_or_else(|| ApiError::not_found("recipe not found"))
        }

        async fn create_recipe(&self, _recipe: &RecipeInput) -> ApiResult<Recipe> {
            self.check()?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(Recipe::default())
        }

        async fn update_recipe(&self, _id: &str, changes: &RecipePatch) -> ApiResult<Recipe> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.sent_recipe_patches.lock().unwrap().push(changes.clone());
            Ok(self.recipe.clone().unwrap_or_default())
        }

        async fn delete_recipe(&self, _id: &str) -> ApiResult<()> {
            self.check()
        }
    }

    fn stored_recipe() -> Recipe {
        Recipe {
            id: "r1".to_string(),
            name: "Mojito".to_string(),
            category: "classic".to_string(),
            liquors: vec!["rum".to_string()],
            ..Default::default()
        }
    }

    fn stored_liquor() -> Liquor {
        Liquor {
            id: "l1".to_string(),
            name: "Ron Medellín".to_string(),
            ean: 7702049,
            category: "rum".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_recipe_with_current_values_skips_write() {
        let fake = Arc::new(FakeCatalog {
            recipe: Some(stored_recipe()),
            ..Default::default()
        });
        let service = CatalogService::new(fake.clone());

        let patch = RecipePatch {
            category: Some("classic".to_string()),
            ..Default::default()
        };
        let recipe = service.update_recipe("r1", &patch).await.unwrap();

        assert_eq!(recipe, stored_recipe());
        assert_eq!(fake.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_recipe_forwards_compound_fields() {
        let fake = Arc::new(FakeCatalog {
            recipe: Some(stored_recipe()),
            ..Default::default()
        });
        let service = CatalogService::new(fake.clone());

        let patch = RecipePatch {
            category: Some("classic".to_string()),
            ingredients: Some(vec![IngredientInput {
                name: "mint".to_string(),
                quantity: "6 leaves".to_string(),
            }]),
            ..Default::default()
        };
        service.update_recipe("r1", &patch).await.unwrap();

        let sent = fake.sent_recipe_patches.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].category, None);
        assert_eq!(sent[0].ingredients.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_update_liquor_sends_only_changed_fields() {
        let fake = Arc::new(FakeCatalog {
            liquor: Some(stored_liquor()),
            ..Default::default()
        });
        let service = CatalogService::new(fake.clone());

        let patch = LiquorPatch {
            name: Some("Ron Viejo de Caldas".to_string()),
            ean: Some(7702049),
            ..Default::default()
        };
        let updated = service.update_liquor("l1", &patch).await.unwrap();

        assert_eq!(updated.name, "Ron Viejo de Caldas");
        let sent = fake.sent_liquor_patches.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[LiquorPatch {
                name: Some("Ron Viejo de Caldas".to_string()),
                ..Default::default()
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_liquor_patch_returns_stored_liquor() {
        let fake = Arc::new(FakeCatalog {
            liquor: Some(stored_liquor()),
            ..Default::default()
        });
        let service = CatalogService::new(fake.clone());

        let liquor = service
            .update_liquor("l1", &LiquorPatch::default())
            .await
            .unwrap();

        assert_eq!(liquor, stored_liquor());
        assert_eq!(fake.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_recipe_patch_is_bad_request() {
        let fake = Arc::new(FakeCatalog {
            recipe: Some(stored_recipe()),
            ..Default::default()
        });
        let service = CatalogService::new(fake.clone());

        let err = service
            .update_recipe("r1", &RecipePatch::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), EMPTY_UPDATE_MESSAGE);
        assert_eq!(fake.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_of_missing_liquor_is_not_found() {
        let service = CatalogService::new(Arc::new(FakeCatalog::default()));
        let patch = LiquorPatch {
            name: Some("x".to_string()),
            ..Default::default()
        };

        let err = service.update_liquor("nope", &patch).await.unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_relabel_preserves_upstream_status() {
        let service = CatalogService::new(Arc::new(FakeCatalog {
            reject_with: Some(StatusCode::SERVICE_UNAVAILABLE),
            ..Default::default()
        }));

        let err = service.recipes().await.unwrap_err();
        assert_eq!(err.message(), "error getting recipes");
        assert_eq!(err.status(), 503);

        let err = service.delete_liquor("l1").await.unwrap_err();
        assert_eq!(err.message(), "error deleting liquor");
        assert_eq!(err.status(), 503);
    }
}
