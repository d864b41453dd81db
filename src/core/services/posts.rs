use std::sync::Arc;

use super::relabel;
use crate::{
    core::{
        dtos::{PostInput, PostPatch},
        entities::Post,
        error::ApiResult,
    },
    ports::PostsUpstream,
};

#[derive(Clone)]
pub struct PostsService {
    upstream: Arc<dyn PostsUpstream>,
}

impl PostsService {
    pub fn new(upstream: Arc<dyn PostsUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn posts(&self) -> ApiResult<Vec<Post>> {
        self.upstream
            .fetch_posts()
            .await
            .map_err(|err| relabel(err, "error fetching posts"))
    }

    pub async fn post(&self, id: &str) -> ApiResult<Post> {
        self.upstream
            .fetch_post_by_id(id)
            .await
            .map_err(|err| relabel(err, "post not found"))
    }

    pub async fn create_post(&self, post: &PostInput) -> ApiResult<Post> {
        self.upstream
            .create_post(post)
            .await
            .map_err(|err| relabel(err, "error creating post"))
    }

    /// Send only the fields that differ from the stored post; return the stored
    /// post untouched when none do.
    pub async fn update_post(&self, id: &str, patch: &PostPatch) -> ApiResult<Post> {
        let current = self.post(id).await?;
        let changes = patch.changes_from(&current);
        if changes.is_empty() {
            tracing::debug!(post_id = id, "Post update is a no-op");
            return Ok(current);
        }

        self.upstream
            .update_post(id, &changes)
            .await
            .map_err(|err| relabel(err, "error updating post"))
    }

    pub async fn delete_post(&self, id: &str) -> ApiResult<()> {
        self.upstream
            .delete_post(id)
            .await
            .map_err(|err| relabel(err, "error deleting post"))
    }
}
