use async_trait::async_trait;
use reqwest::{Client, Method};

use super::{UpstreamClient, discard, json, segment};
use crate::{
    core::{
        dtos::{PostInput, PostPatch},
        entities::Post,
        error::{ApiError, ApiResult},
    },
    metrics::MetricsRecorder,
    ports::PostsUpstream,
};

pub const REPOSITORY: &str = "posts";

/// Client for the posts service.
#[derive(Clone)]
pub struct PostsClient {
    upstream: UpstreamClient,
}

impl PostsClient {
    pub fn new(http: Client, base_url: impl Into<String>, metrics: MetricsRecorder) -> Self {
        Self {
            upstream: UpstreamClient::new(http, base_url, REPOSITORY, metrics),
        }
    }

    fn post_path(id: &str) -> String {
        format!("/posts/{}", segment(id))
    }
}

#[async_trait]
impl PostsUpstream for PostsClient {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        let request = self.upstream.request(Method::GET, "/posts");
        self.upstream.execute("FetchPosts", request, json).await
    }

    async fn fetch_post_by_id(&self, id: &str) -> ApiResult<Post> {
        let request = self.upstream.request(Method::GET, &Self::post_path(id));
        self.upstream
            .execute("FetchPostByID", request, |body| {
                let post: Post = json(body)?;
                if post.id.is_empty() {
                    return Err(ApiError::not_found("post not found"));
                }
                Ok(post)
            })
            .await
    }

    async fn create_post(&self, post: &PostInput) -> ApiResult<Post> {
        let request = self.upstream.request(Method::POST, "/posts").json(post);
        self.upstream.execute("CreatePost", request, json).await
    }

    async fn update_post(&self, id: &str, changes: &PostPatch) -> ApiResult<Post> {
        let request = self
            .upstream
            .request(Method::PUT, &Self::post_path(id))
            .json(changes);
        self.upstream.execute("UpdatePost", request, json).await
    }

    async fn delete_post(&self, id: &str) -> ApiResult<()> {
        let request = self.upstream.request(Method::DELETE, &Self::post_path(id));
        self.upstream.execute("DeletePost", request, discard).await
    }
}
