use async_trait::async_trait;
use reqwest::{Client, Method};

use super::{UpstreamClient, discard, json, segment};
use crate::{
    core::{
        dtos::{LoginInput, ProfileInput, RegisterInput},
        entities::{DataWrapper, SuccessfulLogin, User},
        error::{ApiError, ApiResult},
    },
    metrics::MetricsRecorder,
    ports::AuthUpstream,
};

pub const REPOSITORY: &str = "auth";

/// Header carrying the caller's session token to the auth service.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Client for the authentication service.
#[derive(Clone)]
pub struct AuthClient {
    upstream: UpstreamClient,
}

impl AuthClient {
    pub fn new(http: Client, base_url: impl Into<String>, metrics: MetricsRecorder) -> Self {
        Self {
            upstream: UpstreamClient::new(http, base_url, REPOSITORY, metrics),
        }
    }
}

#[async_trait]
impl AuthUpstream for AuthClient {
    async fn verify(&self, token: &str) -> ApiResult<()> {
        let request = self
            .upstream
            .request(Method::POST, "/v1/verify")
            .header(AUTH_TOKEN_HEADER, token);
        self.upstream.execute("Verify", request, discard).await
    }

    async fn register(&self, user: &RegisterInput) -> ApiResult<User> {
        let request = self.upstream.request(Method::POST, "/register").json(user);
        self.upstream
            .execute("Register", request, |body| {
                json::<DataWrapper<User>>(body).map(|wrapper| wrapper.data)
            })
            .await
    }

    async fn login(&self, credentials: &LoginInput) -> ApiResult<SuccessfulLogin> {
        let request = self
            .upstream
            .request(Method::POST, "/login")
            .json(credentials);
        self.upstream
            .execute("Login", request, |body| {
                json::<DataWrapper<SuccessfulLogin>>(body).map(|wrapper| wrapper.data)
            })
            .await
    }

    async fn user(&self, id: &str, token: &str) -> ApiResult<User> {
        let request = self
            .upstream
            .request(Method::GET, &format!("/v1/profile/{}", segment(id)))
            .header(AUTH_TOKEN_HEADER, token);
        self.upstream
            .execute("GetUser", request, |body| {
                let user = json::<DataWrapper<User>>(body)?.data;
                if user.name.is_empty() {
                    return Err(ApiError::not_found("user not found"));
                }
                Ok(user)
            })
            .await
    }

    async fn edit_user(&self, profile: &ProfileInput, token: &str) -> ApiResult<()> {
        let request = self
            .upstream
            .request(Method::PUT, "/v1/profile")
            .header(AUTH_TOKEN_HEADER, token)
            .json(profile);
        self.upstream.execute("EditUser", request, discard).await
    }
}
