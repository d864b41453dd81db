use std::sync::Arc;

use super::relabel;
use crate::{
    core::{
        dtos::{LoginInput, ProfileInput, RegisterInput},
        entities::{SuccessfulLogin, User},
        error::{ApiError, ApiResult, ErrorKind},
    },
    ports::AuthUpstream,
};

/// Session verification, registration, login and profile management.
///
/// Tokens are forwarded untouched; the gateway never interprets them.
#[derive(Clone)]
pub struct AuthService {
    upstream: Arc<dyn AuthUpstream>,
}

impl AuthService {
    pub fn new(upstream: Arc<dyn AuthUpstream>) -> Self {
        Self { upstream }
    }

    /// Any answer other than OK from the auth service becomes a 401.
    pub async fn verify(&self, token: &str) -> ApiResult<()> {
        if token.is_empty() {
            return Err(ApiError::unauthorized("invalid x-auth-token"));
        }
        self.upstream.verify(token).await.map_err(|err| {
            if err.kind() == ErrorKind::UpstreamRejected {
                tracing::warn!(status = err.status(), "Auth token rejected");
                ApiError::unauthorized("unauthorized")
            } else {
                relabel(err, "unauthorized")
            }
        })
    }

    pub async fn register(&self, user: &RegisterInput) -> ApiResult<User> {
        self.upstream
            .register(user)
            .await
            .map_err(|err| relabel(err, "register error"))
    }

    pub async fn login(&self, credentials: &LoginInput) -> ApiResult<SuccessfulLogin> {
        self.upstream
            .login(credentials)
            .await
            .map_err(|err| relabel(err, "login error"))
    }

    pub async fn user(&self, id: &str, token: &str) -> ApiResult<User> {
        let mut user = self
            .upstream
            .user(id, token)
            .await
            .map_err(|err| relabel(err, "getting user error"))?;
        user.user_id = id.to_string();
        Ok(user)
    }

    pub async fn edit_profile(&self, profile: &ProfileInput, token: &str) -> ApiResult<()> {
        if profile.is_empty() {
            return Err(ApiError::bad_request(super::EMPTY_UPDATE_MESSAGE));
        }
        self.upstream
            .edit_user(profile, token)
            .await
            .map_err(|err| relabel(err, "editing user error"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use http::StatusCode;

    use super::*;

    #[derive(Default)]
    struct FakeAuth {
        edits: AtomicUsize,
        unreachable: bool,
    }

    #[async_trait]
    impl AuthUpstream for FakeAuth {
        async fn verify(&self, token: &str) -> ApiResult<()> {
            if self.unreachable {
                return Err(ApiError::transport("connection refused"));
            }
            if token == "good" {
                Ok(())
            } else {
                Err(ApiError::rejected(StatusCode::FORBIDDEN, "expired"))
            }
        }

        async fn register(&self, _user: &RegisterInput) -> ApiResult<User> {
            Err(ApiError::rejected(StatusCode::CONFLICT, "email taken"))
        }

        async fn login(&self, _credentials: &LoginInput) -> ApiResult<SuccessfulLogin> {
            Ok(SuccessfulLogin::default())
        }

        async fn user(&self, _id: &str, _token: &str) -> ApiResult<User> {
            Ok(User {
                name: "Ana".to_string(),
                ..Default::default()
            })
        }

        async fn edit_user(&self, _profile: &ProfileInput, _token: &str) -> ApiResult<()> {
            self.edits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_verify_rejection_is_unauthorized() {
        let service = AuthService::new(Arc::new(FakeAuth::default()));

        assert!(service.verify("good").await.is_ok());
        let err = service.verify("stale").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.status(), 401);

        let err = service.verify("").await.unwrap_err();
        assert_eq!(err.status(), 401);
    }

    #[tokio::test]
    async fn test_verify_transport_failure_stays_500() {
        let service = AuthService::new(Arc::new(FakeAuth {
            unreachable: true,
            ..Default::default()
        }));

        let err = service.verify("good").await.unwrap_err();
        assert_eq!(err.message(), "unauthorized");
        assert_eq!(err.status(), 500);
    }

    #[tokio::test]
    async fn test_user_id_set_from_request() {
        let service = AuthService::new(Arc::new(FakeAuth::default()));
        let user = service.user("u42", "good").await.unwrap();

        assert_eq!(user.user_id, "u42");
        assert_eq!(user.name, "Ana");
    }

    #[tokio::test]
    async fn test_register_error_keeps_status() {
        let service = AuthService::new(Arc::new(FakeAuth::default()));
        let err = service
            .register(&RegisterInput::default())
            .await
            .unwrap_err();

        assert_eq!(err.message(), "register error");
        assert_eq!(err.status(), 409);
    }

    #[tokio::test]
    async fn test_empty_profile_is_bad_request() {
        let fake = Arc::new(FakeAuth::default());
        let service = AuthService::new(fake.clone());

        let err = service
            .edit_profile(&ProfileInput::default(), "good")
            .await
            .unwrap_err();

        assert_eq!(err.status(), 400);
        assert_eq!(fake.edits.load(Ordering::SeqCst), 0);
    }
}
