use std::sync::Arc;

use bytes::Bytes;

use super::relabel;
use crate::{
    core::{
        entities::AiRecipe,
        error::{ApiError, ApiResult},
    },
    ports::AiUpstream,
};

/// Liquor deduction, recipe generation and label text extraction.
#[derive(Clone)]
pub struct AiService {
    upstream: Arc<dyn AiUpstream>,
}

impl AiService {
    pub fn new(upstream: Arc<dyn AiUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn process_strings(&self, input: &[String]) -> ApiResult<String> {
        if input.is_empty() {
            return Err(ApiError::bad_request("invalid input"));
        }
        self.upstream
            .process_strings(input)
            .await
            .map_err(|err| relabel(err, "error getting liquor"))
    }

    pub async fn create_recipe(&self, liquor: &str) -> ApiResult<AiRecipe> {
        if liquor.trim().is_empty() {
            return Err(ApiError::bad_request("liquor required"));
        }
        self.upstream
            .create_recipe(liquor)
            .await
            .map_err(|err| relabel(err, "error generating recipe"))
    }

    pub async fn extract_text_from_image(&self, image: Bytes) -> ApiResult<Vec<String>> {
        if image.is_empty() {
            return Err(ApiError::bad_request("invalid image file"));
        }
        self.upstream
            .extract_text_from_image(image)
            .await
            .map_err(|err| relabel(err, "error extracting text from image"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::core::error::ErrorKind;

    #[derive(Default)]
    struct FakeAi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AiUpstream for FakeAi {
        async fn process_strings(&self, input: &[String]) -> ApiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(input.join(" "))
        }

        async fn create_recipe(&self, _liquor: &str) -> ApiResult<AiRecipe> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::transport("connection refused"))
        }

        async fn extract_text_from_image(&self, _image: Bytes) -> ApiResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["RON".to_string()])
        }
    }

    #[tokio::test]
    async fn test_empty_input_never_reaches_upstream() {
        let fake = Arc::new(FakeAi::default());
        let service = AiService::new(fake.clone());

        let err = service.process_strings(&[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = service.create_recipe("  ").await.unwrap_err();
        assert_eq!(err.message(), "liquor required");

        let err = service
            .extract_text_from_image(Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), 400);

        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_relabeled_as_500() {
        let service = AiService::new(Arc::new(FakeAi::default()));

        let err = service.create_recipe("tequila").await.unwrap_err();
        assert_eq!(err.message(), "error generating recipe");
        assert_eq!(err.status(), 500);
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_process_strings_passthrough() {
        let service = AiService::new(Arc::new(FakeAi::default()));
        let answer = service
            .process_strings(&["Old".to_string(), "Parr".to_string()])
            .await
            .unwrap();
        assert_eq!(answer, "Old Parr");
    }
}
