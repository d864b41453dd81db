use std::sync::Arc;

use super::relabel;
use crate::{
    core::{
        entities::Product,
        error::{ApiError, ApiResult},
    },
    ports::ScrappingUpstream,
};

#[derive(Clone)]
pub struct ScrappingService {
    upstream: Arc<dyn ScrappingUpstream>,
}

impl ScrappingService {
    pub fn new(upstream: Arc<dyn ScrappingUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn product_by_code(&self, code: &str) -> ApiResult<Product> {
        if code.trim().is_empty() {
            return Err(ApiError::bad_request("code required"));
        }
        self.upstream
            .product_by_code(code)
            .await
            .map_err(|err| relabel(err, "product not found"))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use http::StatusCode;

    use super::*;

    struct Unavailable;

    #[async_trait]
    impl ScrappingUpstream for Unavailable {
        async fn product_by_code(&self, _code: &str) -> ApiResult<Product> {
            Err(ApiError::rejected(StatusCode::BAD_GATEWAY, "scrapper down"))
        }
    }

    #[tokio::test]
    async fn test_product_error_keeps_status() {
        let service = ScrappingService::new(Arc::new(Unavailable));
        let err = service.product_by_code("7701").await.unwrap_err();

        assert_eq!(err.message(), "product not found");
        assert_eq!(err.status(), 502);
    }

    #[tokio::test]
    async fn test_blank_code_is_bad_request() {
        let service = ScrappingService::new(Arc::new(Unavailable));
        let err = service.product_by_code("").await.unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
