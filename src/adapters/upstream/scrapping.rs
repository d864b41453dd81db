use async_trait::async_trait;
use reqwest::{Client, Method};

use super::{UpstreamClient, json, segment};
use crate::{
    core::{
        entities::Product,
        error::{ApiError, ApiResult},
    },
    metrics::MetricsRecorder,
    ports::ScrappingUpstream,
};

pub const REPOSITORY: &str = "scrapping";

/// Client for the barcode scrapping service.
#[derive(Clone)]
pub struct ScrappingClient {
    upstream: UpstreamClient,
}

impl ScrappingClient {
    pub fn new(http: Client, base_url: impl Into<String>, metrics: MetricsRecorder) -> Self {
        Self {
            upstream: UpstreamClient::new(http, base_url, REPOSITORY, metrics),
        }
    }
}

#[async_trait]
impl ScrappingUpstream for ScrappingClient {
    async fn product_by_code(&self, code: &str) -> ApiResult<Product> {
        let request = self
            .upstream
            .request(Method::GET, &format!("/{}", segment(code)));
        self.upstream
            .execute("GetProductByCode", request, |body| {
                let product: Product = json(body)?;
                if product.name.is_empty() {
                    return Err(ApiError::not_found("product not found"));
                }
                Ok(product)
            })
            .await
    }
}
