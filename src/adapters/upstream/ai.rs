use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Client, Method,
    multipart::{Form, Part},
};

use super::{UpstreamClient, json, text};
use crate::{
    core::{entities::AiRecipe, error::ApiResult},
    metrics::MetricsRecorder,
    ports::AiUpstream,
};

pub const REPOSITORY: &str = "ai";

const IMAGE_FIELD: &str = "imageFile";
const IMAGE_FILE_NAME: &str = "image.jpg";

/// Client for the AI service and the image-recognition service.
///
/// Both report under the `ai` repository label. Image uploads are posted to
/// the image-recognition base URL itself, without a path.
#[derive(Clone)]
pub struct AiClient {
    ai: UpstreamClient,
    image_recognition: UpstreamClient,
}

impl AiClient {
    pub fn new(
        http: Client,
        ai_base_url: impl Into<String>,
        image_recognition_url: impl Into<String>,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            ai: UpstreamClient::new(http.clone(), ai_base_url, REPOSITORY, metrics.clone()),
            image_recognition: UpstreamClient::new(
                http,
                image_recognition_url,
                REPOSITORY,
                metrics,
            ),
        }
    }
}

#[async_trait]
impl AiUpstream for AiClient {
    async fn process_strings(&self, input: &[String]) -> ApiResult<String> {
        let request = self.ai.request(Method::POST, "/DeduceLiquorName").json(input);
        self.ai.execute("ProcessStrings", request, text).await
    }

    async fn create_recipe(&self, liquor: &str) -> ApiResult<AiRecipe> {
        let path = format!("/CreateRecipe?liquor={}", urlencoding::encode(liquor));
        let request = self.ai.request(Method::POST, &path);
        self.ai.execute("CreateRecipe", request, json).await
    }

    async fn extract_text_from_image(&self, image: Bytes) -> ApiResult<Vec<String>> {
        let part = Part::stream(image).file_name(IMAGE_FILE_NAME);
        let form = Form::new().part(IMAGE_FIELD, part);
        let request = self
            .image_recognition
            .request(Method::POST, "")
            .multipart(form);
        self.image_recognition
            .execute("ExtractTextFromImage", request, json)
            .await
    }
}
