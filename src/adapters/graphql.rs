//! GraphQL surface. Every field resolves to the `{ data, error }` envelope, so
//! domain failures never surface as GraphQL errors and the HTTP status stays 200.
use async_graphql::{EmptySubscription, Object, Schema};
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;

use super::{
    app::GatewayServices,
    envelope::{
        Envelope, LIQUOR_DELETED, POST_DELETED, PROFILE_UPDATED, RECIPE_DELETED, TOKEN_VERIFIED,
    },
};
use crate::core::{
    dtos::{
        LiquorInput, LiquorPatch, LoginInput, PostInput, PostPatch, ProfileInput, RecipeInput,
        RecipePatch, RegisterInput,
    },
    entities::{AiRecipe, Liquor, Post, Product, Recipe, SuccessfulLogin, User},
    error::{ApiError, ApiResult},
};

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: GatewayServices) -> GatewaySchema {
    Schema::build(
        QueryRoot(services.clone()),
        MutationRoot(services),
        EmptySubscription,
    )
    .finish()
}

fn confirmed(result: ApiResult<()>, message: &str) -> Envelope<String> {
    result.map(|()| message.to_string()).into()
}

/// Accept raw base64 or a `data:<mime>;base64,<payload>` URL.
fn decode_image(encoded: &str) -> ApiResult<Bytes> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => encoded,
    };
    STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|_| ApiError::bad_request("invalid image file"))
}

pub struct QueryRoot(GatewayServices);

#[Object]
impl QueryRoot {
    async fn liquors(&self) -> Envelope<Vec<Liquor>> {
        self.0.catalog.liquors().await.into()
    }

    async fn liquor(&self, #[graphql(name = "_id")] id: String) -> Envelope<Liquor> {
        self.0.catalog.liquor(&id).await.into()
    }

    async fn recipes(&self) -> Envelope<Vec<Recipe>> {
        self.0.catalog.recipes().await.into()
    }

    async fn recipe(&self, #[graphql(name = "_id")] id: String) -> Envelope<Recipe> {
        self.0.catalog.recipe(&id).await.into()
    }

    async fn posts(&self) -> Envelope<Vec<Post>> {
        self.0.posts.posts().await.into()
    }

    async fn post(&self, #[graphql(name = "_id")] id: String) -> Envelope<Post> {
        self.0.posts.post(&id).await.into()
    }

    async fn verify(&self, token: String) -> Envelope<String> {
        confirmed(self.0.auth.verify(&token).await, TOKEN_VERIFIED)
    }

    async fn get_user(&self, id: String, token: String) -> Envelope<User> {
        self.0.auth.user(&id, &token).await.into()
    }

    async fn get_product_by_code(&self, code: String) -> Envelope<Product> {
        self.0.scrapping.product_by_code(&code).await.into()
    }

    async fn process_strings(&self, input: Vec<String>) -> Envelope<String> {
        self.0.ai.process_strings(&input).await.into()
    }

    #[graphql(name = "createAIRecipe")]
    async fn create_ai_recipe(&self, liquor: String) -> Envelope<AiRecipe> {
        self.0.ai.create_recipe(&liquor).await.into()
    }
}

pub struct MutationRoot(GatewayServices);

#[Object]
impl MutationRoot {
    async fn create_liquor(&self, liquor: LiquorInput) -> Envelope<Liquor> {
        self.0.catalog.create_liquor(&liquor).await.into()
    }

    async fn update_liquor(
        &self,
        #[graphql(name = "_id")] id: String,
        liquor: LiquorPatch,
    ) -> Envelope<Liquor> {
        self.0.catalog.update_liquor(&id, &liquor).await.into()
    }

    async fn delete_liquor(&self, #[graphql(name = "_id")] id: String) -> Envelope<String> {
        confirmed(self.0.catalog.delete_liquor(&id).await, LIQUOR_DELETED)
    }

    async fn create_recipe(&self, recipe: RecipeInput) -> Envelope<Recipe> {
        self.0.catalog.create_recipe(&recipe).await.into()
    }

    async fn update_recipe(
        &self,
        #[graphql(name = "_id")] id: String,
        recipe: RecipePatch,
    ) -> Envelope<Recipe> {
        self.0.catalog.update_recipe(&id, &recipe).await.into()
    }

    async fn delete_recipe(&self, #[graphql(name = "_id")] id: String) -> Envelope<String> {
        confirmed(self.0.catalog.delete_recipe(&id).await, RECIPE_DELETED)
    }

    async fn create_post(&self, post: PostInput) -> Envelope<Post> {
        self.0.posts.create_post(&post).await.into()
    }

    async fn update_post(
        &self,
        #[graphql(name = "_id")] id: String,
        post: PostPatch,
    ) -> Envelope<Post> {
        self.0.posts.update_post(&id, &post).await.into()
    }

    async fn delete_post(&self, #[graphql(name = "_id")] id: String) -> Envelope<String> {
        confirmed(self.0.posts.delete_post(&id).await, POST_DELETED)
    }

    async fn register(&self, user: RegisterInput) -> Envelope<User> {
        self.0.auth.register(&user).await.into()
    }

    async fn login(&self, credentials: LoginInput) -> Envelope<SuccessfulLogin> {
        self.0.auth.login(&credentials).await.into()
    }

    async fn edit_profile(&self, user: ProfileInput, token: String) -> Envelope<String> {
        confirmed(
            self.0.auth.edit_profile(&user, &token).await,
            PROFILE_UPDATED,
        )
    }

    async fn extract_text_from_image(&self, image_base64: String) -> Envelope<Vec<String>> {
        let result = match decode_image(&image_base64) {
            Ok(image) => self.0.ai.extract_text_from_image(image).await,
            Err(err) => Err(err),
        };
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path, query_param},
    };

    use super::*;
    use crate::{adapters::app::test_support::services_for, metrics::MetricsRecorder};

    async fn run(schema: &GatewaySchema, query: &str) -> serde_json::Value {
        let response = schema.execute(query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[test]
    fn test_decode_image_accepts_data_url() {
        assert_eq!(decode_image("aGk=").unwrap(), Bytes::from_static(b"hi"));
        assert_eq!(
            decode_image("data:image/png;base64,aGk=").unwrap(),
            Bytes::from_static(b"hi")
        );
        assert_eq!(decode_image("***").unwrap_err().status(), 400);
    }

    #[tokio::test]
    async fn test_liquor_query_reports_not_found_in_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/liquors/missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let schema = build_schema(services_for(&server.uri(), &MetricsRecorder::new()));
        let data = run(
            &schema,
            r#"{ liquor(_id: "missing") { data { _id name } error { message status } } }"#,
        )
        .await;

        assert_eq!(
            data,
            json!({ "liquor": { "data": null, "error": { "message": "liquor not found", "status": 404 } } })
        );
    }

    #[tokio::test]
    async fn test_create_ai_recipe_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/CreateRecipe"))
            .and(query_param("liquor", "gin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cocktailName": "Gin Tonic",
                "ingredients": [],
                "steps": ["Mix"],
                "observations": "Serve cold"
            })))
            .mount(&server)
            .await;

        let schema = build_schema(services_for(&server.uri(), &MetricsRecorder::new()));
        let data = run(
            &schema,
            r#"{ createAIRecipe(liquor: "gin") { data { cocktailName } error { message } } }"#,
        )
        .await;

        assert_eq!(data["createAIRecipe"]["data"]["cocktailName"], "Gin Tonic");
        assert!(data["createAIRecipe"]["error"].is_null());
    }

    #[tokio::test]
    async fn test_update_post_without_changes_skips_write() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1",
                "urlImage": "",
                "title": "Hello",
                "content": "World",
                "author": "ana",
                "interactions": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let metrics = MetricsRecorder::new();
        let schema = build_schema(services_for(&server.uri(), &metrics));
        let data = run(
            &schema,
            r#"mutation { updatePost(_id: "p1", post: { title: "Hello" }) { data { title } error { message } } }"#,
        )
        .await;

        assert_eq!(data["updatePost"]["data"]["title"], "Hello");
        assert_eq!(metrics.sample_count("posts", "UpdatePost"), 0);
        assert_eq!(metrics.sample_count("posts", "FetchPostByID"), 1);
    }

    #[tokio::test]
    async fn test_delete_recipe_upstream_failure_in_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/recipes/r1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let schema = build_schema(services_for(&server.uri(), &MetricsRecorder::new()));
        let data = run(
            &schema,
            r#"mutation { deleteRecipe(_id: "r1") { data error { message status } } }"#,
        )
        .await;

        assert_eq!(
            data["deleteRecipe"]["error"],
            json!({ "message": "error deleting recipe", "status": 503 })
        );
    }

    #[tokio::test]
    async fn test_register_mutation_sends_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(json!({
                "name": "Ana",
                "lastname": "Diaz",
                "email": "ana@example.com",
                "password": "secret",
                "username": "ana",
                "type": "email"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": "u1", "name": "Ana", "email": "ana@example.com" }
            })))
            .mount(&server)
            .await;

        let schema = build_schema(services_for(&server.uri(), &MetricsRecorder::new()));
        let data = run(
            &schema,
            r#"mutation { register(user: { name: "Ana", lastname: "Diaz", email: "ana@example.com", password: "secret", username: "ana", type: "email" }) { data { name } error { message } } }"#,
        )
        .await;

        assert_eq!(data["register"]["data"]["name"], "Ana");
    }
}
