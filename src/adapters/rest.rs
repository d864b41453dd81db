//! REST surface. Each handler maps one route onto one domain service call and
//! renders the result in the `{ data, error }` envelope, using the error's
//! status as the HTTP status.
use async_graphql::OutputType;
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use super::{
    app::AppState,
    envelope::{
        Envelope, LIQUOR_DELETED, POST_DELETED, PROFILE_UPDATED, RECIPE_DELETED, TOKEN_VERIFIED,
    },
    middleware::HEALTH_PATH,
    upstream::auth::AUTH_TOKEN_HEADER,
};
use crate::core::{
    dtos::{
        LiquorInput, LiquorPatch, LoginInput, PostInput, PostPatch, ProfileInput, RecipeInput,
        RecipePatch, RegisterInput,
    },
    error::{ApiError, ApiResult},
};

const IMAGE_FIELD: &str = "imageFile";
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(HEALTH_PATH, get(ping))
        .route("/liquors", get(list_liquors).post(create_liquor))
        .route(
            "/liquors/{id}",
            get(get_liquor).put(update_liquor).delete(delete_liquor),
        )
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/processStrings", post(process_strings))
        .route("/createAIRecipe", post(create_ai_recipe))
        .route(
            "/extractText",
            post(extract_text).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/product/{code}", get(product_by_code))
        .route("/verify", get(verify))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", put(edit_profile))
        .route("/profile/{id}", get(get_profile))
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

fn reply<T: OutputType + Serialize>(success: StatusCode, result: ApiResult<T>) -> Response {
    match result {
        Ok(data) => (success, Json(Envelope::ok(data))).into_response(),
        Err(err) => (err.status_code(), Json(Envelope::<T>::failure(&err))).into_response(),
    }
}

fn message(result: ApiResult<()>, text: &str) -> ApiResult<String> {
    result.map(|()| text.to_string())
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request(format!("invalid data: {}", rejection.body_text()))
    })
}

fn auth_token(headers: &HeaderMap) -> String {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn ping() -> Response {
    reply(StatusCode::OK, Ok("pong".to_string()))
}

async fn list_liquors(State(state): State<AppState>) -> Response {
    reply(StatusCode::OK, state.services.catalog.liquors().await)
}

async fn get_liquor(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(StatusCode::OK, state.services.catalog.liquor(&id).await)
}

async fn create_liquor(
    State(state): State<AppState>,
    body: Result<Json<LiquorInput>, JsonRejection>,
) -> Response {
    let result = async {
        let liquor = payload(body)?;
        state.services.catalog.create_liquor(&liquor).await
    };
    reply(StatusCode::CREATED, result.await)
}

async fn update_liquor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<LiquorPatch>, JsonRejection>,
) -> Response {
    let result = async {
        let patch = payload(body)?;
        state.services.catalog.update_liquor(&id, &patch).await
    };
    reply(StatusCode::OK, result.await)
}

async fn delete_liquor(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.services.catalog.delete_liquor(&id).await;
    reply(StatusCode::OK, message(result, LIQUOR_DELETED))
}

async fn list_recipes(State(state): State<AppState>) -> Response {
    reply(StatusCode::OK, state.services.catalog.recipes().await)
}

async fn get_recipe(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(StatusCode::OK, state.services.catalog.recipe(&id).await)
}

async fn create_recipe(
    State(state): State<AppState>,
    body: Result<Json<RecipeInput>, JsonRejection>,
) -> Response {
    let result = async {
        let recipe = payload(body)?;
        state.services.catalog.create_recipe(&recipe).await
    };
    reply(StatusCode::CREATED, result.await)
}

async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RecipePatch>, JsonRejection>,
) -> Response {
    let result = async {
        let patch = payload(body)?;
        state.services.catalog.update_recipe(&id, &patch).await
    };
    reply(StatusCode::OK, result.await)
}

async fn delete_recipe(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.services.catalog.delete_recipe(&id).await;
    reply(StatusCode::OK, message(result, RECIPE_DELETED))
}

async fn process_strings(
    State(state): State<AppState>,
    body: Result<Json<Vec<String>>, JsonRejection>,
) -> Response {
    let result = async {
        let input = payload(body)?;
        state.services.ai.process_strings(&input).await
    };
    reply(StatusCode::OK, result.await)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LiquorQuery {
    liquor: String,
}

async fn create_ai_recipe(
    State(state): State<AppState>,
    Query(query): Query<LiquorQuery>,
) -> Response {
    reply(
        StatusCode::OK,
        state.services.ai.create_recipe(&query.liquor).await,
    )
}

async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = async {
        let image = read_image(multipart).await?;
        state.services.ai.extract_text_from_image(image).await
    };
    reply(StatusCode::OK, result.await)
}

async fn read_image(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<bytes::Bytes> {
    let invalid = || ApiError::bad_request("invalid image file");
    let mut multipart = multipart.map_err(|_| invalid())?;

    while let Some(field) = multipart.next_field().await.map_err(|_| invalid())? {
        if field.name() == Some(IMAGE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("error reading image file"));
        }
    }
    Err(invalid())
}

async fn product_by_code(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    reply(
        StatusCode::OK,
        state.services.scrapping.product_by_code(&code).await,
    )
}

async fn verify(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let result = state.services.auth.verify(&auth_token(&headers)).await;
    reply(StatusCode::OK, message(result, TOKEN_VERIFIED))
}

async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Response {
    let result = async {
        let user = payload(body)?;
        state.services.auth.register(&user).await
    };
    reply(StatusCode::CREATED, result.await)
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Response {
    let result = async {
        let credentials = payload(body)?;
        state.services.auth.login(&credentials).await
    };
    reply(StatusCode::OK, result.await)
}

async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    reply(
        StatusCode::OK,
        state.services.auth.user(&id, &auth_token(&headers)).await,
    )
}

async fn edit_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProfileInput>, JsonRejection>,
) -> Response {
    let result = async {
        let profile = payload(body)?;
        let edited = state
            .services
            .auth
            .edit_profile(&profile, &auth_token(&headers))
            .await;
        message(edited, PROFILE_UPDATED)
    };
    reply(StatusCode::OK, result.await)
}

async fn list_posts(State(state): State<AppState>) -> Response {
    reply(StatusCode::OK, state.services.posts.posts().await)
}

async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(StatusCode::OK, state.services.posts.post(&id).await)
}

async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<PostInput>, JsonRejection>,
) -> Response {
    let result = async {
        let post = payload(body)?;
        state.services.posts.create_post(&post).await
    };
    reply(StatusCode::CREATED, result.await)
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PostPatch>, JsonRejection>,
) -> Response {
    let result = async {
        let patch = payload(body)?;
        state.services.posts.update_post(&id, &patch).await
    };
    reply(StatusCode::OK, result.await)
}

async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.services.posts.delete_post(&id).await;
    reply(StatusCode::OK, message(result, POST_DELETED))
}
