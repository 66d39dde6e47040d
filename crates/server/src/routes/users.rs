use axum::{extract::State, http::StatusCode, routing::{get, post}, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use common::types::MessageResponse;
use models::{address, user};
use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::user_service::{self, ProfileUpdate, UserProfile};

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

pub fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

pub fn protected_routes() -> Router<ServerState> {
    Router::new()
        .route("/users/profile", get(profile).put(update_profile))
        .route("/users/password", post(change_password))
        .route("/users/address", post(add_address))
        .route("/users/addresses", get(list_addresses))
}

#[utoipa::path(post, path = "/users/register", tag = "users", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation failed or already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let created = state.auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(post, path = "/users/login", tag = "users", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::LoginResponse), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let session = state.auth_service.login(input).await?;
    Ok(Json(LoginOutput {
        access_token: session.access_token,
        token_type: session.token_type,
        expires_in: session.expires_in,
    }))
}

#[utoipa::path(get, path = "/users/profile", tag = "users", responses((status = 200, description = "Current user with addresses"), (status = 401, description = "Unauthorized")))]
pub async fn profile(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, JsonApiError> {
    Ok(Json(user_service::profile(&state.db, me.id).await?))
}

#[utoipa::path(put, path = "/users/profile", tag = "users", request_body = crate::openapi::UpdateProfileRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<UpdateProfileInput>,
) -> Result<Json<user::Model>, JsonApiError> {
    let update = ProfileUpdate { username: input.username, avatar: input.avatar, phone: input.phone };
    Ok(Json(user_service::update_profile(&state.db, me.id, update).await?))
}

#[utoipa::path(post, path = "/users/password", tag = "users", request_body = crate::openapi::ChangePasswordRequest, responses((status = 200, description = "Password changed"), (status = 400, description = "New password too short"), (status = 401, description = "Wrong current password")))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<ChangePasswordInput>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    state
        .auth_service
        .change_password(me.id, &input.old_password, &input.new_password)
        .await?;
    info!(user_id = me.id, "password_change_request_ok");
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[utoipa::path(post, path = "/users/address", tag = "users", request_body = crate::openapi::AddressRequest, responses((status = 201, description = "Address added"), (status = 400, description = "Validation failed")))]
pub async fn add_address(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<address::NewAddress>,
) -> Result<(StatusCode, Json<address::Model>), JsonApiError> {
    let created = user_service::add_address(&state.db, me.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/users/addresses", tag = "users", responses((status = 200, description = "Saved addresses")))]
pub async fn list_addresses(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
) -> Result<Json<Vec<address::Model>>, JsonApiError> {
    Ok(Json(user_service::list_addresses(&state.db, me.id).await?))
}
