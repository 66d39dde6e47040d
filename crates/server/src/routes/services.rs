use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};
use common::pagination::Pagination;
use common::types::Page;
use models::{order_review, service_category::CategoryNode, service_item, service_provider};
use service::catalog_service::{self, ItemView};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    pub category_id: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ItemQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination::new(self.page.unwrap_or(d.page), self.per_page.unwrap_or(d.per_page))
    }
}

pub fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/services/categories", get(list_categories))
        .route("/services/items", get(list_items))
        .route("/services/items/:id", get(get_item))
        .route("/services/providers/:id/reviews", get(provider_reviews))
}

pub fn protected_routes() -> Router<ServerState> {
    Router::new()
        .route("/services/items", post(add_item))
        .route("/services/providers/register", post(register_provider))
}

#[utoipa::path(get, path = "/services/categories", tag = "services", responses((status = 200, description = "Category tree")))]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<CategoryNode>>, JsonApiError> {
    Ok(Json(catalog_service::list_categories(&state.db).await?))
}

#[utoipa::path(get, path = "/services/items", tag = "services", params(ItemQuery), responses((status = 200, description = "One page of items")))]
pub async fn list_items(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ItemQuery>,
) -> Result<Json<Page<ItemView>>, JsonApiError> {
    Ok(Json(catalog_service::list_items(&state.db, q.category_id, q.pagination()).await?))
}

#[utoipa::path(get, path = "/services/items/{id}", tag = "services", params(("id" = i32, Path, description = "Item id")), responses((status = 200, description = "Item"), (status = 404, description = "Service item not found")))]
pub async fn get_item(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<ItemView>, JsonApiError> {
    Ok(Json(catalog_service::get_item(&state.db, id).await?))
}

#[utoipa::path(post, path = "/services/items", tag = "services", request_body = crate::openapi::ServiceItemRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation failed"), (status = 403, description = "Caller is not a provider")))]
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<service_item::NewServiceItem>,
) -> Result<(StatusCode, Json<service_item::Model>), JsonApiError> {
    let created = catalog_service::add_item(&state.db, me.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(post, path = "/services/providers/register", tag = "services", request_body = crate::openapi::ProviderRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation failed or already registered")))]
pub async fn register_provider(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<service_provider::NewProvider>,
) -> Result<(StatusCode, Json<service_provider::Model>), JsonApiError> {
    let created = catalog_service::register_provider(&state.db, me.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/services/providers/{id}/reviews", tag = "services", params(("id" = i32, Path, description = "Provider id")), responses((status = 200, description = "Reviews"), (status = 404, description = "Service provider not found")))]
pub async fn provider_reviews(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<order_review::Model>>, JsonApiError> {
    Ok(Json(catalog_service::provider_reviews(&state.db, id).await?))
}
