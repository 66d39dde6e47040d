use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};
use common::pagination::Pagination;
use common::types::{MessageResponse, Page};
use service::admin_service::{self, AdminAction, AdminResource, Dashboard};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination::new(self.page.unwrap_or(d.page), self.per_page.unwrap_or(d.per_page))
    }
}

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/:resource", get(list).post(create))
        .route("/admin/:resource/:id", get(fetch).put(update).delete(remove))
        .route("/admin/:resource/:id/:action", post(perform))
}

#[utoipa::path(get, path = "/admin/dashboard", tag = "admin", responses((status = 200, description = "Entity counts"), (status = 403, description = "Admin access required")))]
pub async fn dashboard(State(state): State<ServerState>) -> Result<Json<Dashboard>, JsonApiError> {
    Ok(Json(admin_service::dashboard(&state.db).await?))
}

#[utoipa::path(get, path = "/admin/{resource}", tag = "admin", params(("resource" = String, Path, description = "users, categories, items, providers, orders, reviews, coupons, user-coupons or faqs"), PageQuery), responses((status = 200, description = "One page of rows"), (status = 404, description = "Unknown resource")))]
pub async fn list(
    State(state): State<ServerState>,
    Path(resource): Path<String>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Page<Value>>, JsonApiError> {
    let res: AdminResource = resource.parse()?;
    Ok(Json(admin_service::list(&state.db, res, q.pagination()).await?))
}

#[utoipa::path(post, path = "/admin/{resource}", tag = "admin", params(("resource" = String, Path, description = "categories, items, coupons or faqs")), responses((status = 201, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(resource): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    let res: AdminResource = resource.parse()?;
    let created = admin_service::create(&state.db, res, body).await?;
    info!(admin = %me.email, resource = res.as_str(), "admin_created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/admin/{resource}/{id}", tag = "admin", params(("resource" = String, Path, description = "Resource name"), ("id" = i32, Path, description = "Row id")), responses((status = 200, description = "Row"), (status = 404, description = "Not found")))]
pub async fn fetch(
    State(state): State<ServerState>,
    Path((resource, id)): Path<(String, i32)>,
) -> Result<Json<Value>, JsonApiError> {
    let res: AdminResource = resource.parse()?;
    Ok(Json(admin_service::get(&state.db, res, id).await?))
}

#[utoipa::path(put, path = "/admin/{resource}/{id}", tag = "admin", params(("resource" = String, Path, description = "Resource name"), ("id" = i32, Path, description = "Row id")), responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path((resource, id)): Path<(String, i32)>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, JsonApiError> {
    let res: AdminResource = resource.parse()?;
    let updated = admin_service::update(&state.db, res, id, body).await?;
    info!(admin = %me.email, resource = res.as_str(), id, "admin_updated");
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/admin/{resource}/{id}", tag = "admin", params(("resource" = String, Path, description = "Resource name"), ("id" = i32, Path, description = "Row id")), responses((status = 200, description = "Deleted"), (status = 400, description = "Row is still referenced"), (status = 404, description = "Not found")))]
pub async fn remove(
    State(state): State<ServerState>,
    Path((resource, id)): Path<(String, i32)>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let res: AdminResource = resource.parse()?;
    admin_service::delete(&state.db, res, id).await?;
    Ok(Json(MessageResponse::new("Deleted successfully")))
}

#[utoipa::path(post, path = "/admin/{resource}/{id}/{action}", tag = "admin", params(("resource" = String, Path, description = "providers or orders"), ("id" = i32, Path, description = "Row id"), ("action" = String, Path, description = "approve, reject, complete or cancel")), responses((status = 200, description = "Applied"), (status = 400, description = "Not allowed in the current state")))]
pub async fn perform(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path((resource, id, action)): Path<(String, i32, String)>,
) -> Result<Json<Value>, JsonApiError> {
    let res: AdminResource = resource.parse()?;
    let action: AdminAction = action.parse()?;
    let out = admin_service::perform(&state.db, res, id, action).await?;
    info!(admin = %me.email, resource = res.as_str(), id, ?action, "admin_action");
    Ok(Json(out))
}
