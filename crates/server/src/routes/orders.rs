use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};
use common::pagination::Pagination;
use common::types::{MessageResponse, Page};
use models::order::{self, OrderStatus};
use models::order_review;
use service::order_service::{self, CreateOrderInput};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub service_item_id: i32,
    pub appointment_time: DateTimeWithTimeZone,
    pub address: String,
    pub remark: Option<String>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: String,
    pub images: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    /// `pending`, `paid`, `completed` or `cancelled`
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrderQuery {
    fn status(&self) -> Result<Option<OrderStatus>, JsonApiError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(s) => OrderStatus::parse(s)
                .map(Some)
                .ok_or_else(|| JsonApiError::bad_request(format!("Invalid order status: {s}"))),
        }
    }

    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination::new(self.page.unwrap_or(d.page), self.per_page.unwrap_or(d.per_page))
    }
}

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/received", get(list_received))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/orders/:id/complete", post(complete_order))
        .route("/orders/:id/review", post(create_review))
}

#[utoipa::path(post, path = "/orders", tag = "orders", request_body = crate::openapi::CreateOrderRequestDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation failed or item not on sale"), (status = 404, description = "Service item not found")))]
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<order::Model>), JsonApiError> {
    let input = CreateOrderInput {
        service_item_id: input.service_item_id,
        appointment_time: input.appointment_time,
        address: input.address,
        remark: input.remark,
        coupon_code: input.coupon_code,
    };
    let created = order_service::create_order(&state.db, me.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/orders", tag = "orders", params(OrderQuery), responses((status = 200, description = "Caller's orders")))]
pub async fn list_orders(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiQuery(q): ApiQuery<OrderQuery>,
) -> Result<Json<Page<order::Model>>, JsonApiError> {
    Ok(Json(order_service::list_orders(&state.db, me.id, q.status()?, q.pagination()).await?))
}

#[utoipa::path(get, path = "/orders/received", tag = "orders", params(OrderQuery), responses((status = 200, description = "Orders received by the caller's provider profile"), (status = 403, description = "Caller is not a provider")))]
pub async fn list_received(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiQuery(q): ApiQuery<OrderQuery>,
) -> Result<Json<Page<order::Model>>, JsonApiError> {
    Ok(Json(order_service::list_provider_orders(&state.db, me.id, q.status()?, q.pagination()).await?))
}

#[utoipa::path(get, path = "/orders/{id}", tag = "orders", params(("id" = i32, Path, description = "Order id")), responses((status = 200, description = "Order"), (status = 404, description = "Order not found")))]
pub async fn get_order(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<order::Model>, JsonApiError> {
    Ok(Json(order_service::get_order(&state.db, me.id, id).await?))
}

#[utoipa::path(post, path = "/orders/{id}/cancel", tag = "orders", params(("id" = i32, Path, description = "Order id")), responses((status = 200, description = "Cancelled"), (status = 400, description = "Only pending orders can be cancelled"), (status = 404, description = "Order not found")))]
pub async fn cancel_order(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    order_service::cancel_order(&state.db, me.id, id).await?;
    Ok(Json(MessageResponse::new("Order cancelled successfully")))
}

#[utoipa::path(post, path = "/orders/{id}/complete", tag = "orders", params(("id" = i32, Path, description = "Order id")), responses((status = 200, description = "Completed"), (status = 400, description = "Only paid orders can be completed"), (status = 403, description = "Caller is not a provider")))]
pub async fn complete_order(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<order::Model>, JsonApiError> {
    Ok(Json(order_service::complete_order(&state.db, me.id, id).await?))
}

#[utoipa::path(post, path = "/orders/{id}/review", tag = "orders", params(("id" = i32, Path, description = "Order id")), request_body = crate::openapi::ReviewRequestDoc, responses((status = 201, description = "Reviewed"), (status = 400, description = "Order not completed, already reviewed or bad rating")))]
pub async fn create_review(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ApiJson(input): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<order_review::Model>), JsonApiError> {
    let review = order_service::create_review(&state.db, me.id, id, input.rating, &input.comment, input.images).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
