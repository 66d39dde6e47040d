use axum::{extract::State, http::StatusCode, routing::{get, post}, Extension, Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use models::coupon;
use service::coupon_service::{self, UserCouponView};

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub code: String,
}

pub fn public_routes() -> Router<ServerState> {
    Router::new().route("/marketing/coupons", get(list_available))
}

pub fn protected_routes() -> Router<ServerState> {
    Router::new()
        .route("/marketing/coupons", post(create_coupon))
        .route("/marketing/coupons/claim", post(claim_coupon))
        .route("/marketing/my-coupons", get(my_coupons))
}

#[utoipa::path(post, path = "/marketing/coupons", tag = "marketing", request_body = crate::openapi::CouponRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation failed or duplicate code"), (status = 403, description = "Unauthorized")))]
pub async fn create_coupon(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<coupon::NewCoupon>,
) -> Result<(StatusCode, Json<coupon::Model>), JsonApiError> {
    if !me.is_admin {
        warn!(user_id = me.id, "coupon creation denied");
        return Err(JsonApiError::forbidden("Unauthorized"));
    }
    let created = coupon_service::create_coupon(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/marketing/coupons", tag = "marketing", responses((status = 200, description = "Coupons valid right now")))]
pub async fn list_available(State(state): State<ServerState>) -> Result<Json<Vec<coupon::Model>>, JsonApiError> {
    Ok(Json(coupon_service::list_available(&state.db).await?))
}

#[utoipa::path(post, path = "/marketing/coupons/claim", tag = "marketing", request_body = crate::openapi::ClaimRequestDoc, responses((status = 201, description = "Claimed"), (status = 400, description = "Expired or already claimed"), (status = 404, description = "Invalid or expired coupon code")))]
pub async fn claim_coupon(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<ClaimRequest>,
) -> Result<(StatusCode, Json<UserCouponView>), JsonApiError> {
    let claimed = coupon_service::claim_coupon(&state.db, me.id, &input.code).await?;
    Ok((StatusCode::CREATED, Json(claimed)))
}

#[utoipa::path(get, path = "/marketing/my-coupons", tag = "marketing", responses((status = 200, description = "Caller's claimed coupons")))]
pub async fn my_coupons(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
) -> Result<Json<Vec<UserCouponView>>, JsonApiError> {
    Ok(Json(coupon_service::my_coupons(&state.db, me.id).await?))
}
