use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use common::types::MessageResponse;
use service::payment_service::{self, CallbackOutcome, PaymentCallback, PaymentLink};

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: i32,
}

pub fn public_routes() -> Router<ServerState> {
    Router::new().route("/payments/callback", post(payment_callback))
}

pub fn protected_routes() -> Router<ServerState> {
    Router::new().route("/payments/create", post(create_payment))
}

#[utoipa::path(post, path = "/payments/create", tag = "payments", request_body = crate::openapi::CreatePaymentRequestDoc, responses((status = 200, description = "Payment link", body = crate::openapi::PaymentLinkDoc), (status = 400, description = "Order is not in pending state"), (status = 404, description = "Order not found")))]
pub async fn create_payment(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    ApiJson(input): ApiJson<CreatePaymentRequest>,
) -> Result<Json<PaymentLink>, JsonApiError> {
    let link = payment_service::create_payment(&state.db, state.payments.as_ref(), me.id, input.order_id).await?;
    Ok(Json(link))
}

/// Every well-formed callback is acknowledged with 200, applied or not.
#[utoipa::path(post, path = "/payments/callback", tag = "payments", request_body = crate::openapi::PaymentCallbackDoc, responses((status = 200, description = "Callback received")))]
pub async fn payment_callback(
    State(state): State<ServerState>,
    ApiJson(cb): ApiJson<PaymentCallback>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    match payment_service::handle_callback(&state.db, cb).await? {
        CallbackOutcome::Paid { order_id } => info!(order_id, "payment_callback_applied"),
        CallbackOutcome::Ignored(reason) => warn!(reason, "payment_callback_ignored"),
    }
    Ok(Json(MessageResponse::new("Callback received")))
}
