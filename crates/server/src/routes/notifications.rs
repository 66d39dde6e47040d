use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use common::types::MessageResponse;
use service::notification_service;

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub phone: String,
}

pub fn routes() -> Router<ServerState> {
    Router::new().route("/notifications/send_sms", post(send_sms))
}

#[utoipa::path(post, path = "/notifications/send_sms", tag = "notifications", request_body = crate::openapi::SendSmsRequestDoc, responses((status = 200, description = "SMS sent successfully"), (status = 400, description = "Invalid phone number"), (status = 500, description = "Failed to send SMS")))]
pub async fn send_sms(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<SendSmsRequest>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    notification_service::send_sms(state.sms.as_ref(), &input.phone, state.sms_code_length).await?;
    Ok(Json(MessageResponse::new("SMS sent successfully")))
}
