use axum::{extract::State, routing::get, Json, Router};

use crate::auth::ServerState;
use crate::errors::JsonApiError;
use models::faq;
use service::support_service;

pub fn routes() -> Router<ServerState> {
    Router::new().route("/support/faq", get(list_faq))
}

#[utoipa::path(get, path = "/support/faq", tag = "support", responses((status = 200, description = "All FAQs")))]
pub async fn list_faq(State(state): State<ServerState>) -> Result<Json<Vec<faq::Model>>, JsonApiError> {
    Ok(Json(support_service::list_faq(&state.db).await?))
}
