use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::auth::{require_admin, require_bearer_token, ServerState};
use crate::openapi::ApiDoc;

pub mod admin;
pub mod health;
pub mod marketing;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod services;
pub mod support;
pub mod users;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public, authenticated and admin routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(users::public_routes())
        .merge(services::public_routes())
        .merge(payments::public_routes())
        .merge(marketing::public_routes())
        .merge(notifications::routes())
        .merge(support::routes());

    let protected = Router::new()
        .merge(users::protected_routes())
        .merge(services::protected_routes())
        .merge(orders::routes())
        .merge(payments::protected_routes())
        .merge(marketing::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    // layers run bottom-up: token check first, then the admin check
    let admin_routes = admin::routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    public
        .merge(protected)
        .merge(admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
