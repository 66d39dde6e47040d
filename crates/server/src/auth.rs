use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::JsonApiError;
use configs::AppConfig;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::token;
use service::integrations::{LogSmsSender, MockPaymentGateway, PaymentGateway, SmsSender};
use service::user_service;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub admin: configs::AuthConfig,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub auth_service: Arc<AuthService<SeaOrmAuthRepository>>,
    pub sms: Arc<dyn SmsSender>,
    pub payments: Arc<dyn PaymentGateway>,
    pub sms_code_length: usize,
}

impl ServerState {
    /// State with the logging SMS sender and the mock payment gateway.
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        Self {
            auth_service: Arc::new(AuthService::new(repo, AuthConfig::from(&cfg.auth))),
            auth: ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), admin: cfg.auth.clone() },
            sms: Arc::new(LogSmsSender),
            payments: Arc::new(MockPaymentGateway::new(cfg.payment.gateway_url.clone())),
            sms_code_length: cfg.sms.code_length,
            db,
        }
    }

    pub fn with_sms(mut self, sms: Arc<dyn SmsSender>) -> Self {
        self.sms = sms;
        self
    }
}

/// Authenticated caller, placed in request extensions by [`require_bearer_token`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub is_admin: bool,
}

fn bearer(req: &Request) -> Result<&str, JsonApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| JsonApiError::unauthorized("Missing authorization token"))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("Authorization header must use the Bearer scheme"))
}

/// Validate `Authorization: Bearer <token>` and load the caller.
/// Unknown or deactivated accounts are rejected even with a valid signature.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let claims = token::decode_token(&state.auth.jwt_secret, bearer(&req)?).map_err(|e| {
        warn!(path = %path, err = %e, "token validation failed");
        JsonApiError::unauthorized("Invalid or expired token")
    })?;
    let user_id = claims.user_id()?;
    let user = match user_service::get_user(&state.db, user_id).await {
        Ok(u) if u.is_active => u,
        Ok(_) | Err(service::errors::ServiceError::NotFound(_)) => {
            warn!(path = %path, user_id, "token subject unavailable");
            return Err(JsonApiError::unauthorized("Invalid or expired token"));
        }
        Err(e) => return Err(e.into()),
    };
    let is_admin = state.auth.admin.is_admin_email(&user.email);
    req.extensions_mut().insert(CurrentUser { id: user.id, email: user.email, is_admin });
    Ok(next.run(req).await)
}

/// Must run inside [`require_bearer_token`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, JsonApiError> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        Some(user) => {
            warn!(user_id = user.id, path = %req.uri().path(), "admin access denied");
            Err(JsonApiError::forbidden("Admin access required"))
        }
        None => Err(JsonApiError::unauthorized("Missing authorization token")),
    }
}
