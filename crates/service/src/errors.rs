use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::auth::errors::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("external service error: {0}")]
    External(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Classify constraint violations; everything else is a plain database error.
    pub fn from_db(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate("Record already exists".into()),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Validation("Record is referenced by other records or references a missing one".into())
            }
            _ => Self::Db(e.to_string()),
        }
    }

    /// Client-facing message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Duplicate(m)
            | Self::Forbidden(m)
            | Self::Unauthorized(m) => m.clone(),
            Self::Model(models::errors::ModelError::Validation(m) | models::errors::ModelError::Duplicate(m)) => m.clone(),
            Self::Db(_) | Self::Model(_) => "Internal server error".into(),
            Self::External(m) => m.clone(),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => Self::Validation(m),
            AuthError::Conflict(m) => Self::Duplicate(m),
            AuthError::NotFound => Self::not_found("User"),
            AuthError::Unauthorized => Self::Unauthorized("Invalid credentials".into()),
            AuthError::TokenError(_) => Self::Unauthorized("Invalid or expired token".into()),
            AuthError::HashError(m) | AuthError::Repository(m) => Self::Db(m),
        }
    }
}
