use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ModelError::Validation(msg.into())
    }
}

/// Unique and foreign-key violations stay client errors; the rest is opaque.
impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ModelError::Duplicate("Record already exists".into()),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ModelError::Validation("Record is referenced by other records or references a missing one".into())
            }
            _ => ModelError::Db(e.to_string()),
        }
    }
}
