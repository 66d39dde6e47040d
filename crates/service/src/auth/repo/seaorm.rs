use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, email: u.email, phone: u.phone, is_active: u.is_active }
}

fn model_err(e: ModelError) -> AuthError {
    match e {
        ModelError::Validation(m) => AuthError::Validation(m),
        ModelError::Duplicate(m) => AuthError::Conflict(m),
        ModelError::Db(m) => AuthError::Repository(m),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await.map_err(model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_phone(&self.db, phone).await.map_err(model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_username(&self.db, username).await.map_err(model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: Option<&str>,
        password_hash: &str,
    ) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, username, email, phone, password_hash)
            .await
            .map_err(model_err)?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }

    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<Credentials, AuthError> {
        let found = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .ok_or(AuthError::NotFound)?;
        let mut am: models::user::ActiveModel = found.into();
        am.password_hash = Set(password_hash.clone());
        am.update(&self.db).await.map_err(|e| AuthError::Repository(e.to_string()))?;
        tracing::debug!(user_id, "password_updated");
        Ok(Credentials { user_id, password_hash })
    }
}
