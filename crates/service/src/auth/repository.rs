use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: Option<&str>,
        password_hash: &str,
    ) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<i32, AuthUser>>,  // key: user id
        creds: Mutex<HashMap<i32, Credentials>>, // key: user id
    }

    fn poisoned<T>(_: T) -> AuthError {
        AuthError::Repository("mock repository lock poisoned".into())
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.email == email.to_lowercase()).cloned())
        }

        async fn find_user_by_phone(&self, phone: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.phone.as_deref() == Some(phone)).cloned())
        }

        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.username == username).cloned())
        }

        async fn create_user(
            &self,
            username: &str,
            email: &str,
            phone: Option<&str>,
            password_hash: &str,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            let email = email.to_lowercase();
            if users.values().any(|u| u.email == email) {
                return Err(AuthError::Conflict("Email already registered".into()));
            }
            let id = users.len() as i32 + 1;
            let user = AuthUser {
                id,
                username: username.to_string(),
                email,
                phone: phone.map(str::to_string),
                is_active: true,
            };
            users.insert(id, user.clone());
            drop(users);
            let mut creds = self.creds.lock().map_err(poisoned)?;
            creds.insert(id, Credentials { user_id: id, password_hash: password_hash.to_string() });
            Ok(user)
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(&user_id).cloned())
        }

        async fn update_password(&self, user_id: i32, password_hash: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let c = Credentials { user_id, password_hash };
            creds.insert(user_id, c.clone());
            Ok(c)
        }
    }
}
