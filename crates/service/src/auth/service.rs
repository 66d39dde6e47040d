use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token;
use models::{user, validation};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self { jwt_secret: c.jwt_secret.clone(), token_ttl_hours: c.token_ttl_hours }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, phc: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let input = RegisterInput { username: "tester".into(), email: "user@example.com".into(), phone: None, password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let email = input.email.trim().to_lowercase();
        if !validation::is_valid_email(&email) {
            return Err(AuthError::Validation("Invalid email format".into()));
        }
        let phone = input.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
        if let Some(p) = phone {
            if !validation::is_valid_phone(p) {
                return Err(AuthError::Validation("Invalid phone number format".into()));
            }
        }
        user::validate_username(&input.username).map_err(|e| AuthError::Validation(plain(e)))?;
        user::validate_password(&input.password).map_err(|e| AuthError::Validation(plain(e)))?;

        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict("Email already registered".into()));
        }
        if let Some(p) = phone {
            if self.repo.find_user_by_phone(p).await?.is_some() {
                return Err(AuthError::Conflict("Phone number already registered".into()));
            }
        }
        if self.repo.find_user_by_username(input.username.trim()).await?.is_some() {
            return Err(AuthError::Conflict("Username already taken".into()));
        }

        let hash = hash_password(&input.password)?;
        let user = self.repo.create_user(input.username.trim(), &email, phone, &hash).await?;
        info!(user_id = user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "someone".into(), email: "u@e.com".into(), phone: None, password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(session.token_type, "Bearer");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            debug!(user_id = user.id, "login_rejected_inactive");
            return Err(AuthError::Unauthorized);
        }

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }

        let access_token = token::issue_token(&self.cfg.jwt_secret, user.id, self.cfg.token_ttl_hours)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession {
            user,
            access_token,
            token_type: "Bearer".into(),
            expires_in: self.cfg.token_ttl_hours * 3600,
        })
    }

    /// Replace the password after verifying the current one.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(&self, user_id: i32, old_password: &str, new_password: &str) -> Result<(), AuthError> {
        let cred = self.repo.get_credentials(user_id).await?.ok_or(AuthError::NotFound)?;
        if !verify_password(old_password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        user::validate_password(new_password).map_err(|e| AuthError::Validation(plain(e)))?;
        let hash = hash_password(new_password)?;
        self.repo.update_password(user_id, hash).await?;
        info!(user_id, "password_changed");
        Ok(())
    }
}

fn plain(e: models::errors::ModelError) -> String {
    match e {
        models::errors::ModelError::Validation(m)
        | models::errors::ModelError::Duplicate(m)
        | models::errors::ModelError::Db(m) => m,
    }
}
