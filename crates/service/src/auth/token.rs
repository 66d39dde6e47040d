//! HS256 bearer tokens whose `sub` claim carries the user id.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse::<i32>()
            .map_err(|_| AuthError::TokenError("subject is not a user id".into()))
    }
}

/// Issue a token for `user_id` valid for `ttl_hours`.
pub fn issue_token(secret: &str, user_id: i32, ttl_hours: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Decode and validate signature and expiry.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_to_user() {
        let token = issue_token("s3cret", 42, 1).expect("issue");
        let claims = decode_token("s3cret", &token).expect("decode");
        assert_eq!(claims.user_id().expect("uid"), 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_or_garbage_is_rejected() {
        let token = issue_token("s3cret", 7, 1).expect("issue");
        assert!(matches!(decode_token("other", &token), Err(AuthError::TokenError(_))));
        assert!(decode_token("s3cret", "not.a.jwt").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // well past the default 60s leeway
        let token = issue_token("s3cret", 7, -2).expect("issue");
        assert!(decode_token("s3cret", &token).is_err());
    }
}
