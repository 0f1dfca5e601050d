use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token")]
    InvalidToken,
}

/// Issues and validates the bearer tokens protecting the /api routes.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Authenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expires_at = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Pulls the bearer token out of the Authorization header and validates
    /// it. Handlers call this at the top and answer 401 on error.
    pub fn authenticate(&self, req: &HttpRequest) -> Result<Claims, AuthError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_carry_the_claims() {
        let auth = Authenticator::new("test-secret");
        let token = auth.issue("user-1", "marvin", "admin").unwrap();

        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "marvin");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let auth = Authenticator::new("test-secret");
        let other = Authenticator::new("other-secret");
        let token = other.issue("user-1", "marvin", "admin").unwrap();

        assert!(matches!(auth.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = Authenticator::new("test-secret");
        let claims = Claims {
            sub: "user-1".into(),
            username: "marvin".into(),
            role: "admin".into(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding).unwrap();

        assert!(matches!(auth.verify(&token), Err(AuthError::InvalidToken)));
    }
}
