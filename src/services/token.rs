//! Access/refresh JWT issuance and verification.
//!
//! The two token kinds are signed with separate secrets: a short-lived
//! access token carrying the user's identity, and a long-lived refresh
//! token carrying only the subject. The refresh token additionally has
//! to match the single value persisted on the user row (checked by
//! `AuthService`, not here).
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.access_expiry_minutes);

        let claims = AccessClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.access_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::days(self.config.refresh_expiry_days);

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.refresh_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    /// Expired, malformed and wrongly-signed tokens all map to 401.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.config.access_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.config.refresh_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_expiry_minutes: 60,
            refresh_expiry_days: 10,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "chai".to_string(),
            email: "chai@example.com".to_string(),
            fullname: "Chai Aur Code".to_string(),
            password_hash: "hash".to_string(),
            avatar_url: "https://cdn.example.com/a.png".to_string(),
            cover_image_url: None,
            refresh_token: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn access_token_round_trip_carries_identity() {
        let svc = TokenService::new(jwt_config());
        let user = test_user();

        let token = svc.issue_access_token(&user).expect("should issue");
        let claims = svc.verify_access_token(&token).expect("should verify");

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "chai");
        assert_eq!(claims.email, "chai@example.com");
    }

    #[test]
    fn refresh_token_round_trip() {
        let svc = TokenService::new(jwt_config());
        let id = Uuid::new_v4();

        let token = svc.issue_refresh_token(id).expect("should issue");
        let claims = svc.verify_refresh_token(&token).expect("should verify");

        assert_eq!(claims.sub, id.to_string());
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        // Separate secrets: an access token must not pass refresh
        // verification and vice versa.
        let svc = TokenService::new(jwt_config());
        let user = test_user();

        let access = svc.issue_access_token(&user).expect("should issue");
        let refresh = svc.issue_refresh_token(user.id).expect("should issue");

        assert!(svc.verify_refresh_token(&access).is_err());
        assert!(svc.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let issuer = TokenService::new(jwt_config());
        let other = TokenService::new(JwtConfig {
            access_secret: "some-other-secret".to_string(),
            ..jwt_config()
        });

        let token = issuer.issue_access_token(&test_user()).expect("should issue");
        let err = other.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let svc = TokenService::new(jwt_config());
        assert!(matches!(
            svc.verify_access_token("not.a.jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
