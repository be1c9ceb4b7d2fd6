//! Session lifecycle: register, login, logout, token refresh and
//! password change, built on the password and token services.
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;

const USER_COLUMNS: &str = "id, username, email, fullname, password_hash, avatar_url, \
     cover_image_url, refresh_token, created_at, updated_at";

/// Usernames are stored lowercased; the duplicate check has to compare
/// against the same form or "Alice" slips past an existing "alice".
fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            pool,
            tokens: TokenService::new(jwt),
        }
    }

    /// Create a user. Username/email uniqueness is checked up front for a
    /// friendly message; the store's unique constraints remain the
    /// authoritative backstop (surfaced as 409 by the error boundary).
    pub async fn register(&self, input: RegisterUser) -> Result<User> {
        let username = normalize_username(&input.username);

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2")
                .bind(&username)
                .bind(&input.email)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (username, email, fullname, password_hash, avatar_url, cover_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&username)
        .bind(&input.email)
        .bind(&input.fullname)
        .bind(&password_hash)
        .bind(&input.avatar_url)
        .bind(&input.cover_image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Authenticate by username or email; on success issue a fresh token
    /// pair and persist the refresh token on the user row.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(User, String, String)> {
        let user: User = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid user credentials".to_string(),
            ));
        }

        let access_token = self.tokens.issue_access_token(&user)?;
        let refresh_token = self.tokens.issue_refresh_token(user.id)?;

        let user: User = sqlx::query_as(&format!(
            "UPDATE users SET refresh_token = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&refresh_token)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok((user, access_token, refresh_token))
    }

    /// Clear the stored refresh token. Idempotent: logging out twice is
    /// not a fault.
    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Single-use refresh token rotation. The new token replaces the old
    /// through a conditional update keyed on the presented value, so a
    /// stale or concurrently-rotated token loses with 401 instead of
    /// silently overwriting the winner's token.
    pub async fn refresh(&self, presented: &str) -> Result<(User, String, String)> {
        let claims = self.tokens.verify_refresh_token(presented)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        let user: User = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        let access_token = self.tokens.issue_access_token(&user)?;
        let refresh_token = self.tokens.issue_refresh_token(user.id)?;

        let rotated: Option<User> = sqlx::query_as(&format!(
            "UPDATE users SET refresh_token = $1, updated_at = NOW() \
             WHERE id = $2 AND refresh_token = $3 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&refresh_token)
        .bind(user.id)
        .bind(presented)
        .fetch_optional(&self.pool)
        .await?;

        let user = rotated.ok_or_else(|| {
            AppError::Unauthorized("Refresh token is expired or already used".to_string())
        })?;

        Ok((user, access_token, refresh_token))
    }

    /// Re-hash and store a new password after verifying the old one.
    /// Existing tokens stay valid; the session continues.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user: User = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !verify_password(old_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Old password is incorrect".to_string()));
        }

        let new_hash = hash_password(new_password)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_normalize_to_lowercase_for_lookup_and_storage() {
        assert_eq!(normalize_username("Alice"), "alice");
        assert_eq!(normalize_username("  ChaiAurCode "), "chaiaurcode");
        assert_eq!(normalize_username("already_lower"), "already_lower");
    }
}
