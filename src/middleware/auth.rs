use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::TokenService;
use crate::AppState;

/// Authenticated identity attached to the request by `require_auth` and
/// read by handlers through `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Validates the access token from the `accessToken` cookie or the
/// Authorization header, confirms the user still exists, and threads the
/// identity into the request as an extension.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let bearer = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let token = jar
        .get("accessToken")
        .map(|c| c.value().to_string())
        .or_else(|| bearer.map(String::from))
        .ok_or_else(|| AppError::Unauthorized("Access token is missing".to_string()))?;

    let tokens = TokenService::new(state.config.jwt.clone());
    let claims = tokens.verify_access_token(&token)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))?;

    // Reject tokens for deleted users
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db.pg)
        .await?;

    if exists.is_none() {
        return Err(AppError::Unauthorized("Invalid access token".to_string()));
    }

    request.extensions_mut().insert(CurrentUser {
        id: user_id,
        username: claims.username,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
