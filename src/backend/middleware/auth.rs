/**
 * Authentication Middleware
 *
 * Protects the `/api/v1` routes. Extracts the bearer token from the
 * Authorization header, verifies it against `JWT_SECRET`, and attaches the
 * user to the request extensions for handlers.
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub name: Option<String>,
}

fn unauthorized(message: &str) -> BackendError {
    BackendError::handler(StatusCode::UNAUTHORIZED, message)
}

/// Authentication middleware
///
/// Returns 401 when the token is missing, malformed, expired, or names a
/// user that no longer exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            unauthorized("Missing bearer token")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        unauthorized("Invalid Authorization header")
    })?;

    let claims = verify_token(token, &app_state.config.jwt_secret).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        unauthorized("Invalid token subject")
    })?;

    // Without a database the data routes answer 503 themselves
    if let Some(pool) = &app_state.db_pool {
        if !user_exists(pool, user_id).await? {
            tracing::warn!("Token subject {} not found in database", user_id);
            return Err(unauthorized("Unknown user"));
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        name: claims.name,
    });

    Ok(next.run(request).await)
}

async fn user_exists(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    use crate::backend::auth::users::get_user_by_id;

    Ok(get_user_by_id(pool, user_id).await?.is_some())
}

/// Extract the authenticated user from request extensions
pub fn extract_authenticated_user(request: &Request) -> Result<AuthenticatedUser, StatusCode> {
    request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("AuthenticatedUser not found in request extensions");
            StatusCode::UNAUTHORIZED
        })
}

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                StatusCode::UNAUTHORIZED
            })?;

        Ok(AuthUser(user))
    }
}
