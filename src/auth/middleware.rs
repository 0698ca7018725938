//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{api::AuthState, jwt::TokenError, models::User};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::{debug, warn};

/// Identity attached to a request once its token checks out
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub user: User,
}

/// Auth middleware that validates JWT tokens and resolves the user
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Authorization(bearer) = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthError::MissingToken)?;

    let claims = state
        .jwt_handler
        .validate_token(bearer.token())
        .map_err(|e| match e {
            TokenError::ExpiredToken => AuthError::ExpiredToken,
            TokenError::InvalidToken => AuthError::InvalidToken,
        })?;

    // A signed token may outlive its account
    let user = state
        .user_store
        .get_user_by_id(&claims.user_id)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
        .ok_or(AuthError::UserNotFound)?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        user,
    });

    Ok(next.run(req).await)
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    UserNotFound,
    Internal(anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(source) => ApiError::Internal(source),
            _ => ApiError::Unauthorized,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => debug!("Rejected request: missing bearer token"),
            AuthError::InvalidToken => warn!("Rejected request: invalid token"),
            AuthError::ExpiredToken => debug!("Rejected request: expired token"),
            AuthError::UserNotFound => warn!("Rejected request: token for unknown user"),
            AuthError::Internal(_) => {}
        }

        ApiError::from(self).into_response()
    }
}
