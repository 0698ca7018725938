//! Authentication API Endpoints
//! Mission: Provide signup, login and current-user endpoints

use crate::auth::{
    jwt::JwtHandler,
    middleware::AuthUser,
    models::{LoginRequest, LoginResponse, SignupRequest, UserResponse},
    user_store::UserStore,
};
use crate::db::StoreError;
use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Signup endpoint - POST /auth/signup
pub async fn signup(
    State(state): State<AuthState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;

    let user_name = payload.user_name.trim();
    let user_email = payload.user_email.trim();
    if user_name.is_empty() || user_email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let user = state
        .user_store
        .create_user(user_name, user_email, &payload.password)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => {
                warn!("Signup rejected, email already registered: {}", user_email);
                ApiError::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Login endpoint - POST /auth/login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    info!("🔐 Login attempt: {}", email);

    let Some(user) = state
        .user_store
        .verify_credentials(email, &payload.password)
        .await?
    else {
        warn!("❌ Failed login attempt: {}", email);
        return Err(ApiError::InvalidCredentials);
    };

    let (access_token, expires_in) = state.jwt_handler.generate_token(&user.user_id)?;

    info!("✅ Login successful: {} ({})", user.user_name, user.user_id);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in,
        user: UserResponse::from_user(&user),
    }))
}

/// Get current user info - GET /auth/me
pub async fn get_current_user(Extension(auth): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse::from_user(&auth.user))
}
