//! Authentication Models
//! Mission: Define secure user and authentication data structures

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub create_on: i64,
    pub last_update: i64,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub iat: usize, // issued-at timestamp
    pub exp: usize, // expiration timestamp
}

/// Signup request body
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize, // seconds until expiration
    pub user: UserResponse,
}

/// User response (sanitized)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub create_on: i64,
    pub last_update: i64,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            create_on: user.create_on,
            last_update: user.last_update,
        }
    }
}
