//! Router assembly and shared application state

use crate::auth::{api as auth_api, auth_middleware, AuthState, JwtHandler, UserStore};
use crate::config::Config;
use crate::db::Database;
use crate::middleware::request_logging;
use crate::notes::{api as notes_api, NoteStore};
use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub notes: Arc<NoteStore>,
}

impl AppState {
    pub fn new(db: Database, jwt_handler: JwtHandler, bcrypt_cost: u32) -> Self {
        let user_store = UserStore::new(db.clone()).with_hash_cost(bcrypt_cost);
        Self {
            auth: AuthState::new(Arc::new(user_store), Arc::new(jwt_handler)),
            notes: Arc::new(NoteStore::new(db)),
        }
    }

    pub fn from_config(db: Database, config: &Config) -> Self {
        let jwt_handler =
            JwtHandler::new(&config.jwt_secret).with_expiration_hours(config.token_ttl_hours);
        Self::new(db, jwt_handler, config.bcrypt_cost)
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<NoteStore> {
    fn from_ref(state: &AppState) -> Self {
        state.notes.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth_api::signup))
        .route("/auth/login", post(auth_api::login));

    // Everything below requires a bearer token
    let protected_routes = Router::new()
        .route("/auth/me", get(auth_api::get_current_user))
        .route(
            "/api/notes",
            get(notes_api::list_notes).post(notes_api::create_note),
        )
        .route(
            "/api/notes/:id",
            get(notes_api::get_note)
                .put(notes_api::update_note)
                .delete(notes_api::delete_note),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "📒 Sticky notes API operational"
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    pub const TEST_SECRET: &str = "router-test-secret-0123456789abcdef";

    pub fn test_app() -> (Router, AppState) {
        let state = AppState::new(
            Database::in_memory().unwrap(),
            JwtHandler::new(TEST_SECRET),
            4,
        );
        (build_router(state.clone()), state)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, value)
    }

    /// Sign up and log in, returning (user_id, access_token)
    pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> (String, String) {
        let (status, _) = send(
            app,
            Method::POST,
            "/auth/signup",
            None,
            Some(serde_json::json!({
                "user_name": name,
                "user_email": email,
                "password": password,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            Method::POST,
            "/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        (
            body["user"]["user_id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }
}
