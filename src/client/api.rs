//! HTTP client for the notes API
//! Mission: Speak the server's JSON contract and turn failures into messages a person can read

use crate::auth::models::{LoginRequest, LoginResponse, SignupRequest, UserResponse};
use crate::notes::models::{CreateNoteRequest, Note, UpdateNoteRequest};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// User-facing failure kinds. Display text is safe to show as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Your session is invalid or has expired, please log in again")]
    Unauthorized,

    #[error("That note could not be found")]
    NotFound,

    /// The server refused the input; carries its explanation
    #[error("{0}")]
    Rejected(String),

    #[error("The notes service ran into a problem, please try again")]
    Server,

    #[error("Could not reach the notes service")]
    Transport(#[source] reqwest::Error),

    #[error("Received an unexpected response from the notes service")]
    Decode(#[source] reqwest::Error),

    #[error("Not a usable notes service address: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err)
        } else {
            ClientError::Transport(err)
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(ClientError::Transport)?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidUrl(base_url.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn signup(
        &self,
        user_name: &str,
        user_email: &str,
        password: &str,
    ) -> Result<UserResponse, ClientError> {
        let body = SignupRequest {
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.request(Method::POST, &["auth", "signup"]).json(&body))
            .await
    }

    /// Log in and keep the issued token for later calls
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send_json(self.request(Method::POST, &["auth", "login"]).json(&body))
            .await?;
        self.token = Some(response.access_token.clone());
        Ok(response)
    }

    pub async fn current_user(&self) -> Result<UserResponse, ClientError> {
        self.send_json(self.request(Method::GET, &["auth", "me"])).await
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        self.send_json(self.request(Method::GET, &["api", "notes"])).await
    }

    pub async fn get_note(&self, note_id: &str) -> Result<Note, ClientError> {
        self.send_json(self.request(Method::GET, &["api", "notes", note_id]))
            .await
    }

    pub async fn create_note(&self, note: &CreateNoteRequest) -> Result<Note, ClientError> {
        self.send_json(self.request(Method::POST, &["api", "notes"]).json(note))
            .await
    }

    pub async fn update_note(
        &self,
        note_id: &str,
        changes: &UpdateNoteRequest,
    ) -> Result<Note, ClientError> {
        self.send_json(
            self.request(Method::PUT, &["api", "notes", note_id])
                .json(changes),
        )
        .await
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, &["api", "notes", note_id]))
            .await?;
        Ok(())
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked at construction: the base URL can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(segments));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(ClientError::Decode)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        debug!("Notes API returned {}", status);
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            s if s.is_client_error() => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .map(|body| body.error)
                    .unwrap_or_else(|_| "The request was rejected".to_string());
                ClientError::Rejected(message)
            }
            _ => ClientError::Server,
        })
    }
}
