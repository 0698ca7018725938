//! Notes API Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/notes` - List the caller's notes
//! - `POST /api/notes` - Create a note
//! - `GET /api/notes/:id` - Fetch one note
//! - `PUT /api/notes/:id` - Update title/content/color (any subset)
//! - `DELETE /api/notes/:id` - Delete a note
//!
//! All routes sit behind the auth middleware. A note that belongs to another
//! user is reported exactly like a missing one.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::notes::models::{CreateNoteRequest, Note, UpdateNoteRequest};
use crate::notes::store::NoteStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

fn require_text(value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

pub async fn list_notes(
    State(notes): State<Arc<NoteStore>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(notes.list(&auth.user_id).await?))
}

pub async fn create_note(
    State(notes): State<Arc<NoteStore>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(payload) = payload?;
    require_text(&payload.note_title)?;
    require_text(&payload.note_content)?;

    let note = notes
        .create(
            &auth.user_id,
            &auth.user.user_name,
            &payload.note_title,
            &payload.note_content,
            payload.color.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(notes): State<Arc<NoteStore>>,
    Extension(auth): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    notes
        .get(&auth.user_id, &note_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn update_note(
    State(notes): State<Arc<NoteStore>>,
    Extension(auth): Extension<AuthUser>,
    Path(note_id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(changes) = payload?;
    if let Some(title) = &changes.note_title {
        require_text(title)?;
    }
    if let Some(content) = &changes.note_content {
        require_text(content)?;
    }

    notes
        .update(&auth.user_id, &note_id, &auth.user.user_name, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn delete_note(
    State(notes): State<Arc<NoteStore>>,
    Extension(auth): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if notes.delete(&auth.user_id, &note_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
