//! Client-side note cache
//! Mission: Keep a local copy of the user's notes in step with the server
//!
//! No optimistic merging: every successful mutation is followed by a full
//! re-fetch, so the cache is at most one round trip behind the server.

use crate::client::api::{ClientError, NotesClient};
use crate::notes::models::{CreateNoteRequest, Note, UpdateNoteRequest};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Progress of the most recent list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Cached notes plus the state of the last fetch.
///
/// Every operation takes `&mut self`, so a store has at most one request in
/// flight.
pub struct NotesStore {
    client: NotesClient,
    items: Vec<Note>,
    status: FetchStatus,
    error: Option<String>,
}

impl NotesStore {
    pub fn new(client: NotesClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            status: FetchStatus::Idle,
            error: None,
        }
    }

    pub fn items(&self) -> &[Note] {
        &self.items
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Message for the last failure, cleared by the next successful fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Cached notes whose title or content contains `query`, ignoring case.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }

        self.items
            .iter()
            .filter(|note| {
                note.note_title.to_lowercase().contains(&needle)
                    || note.note_content.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Replace the cache with the server's list
    pub async fn fetch_all(&mut self) -> Result<&[Note], ClientError> {
        self.status = FetchStatus::Loading;
        let result = self.client.list_notes().await;
        match result {
            Ok(notes) => {
                self.items = notes;
                self.status = FetchStatus::Succeeded;
                self.error = None;
                Ok(&self.items)
            }
            Err(e) => {
                self.status = FetchStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, note: CreateNoteRequest) -> Result<Note, ClientError> {
        let result = self.client.create_note(&note).await;
        let created = self.record(result)?;
        self.refresh().await;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        note_id: &str,
        changes: UpdateNoteRequest,
    ) -> Result<Note, ClientError> {
        let result = self.client.update_note(note_id, &changes).await;
        let updated = self.record(result)?;
        self.refresh().await;
        Ok(updated)
    }

    pub async fn delete(&mut self, note_id: &str) -> Result<(), ClientError> {
        let result = self.client.delete_note(note_id).await;
        self.record(result)?;
        self.refresh().await;
        Ok(())
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    /// Re-fetch after a mutation. The mutation already succeeded, so a failed
    /// refresh only shows up in `status` / `error`.
    async fn refresh(&mut self) {
        if let Err(e) = self.fetch_all().await {
            warn!("Refreshing notes after a change failed: {}", e);
        }
    }
}
