//! Note Storage
//! Mission: Owner-scoped CRUD over the notes table
//!
//! Every statement filters on `user_id` alongside `note_id`, so the ownership
//! check and the read/write are one SQL statement. A note owned by someone
//! else and a note that does not exist look the same: `None` / `false`.

use crate::db::{now_millis, Database, StoreError};
use crate::notes::models::{Note, UpdateNoteRequest, DEFAULT_NOTE_COLOR};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

const NOTE_COLUMNS: &str = "note_id, user_id, note_title, note_content, color, \
     created_by, updated_by, create_on, last_update";

pub struct NoteStore {
    db: Database,
}

impl NoteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All notes owned by `user_id`, oldest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Note>, StoreError> {
        let user_id = user_id.to_string();
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE user_id = ?1
                     ORDER BY create_on ASC, row_id ASC"
                ))?;
                let notes = stmt
                    .query_map(params![user_id], note_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(notes)
            })
            .await
    }

    /// Insert a note owned by `user_id`. Callers validate title and content.
    pub async fn create(
        &self,
        user_id: &str,
        created_by: &str,
        note_title: &str,
        note_content: &str,
        color: Option<&str>,
    ) -> Result<Note, StoreError> {
        let now = now_millis();
        let note = Note {
            note_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            note_title: note_title.to_string(),
            note_content: note_content.to_string(),
            color: color.unwrap_or(DEFAULT_NOTE_COLOR).to_string(),
            created_by: created_by.to_string(),
            updated_by: None,
            create_on: now,
            last_update: now,
        };

        let row = note.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO notes (note_id, user_id, note_title, note_content, color, created_by, updated_by, create_on, last_update)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8)",
                    params![
                        row.note_id,
                        row.user_id,
                        row.note_title,
                        row.note_content,
                        row.color,
                        row.created_by,
                        row.create_on,
                        row.last_update,
                    ],
                )?;
                Ok(())
            })
            .await?;

        info!("📝 Note {} created for user {}", note.note_id, note.user_id);
        Ok(note)
    }

    pub async fn get(&self, user_id: &str, note_id: &str) -> Result<Option<Note>, StoreError> {
        let user_id = user_id.to_string();
        let note_id = note_id.to_string();
        self.db
            .call(move |conn| {
                let note = conn
                    .query_row(
                        &format!(
                            "SELECT {NOTE_COLUMNS} FROM notes WHERE note_id = ?1 AND user_id = ?2"
                        ),
                        params![note_id, user_id],
                        note_from_row,
                    )
                    .optional()?;
                Ok(note)
            })
            .await
    }

    /// Apply the supplied fields and return the updated note.
    ///
    /// `last_update` always moves forward, even when two writes land in the
    /// same millisecond.
    pub async fn update(
        &self,
        user_id: &str,
        note_id: &str,
        updated_by: &str,
        changes: UpdateNoteRequest,
    ) -> Result<Option<Note>, StoreError> {
        let user_id = user_id.to_string();
        let note_id = note_id.to_string();
        let updated_by = updated_by.to_string();
        let now = now_millis();

        let updated = self
            .db
            .call(move |conn| {
                let note = conn
                    .query_row(
                        &format!(
                            "UPDATE notes SET
                                note_title = COALESCE(?3, note_title),
                                note_content = COALESCE(?4, note_content),
                                color = COALESCE(?5, color),
                                updated_by = ?6,
                                last_update = MAX(?7, last_update + 1)
                             WHERE note_id = ?1 AND user_id = ?2
                             RETURNING {NOTE_COLUMNS}"
                        ),
                        params![
                            note_id,
                            user_id,
                            changes.note_title,
                            changes.note_content,
                            changes.color,
                            updated_by,
                            now,
                        ],
                        note_from_row,
                    )
                    .optional()?;
                Ok(note)
            })
            .await?;

        if let Some(note) = &updated {
            debug!("Note {} updated at {}", note.note_id, note.last_update);
        }
        Ok(updated)
    }

    /// Physically delete a note. Returns false if nothing matched.
    pub async fn delete(&self, user_id: &str, note_id: &str) -> Result<bool, StoreError> {
        let user_id = user_id.to_string();
        let note_id = note_id.to_string();
        let rows_affected = self
            .db
            .call(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM notes WHERE note_id = ?1 AND user_id = ?2",
                    params![note_id, user_id],
                )?)
            })
            .await?;

        if rows_affected > 0 {
            info!("🗑️  Note deleted");
        }
        Ok(rows_affected > 0)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        note_id: row.get(0)?,
        user_id: row.get(1)?,
        note_title: row.get(2)?,
        note_content: row.get(3)?,
        color: row.get(4)?,
        created_by: row.get(5)?,
        updated_by: row.get(6)?,
        create_on: row.get(7)?,
        last_update: row.get(8)?,
    })
}
