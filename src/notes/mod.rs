//! Notes Module
//! Mission: Per-user sticky notes with ownership enforced in every query

pub mod api;
pub mod models;
pub mod store;

pub use models::{CreateNoteRequest, Note, UpdateNoteRequest};
pub use store::NoteStore;
