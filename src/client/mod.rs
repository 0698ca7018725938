//! Notes API client and its cached state store

pub mod api;
pub mod store;

pub use api::{ClientError, NotesClient};
pub use store::{FetchStatus, NotesStore};
