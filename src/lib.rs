//! Sticky Notes Backend Library
//!
//! JSON API for per-user sticky notes plus the client used to talk to it.
//! The server binary (`stickynotes`) and the terminal client (`notes-cli`)
//! are both thin wrappers around these modules.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod notes;

pub use app::{build_router, AppState};
pub use config::Config;
pub use db::Database;
