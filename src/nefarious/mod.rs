//! Client module for a nefarious-style media watchlist server

pub mod api;
mod auth;
pub mod models;
pub mod state;
pub mod storage;

pub use api::*;
pub use auth::*;
pub use models::*;
pub use state::SessionState;
pub use storage::SessionStore;
