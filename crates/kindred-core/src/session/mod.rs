//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Per-conversation state (`SessionContext`)
//! - `repository`: Key-value persistence boundary (`ScopedStore`)

mod model;
mod repository;

// Re-export public API
pub use model::SessionContext;
pub use repository::{SESSION_KEY_PREFIX, ScopedStore, session_key};
