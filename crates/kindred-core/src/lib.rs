//! Domain layer for Kindred.
//!
//! Holds the rule-based companion's conversation policy (stage routing,
//! templates, constraint validation), the per-session context model, the
//! scoped-store boundary, configuration and the shared error type.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::KindredError;
