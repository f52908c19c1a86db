//! Application layer for Kindred.
//!
//! This crate composes the domain policy (`kindred-core`) and the storage
//! backends (`kindred-infrastructure`) into the companion's use cases.

pub mod companion;
pub mod generator;
pub mod session;

pub use companion::CompanionConversation;
pub use generator::{Generation, ResponseGenerator};
pub use session::SessionContextStore;
