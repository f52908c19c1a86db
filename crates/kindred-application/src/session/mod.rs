//! Session application services.

mod context_store;

pub use context_store::SessionContextStore;
