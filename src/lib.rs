//! fieldlore: a community archive for multilingual farming knowledge.

pub mod auth;
pub mod cli;
pub mod error;
pub mod export;
pub mod media;
pub mod models;
pub mod query;
pub mod service;
pub mod services;
pub mod store;
pub mod utils;
pub mod vocab;

// Re-export commonly used types
pub use error::{ArchiveError, Result};
pub use models::{Entry, EntryDraft, Session, User};
pub use service::ArchiveService;
pub use store::EntryStore;
