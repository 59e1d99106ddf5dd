//! Error types for fieldlore.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archive operations.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Unknown user: {0}")]
    UserNotFound(String),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Latitude and longitude must be provided together")]
    PartialCoordinates,

    #[error("Media file not found: {0}")]
    MediaNotFound(PathBuf),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("External service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("External service timed out: {0}")]
    ServiceTimeout(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
