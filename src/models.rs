//! Data models for the knowledge archive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single unit of farming knowledge with its metadata.
///
/// Entries are immutable once created: the store only ever appends new
/// entries or clears the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Store-assigned identifier, unique within the document.
    pub id: u64,
    pub title: String,
    pub description: String,
    /// One of the closed vocabulary in [`crate::vocab::languages`].
    pub language: String,
    /// One of the closed vocabulary in [`crate::vocab::categories`].
    pub category: String,
    /// Free-text place name; may be empty.
    #[serde(default)]
    pub location_name: String,
    /// Serialized as JSON null when absent. 0.0 is a genuine coordinate.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Path to the stored file under the media directory, if an image was
    /// attached.
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
    /// ISO-8601 creation time, set by the store.
    pub timestamp: String,
    pub contributor: String,
    pub contributor_full_name: String,
}

impl Entry {
    /// True if the entry carries at least one media reference.
    pub fn has_media(&self) -> bool {
        self.image_path.is_some() || self.audio_path.is_some()
    }

    /// True if both coordinates are present.
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// The caller-supplied part of an entry. The store assigns `id` and
/// `timestamp` at append time.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub language: String,
    pub category: String,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
    pub contributor: String,
    pub contributor_full_name: String,
}

/// A registered user record.
///
/// The `password` wire field holds an Argon2 PHC hash string, never the
/// plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub full_name: String,
    /// ISO-8601 registration time, immutable.
    pub registration_date: String,
    /// Incremented once per successful entry submission.
    pub entries_submitted: u64,
}

/// The persisted users document: an object mapping username to record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDb {
    pub users: HashMap<String, User>,
}

impl UserDb {
    /// True if any registered user already claims this email address.
    /// Case-sensitive exact match.
    pub fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}

/// An authenticated session, passed explicitly into store calls.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub full_name: String,
}
