//! Credential store: username/password records with Argon2id hashing.

use crate::error::{ArchiveError, Result};
use crate::models::{User, UserDb};
use crate::store::now_iso8601;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persists user records as a single JSON document keyed by username.
///
/// Passwords are stored only as Argon2id PHC strings; every registration
/// generates a fresh random salt.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the users document. A missing file is an empty store.
    pub fn load(&self) -> Result<UserDb> {
        if !self.path.exists() {
            return Ok(UserDb::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let db = serde_json::from_str(&content)?;
        Ok(db)
    }

    /// Register a new user. Rejected before any persistence attempt if the
    /// username or email is already taken (case-sensitive exact match).
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<()> {
        let mut db = self.load()?;

        if db.users.contains_key(username) {
            return Err(ArchiveError::UsernameTaken(username.to_string()));
        }
        if db.email_taken(email) {
            return Err(ArchiveError::EmailTaken(email.to_string()));
        }

        let user = User {
            email: email.to_string(),
            password_hash: hash_password(password)?,
            full_name: full_name.to_string(),
            registration_date: now_iso8601(),
            entries_submitted: 0,
        };
        db.users.insert(username.to_string(), user);
        self.write_atomic(&db)
    }

    /// True iff the username exists and the password verifies against the
    /// stored hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let db = self.load()?;
        let Some(user) = db.users.get(username) else {
            return Ok(false);
        };
        Ok(verify_password(password, &user.password_hash))
    }

    /// Read-only lookup of a user record.
    pub fn get_user_info(&self, username: &str) -> Result<Option<User>> {
        Ok(self.load()?.users.get(username).cloned())
    }

    /// Increment the user's submission counter.
    pub fn increment_entry_count(&self, username: &str) -> Result<()> {
        let mut db = self.load()?;
        let user = db
            .users
            .get_mut(username)
            .ok_or_else(|| ArchiveError::UserNotFound(username.to_string()))?;
        user.entries_submitted += 1;
        self.write_atomic(&db)
    }

    fn write_atomic(&self, db: &UserDb) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let content = serde_json::to_string_pretty(db)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| ArchiveError::Io(e.error))?;
        Ok(())
    }
}

/// Hash a password with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ArchiveError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
