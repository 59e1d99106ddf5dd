//! Service layer tying the entry, credential and media stores together.

use crate::auth::CredentialStore;
use crate::error::{ArchiveError, Result};
use crate::export::{self, ExportFormat};
use crate::media::MediaStore;
use crate::models::{Entry, EntryDraft, Session};
use crate::query::{self, EntryFilter, SearchFilters, SortKey};
use crate::store::EntryStore;
use crate::vocab;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A submission as the user provides it, before validation and media
/// import.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub title: String,
    pub description: String,
    pub language: String,
    pub category: String,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<PathBuf>,
    pub audio: Option<PathBuf>,
}

/// Aggregate numbers shown on the home and export screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveStats {
    pub total_entries: usize,
    pub languages: usize,
    pub categories: usize,
    pub with_media: usize,
    pub with_coordinates: usize,
}

/// Coordinates all archive operations against one data directory.
///
/// Each instance is an explicit store handle; nothing is cached between
/// calls, so derived values like the next entry id always come from the
/// persisted documents.
pub struct ArchiveService {
    entries: EntryStore,
    users: CredentialStore,
    media: MediaStore,
}

impl ArchiveService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            entries: EntryStore::new(data_dir.join("entries.json")),
            users: CredentialStore::new(data_dir.join("users.json")),
            media: MediaStore::new(data_dir.join("media")),
        }
    }

    pub fn entry_store(&self) -> &EntryStore {
        &self.entries
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.users
    }

    pub fn media_store(&self) -> &MediaStore {
        &self.media
    }

    /// Register a new user account.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<()> {
        if username.trim().is_empty() {
            return Err(ArchiveError::MissingField("username"));
        }
        if email.trim().is_empty() {
            return Err(ArchiveError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ArchiveError::MissingField("password"));
        }
        self.users.register(username, email, password, full_name)
    }

    /// Authenticate and produce an explicit session for later calls.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if !self.users.authenticate(username, password)? {
            return Err(ArchiveError::AuthenticationFailed);
        }
        let user = self
            .users
            .get_user_info(username)?
            .ok_or(ArchiveError::AuthenticationFailed)?;
        Ok(Session {
            username: username.to_string(),
            full_name: user.full_name,
        })
    }

    /// Validate and persist a submission, importing any media files and
    /// crediting the contributor's counter.
    pub fn submit(&self, session: &Session, form: SubmissionForm) -> Result<Entry> {
        if form.title.trim().is_empty() {
            return Err(ArchiveError::MissingField("title"));
        }
        if form.description.trim().is_empty() {
            return Err(ArchiveError::MissingField("description"));
        }
        vocab::validate_language(&form.language)?;
        vocab::validate_category(&form.category)?;

        match (form.latitude, form.longitude) {
            (Some(lat), Some(lon)) => vocab::validate_coordinates(lat, lon)?,
            (None, None) => {}
            _ => return Err(ArchiveError::PartialCoordinates),
        }

        let image_path = form
            .image
            .as_deref()
            .map(|p| self.media.store(p))
            .transpose()?;
        let audio_path = form
            .audio
            .as_deref()
            .map(|p| self.media.store(p))
            .transpose()?;

        let entry = self.entries.append(EntryDraft {
            title: form.title,
            description: form.description,
            language: form.language,
            category: form.category,
            location_name: form.location_name,
            latitude: form.latitude,
            longitude: form.longitude,
            image_path,
            audio_path,
            contributor: session.username.clone(),
            contributor_full_name: session.full_name.clone(),
        })?;

        self.users.increment_entry_count(&session.username)?;
        Ok(entry)
    }

    /// Filtered, sorted view of the collection. Fail-soft on load errors.
    pub fn browse(&self, filter: &EntryFilter, sort: SortKey) -> Vec<Entry> {
        let entries = self.entries.load_or_empty();
        query::sort(&query::filter(&entries, filter), sort)
    }

    /// Free-text search over the collection. Fail-soft on load errors.
    pub fn search(&self, text: &str, filters: &SearchFilters) -> Vec<Entry> {
        let entries = self.entries.load_or_empty();
        query::search(&entries, text, filters)
    }

    /// Encode a filtered view for download. Returns the stamped filename
    /// and the payload.
    pub fn export(
        &self,
        format: ExportFormat,
        filter: &EntryFilter,
        include_media: bool,
        include_coordinates: bool,
    ) -> Result<(String, String)> {
        let entries = query::filter(&self.entries.load()?, filter);
        let payload = match format {
            ExportFormat::Jsonl => export::to_jsonl(&entries, include_media, include_coordinates)?,
            ExportFormat::Csv => export::to_csv(&entries, include_media, include_coordinates)?,
        };
        Ok((export::export_filename(format), payload))
    }

    /// Archive-wide statistics.
    pub fn stats(&self) -> ArchiveStats {
        let entries = self.entries.load_or_empty();
        let languages: HashSet<&str> = entries.iter().map(|e| e.language.as_str()).collect();
        let categories: HashSet<&str> = entries.iter().map(|e| e.category.as_str()).collect();
        ArchiveStats {
            total_entries: entries.len(),
            languages: languages.len(),
            categories: categories.len(),
            with_media: entries.iter().filter(|e| e.has_media()).count(),
            with_coordinates: entries.iter().filter(|e| e.has_location()).count(),
        }
    }

    /// A user record together with their contributions, newest last.
    pub fn profile(&self, username: &str) -> Result<Option<(crate::models::User, Vec<Entry>)>> {
        let Some(user) = self.users.get_user_info(username)? else {
            return Ok(None);
        };
        let entries = self
            .entries
            .load_or_empty()
            .into_iter()
            .filter(|e| e.contributor == username)
            .collect();
        Ok(Some((user, entries)))
    }

    /// Administrative reset of the entry collection.
    pub fn clear_entries(&self) -> Result<()> {
        self.entries.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ArchiveService {
        ArchiveService::new(dir.path())
    }

    fn logged_in(svc: &ArchiveService) -> Session {
        svc.register("alice", "alice@x.com", "pw1", "Alice").unwrap();
        svc.login("alice", "pw1").unwrap()
    }

    fn form(title: &str, language: &str) -> SubmissionForm {
        SubmissionForm {
            title: title.to_string(),
            description: format!("{title} description"),
            language: language.to_string(),
            category: "Pest Control".to_string(),
            ..SubmissionForm::default()
        }
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        svc.register("alice", "alice@x.com", "pw1", "Alice").unwrap();

        assert!(svc.login("alice", "pw1").is_ok());
        assert!(matches!(
            svc.login("alice", "wrong").unwrap_err(),
            ArchiveError::AuthenticationFailed
        ));
    }

    #[test]
    fn test_submit_credits_contributor() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);

        let entry = svc.submit(&session, form("Neem spray", "Hindi")).unwrap();
        assert_eq!(entry.id, 1);
        assert_eq!(entry.contributor, "alice");
        assert_eq!(entry.contributor_full_name, "Alice");

        let user = svc.credential_store().get_user_info("alice").unwrap().unwrap();
        assert_eq!(user.entries_submitted, 1);
    }

    #[test]
    fn test_submit_validation() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);

        let mut f = form("", "Hindi");
        assert!(matches!(
            svc.submit(&session, f.clone()).unwrap_err(),
            ArchiveError::MissingField("title")
        ));

        f.title = "ok".to_string();
        f.language = "Klingon".to_string();
        assert!(matches!(
            svc.submit(&session, f.clone()).unwrap_err(),
            ArchiveError::UnknownLanguage(_)
        ));

        f.language = "Hindi".to_string();
        f.latitude = Some(12.0);
        assert!(matches!(
            svc.submit(&session, f.clone()).unwrap_err(),
            ArchiveError::PartialCoordinates
        ));

        f.longitude = Some(200.0);
        assert!(matches!(
            svc.submit(&session, f).unwrap_err(),
            ArchiveError::InvalidCoordinates { .. }
        ));

        // Nothing was persisted and no credit was given
        assert!(svc.entry_store().load().unwrap().is_empty());
        let user = svc.credential_store().get_user_info("alice").unwrap().unwrap();
        assert_eq!(user.entries_submitted, 0);
    }

    #[test]
    fn test_browse_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);

        svc.submit(&session, form("Zinc dosing", "Hindi")).unwrap();
        svc.submit(&session, form("Azolla beds", "English")).unwrap();
        svc.submit(&session, form("Mulching", "Hindi")).unwrap();

        let hindi = svc.browse(
            &EntryFilter {
                language: Some("Hindi".to_string()),
                category: None,
            },
            SortKey::TitleAz,
        );
        assert_eq!(
            hindi.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            vec!["Mulching", "Zinc dosing"]
        );
    }

    #[test]
    fn test_export_respects_flags() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);
        svc.submit(&session, form("Neem spray", "Hindi")).unwrap();
        svc.submit(&session, form("Compost pit", "Hindi")).unwrap();

        let (name, payload) = svc
            .export(ExportFormat::Jsonl, &EntryFilter::default(), true, false)
            .unwrap();
        assert!(name.ends_with(".jsonl"));
        assert_eq!(payload.lines().count(), 2);
        assert!(!payload.contains("latitude"));
        assert!(!payload.contains("longitude"));
    }

    #[test]
    fn test_stats() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);
        svc.submit(&session, form("A", "Hindi")).unwrap();
        svc.submit(&session, form("B", "English")).unwrap();
        let mut f = form("C", "Hindi");
        f.latitude = Some(18.5);
        f.longitude = Some(73.8);
        svc.submit(&session, f).unwrap();

        let stats = svc.stats();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.languages, 2);
        assert_eq!(stats.categories, 1);
        assert_eq!(stats.with_media, 0);
        assert_eq!(stats.with_coordinates, 1);
    }

    #[test]
    fn test_profile_lists_own_entries_only() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let alice = logged_in(&svc);
        svc.register("bob", "bob@x.com", "pw2", "Bob").unwrap();
        let bob = svc.login("bob", "pw2").unwrap();

        svc.submit(&alice, form("Alice tip", "Hindi")).unwrap();
        svc.submit(&bob, form("Bob tip", "English")).unwrap();

        let (user, entries) = svc.profile("alice").unwrap().unwrap();
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Alice tip");

        assert!(svc.profile("ghost").unwrap().is_none());
    }

    #[test]
    fn test_clear_entries_keeps_users() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let session = logged_in(&svc);
        svc.submit(&session, form("A", "Hindi")).unwrap();

        svc.clear_entries().unwrap();
        assert!(svc.entry_store().load().unwrap().is_empty());
        assert!(svc.credential_store().get_user_info("alice").unwrap().is_some());
    }
}
