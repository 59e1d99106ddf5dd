//! External collaborator contracts: geocoding, translation, detection.
//!
//! The core never retries a collaborator and never lets one fail the
//! operation: every call site goes through a fallback wrapper that warns
//! and substitutes a safe default. Network implementations live outside
//! this crate; the offline [`GlossaryTranslator`] covers the built-in
//! farming-term glossary.

use crate::error::{ArchiveError, Result};
use crate::utils::warning;
use crate::vocab;
use std::future::Future;
use std::time::Duration;

/// A geographic point resolved from a place name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves a free-text place name to coordinates, or "not found".
pub trait Geocoder {
    fn geocode(&self, location: &str) -> Result<Option<Coordinates>>;
}

/// Translates text between supported languages and detects the language
/// of a text.
pub trait Translator {
    fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String>;
    fn detect(&self, text: &str) -> Result<String>;
}

/// Run a collaborator call with a deadline.
pub async fn with_timeout<T, F>(service: &str, duration: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(ArchiveError::ServiceTimeout(service.to_string())),
    }
}

/// Translate, falling back to the original text unchanged on failure.
pub fn translate_or_original(
    translator: &dyn Translator,
    text: &str,
    source: Option<&str>,
    target: &str,
) -> String {
    match translator.translate(text, source, target) {
        Ok(translated) => translated,
        Err(e) => {
            warning(&format!("Translation failed: {e}"));
            text.to_string()
        }
    }
}

/// Detect a language, falling back to "Unknown" on failure.
pub fn detect_or_unknown(translator: &dyn Translator, text: &str) -> String {
    match translator.detect(text) {
        Ok(language) => language,
        Err(e) => {
            warning(&format!("Language detection failed: {e}"));
            "Unknown".to_string()
        }
    }
}

/// Geocode, falling back to "not found" on failure.
pub fn geocode_or_none(geocoder: &dyn Geocoder, location: &str) -> Option<Coordinates> {
    match geocoder.geocode(location) {
        Ok(coords) => coords,
        Err(e) => {
            warning(&format!("Geocoding failed: {e}"));
            None
        }
    }
}

/// Common farming terms, English to Hindi.
const GLOSSARY: &[(&str, &str)] = &[
    ("organic fertilizer", "जैविक उर्वरक"),
    ("crop rotation", "फसल चक्र"),
    ("irrigation", "सिंचाई"),
    ("pest control", "कीट नियंत्रण"),
    ("soil health", "मिट्टी की स्वास्थ्य"),
    ("harvest", "फसल कटाई"),
    ("seeds", "बीज"),
    ("monsoon", "मानसून"),
];

/// Offline translator backed by the farming-term glossary.
///
/// Only exact glossary terms translate; anything else is reported as
/// unavailable so the fallback wrapper returns the original text.
#[derive(Debug, Default)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Translator for GlossaryTranslator {
    fn translate(&self, text: &str, _source: Option<&str>, target: &str) -> Result<String> {
        let code = vocab::translation_code(target).ok_or_else(|| {
            ArchiveError::ServiceUnavailable(format!("no language code for {target}"))
        })?;
        let needle = text.trim().to_lowercase();
        let hit = match code {
            "hi" => GLOSSARY
                .iter()
                .find(|(en, _)| *en == needle)
                .map(|(_, hi)| *hi),
            "en" => GLOSSARY
                .iter()
                .find(|(_, hi)| *hi == text.trim())
                .map(|(en, _)| *en),
            _ => None,
        };
        hit.map(|s| s.to_string()).ok_or_else(|| {
            ArchiveError::ServiceUnavailable(format!("no glossary translation to {target}"))
        })
    }

    fn detect(&self, text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ArchiveError::ServiceUnavailable(
                "empty text".to_string(),
            ));
        }
        // Script detection yields an ISO code; the vocabulary table maps it
        // back to the display name entries carry.
        let code = if trimmed
            .chars()
            .any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
        {
            "hi"
        } else if trimmed.is_ascii() {
            "en"
        } else {
            return Err(ArchiveError::ServiceUnavailable(
                "script not recognized".to_string(),
            ));
        };
        vocab::language_for_code(code)
            .map(str::to_string)
            .ok_or_else(|| ArchiveError::ServiceUnavailable(format!("unmapped code {code}")))
    }
}
