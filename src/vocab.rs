//! Closed vocabularies and language-code tables.

use crate::error::{ArchiveError, Result};

/// Supported entry languages.
pub const LANGUAGES: &[&str] = &[
    "Hindi",
    "English",
    "Bengali",
    "Telugu",
    "Marathi",
    "Tamil",
    "Gujarati",
    "Urdu",
    "Kannada",
    "Malayalam",
    "Oriya",
    "Other",
];

/// Entry categories.
pub const CATEGORIES: &[&str] = &[
    "Seed Selection & Storage",
    "Soil Management",
    "Crop Rotation",
    "Natural Fertilizers",
    "Pest Control",
    "Water Management",
    "Harvest Techniques",
    "Seasonal Farming",
    "Traditional Tools",
    "Weather Prediction",
    "Post-Harvest Processing",
    "Other Farming Practices",
];

/// Validate a language against the closed vocabulary.
pub fn validate_language(language: &str) -> Result<()> {
    if LANGUAGES.contains(&language) {
        Ok(())
    } else {
        Err(ArchiveError::UnknownLanguage(language.to_string()))
    }
}

/// Validate a category against the closed vocabulary.
pub fn validate_category(category: &str) -> Result<()> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ArchiveError::UnknownCategory(category.to_string()))
    }
}

/// ISO 639-1 code for a language name, used by translation collaborators.
pub fn translation_code(language: &str) -> Option<&'static str> {
    let code = match language {
        "Hindi" => "hi",
        "English" => "en",
        "Bengali" => "bn",
        "Telugu" => "te",
        "Marathi" => "mr",
        "Tamil" => "ta",
        "Gujarati" => "gu",
        "Urdu" => "ur",
        "Kannada" => "kn",
        "Malayalam" => "ml",
        "Punjabi" => "pa",
        "Oriya" => "or",
        _ => return None,
    };
    Some(code)
}

/// Language name for an ISO 639-1 code, for display after detection.
pub fn language_for_code(code: &str) -> Option<&'static str> {
    let name = match code {
        "hi" => "Hindi",
        "en" => "English",
        "bn" => "Bengali",
        "te" => "Telugu",
        "mr" => "Marathi",
        "ta" => "Tamil",
        "gu" => "Gujarati",
        "ur" => "Urdu",
        "kn" => "Kannada",
        "ml" => "Malayalam",
        "pa" => "Punjabi",
        "or" => "Oriya",
        _ => return None,
    };
    Some(name)
}

/// Validate latitude/longitude ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(ArchiveError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_are_closed() {
        assert!(validate_language("Hindi").is_ok());
        assert!(validate_language("Klingon").is_err());
        assert!(validate_category("Pest Control").is_ok());
        assert!(validate_category("Astrology").is_err());
        // Exact match, no case folding
        assert!(validate_language("hindi").is_err());
    }

    #[test]
    fn test_translation_codes_round_trip() {
        for lang in LANGUAGES.iter().filter(|&&l| l != "Other") {
            let code = translation_code(lang).unwrap();
            assert_eq!(language_for_code(code), Some(*lang));
        }
        assert_eq!(translation_code("Other"), None);
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
    }
}
