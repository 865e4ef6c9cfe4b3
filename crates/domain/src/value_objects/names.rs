//! Validated name newtypes for hierarchy nodes and translations
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace
//!
//! Codes (`Locale`, `LevelKind`) are additionally normalized to lowercase so
//! that `"FR"` and `"fr"` address the same translation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for display names (DisplayName)
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for identifier-like codes (LevelKind, AttributeName)
const MAX_CODE_LENGTH: usize = 64;

/// BCP 47 tags are capped at 35 characters in practice
const MAX_LOCALE_LENGTH: usize = 35;

/// Locale used when nothing else is configured
const DEFAULT_LOCALE: &str = "en";

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

// ============================================================================
// DisplayName
// ============================================================================

/// A validated display label for nodes and points of interest (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new validated display name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> String {
        name.0
    }
}

// ============================================================================
// LevelKind
// ============================================================================

/// The semantic level a node occupies (`country`, `region`, `department`...).
///
/// Different subtrees may use different sets of kinds; nothing ties a kind to
/// a depth.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelKind(String);

impl LevelKind {
    /// Create a new validated level kind, normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the kind is empty, longer than 64
    /// characters, or contains anything besides ASCII letters, digits, `_`, `-`.
    pub fn new(kind: impl Into<String>) -> Result<Self, DomainError> {
        let kind = kind.into();
        let trimmed = kind.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Level kind cannot be empty"));
        }
        if trimmed.len() > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Level kind cannot exceed {} characters",
                MAX_CODE_LENGTH
            )));
        }
        if !trimmed.chars().all(is_code_char) {
            return Err(DomainError::validation(format!(
                "Level kind contains invalid characters: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LevelKind {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LevelKind> for String {
    fn from(kind: LevelKind) -> String {
        kind.0
    }
}

// ============================================================================
// Locale
// ============================================================================

/// A locale code such as `en`, `fr` or `pt-br`.
///
/// Stored lowercase with `_` folded to `-`, so `pt_BR` and `pt-br` are the
/// same locale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Create a new validated locale code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The code is empty after trimming
    /// - The code exceeds 35 characters
    /// - The code does not start with an ASCII letter
    /// - The code contains characters other than ASCII letters, digits, `-`, `_`
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Locale cannot be empty"));
        }
        if trimmed.len() > MAX_LOCALE_LENGTH {
            return Err(DomainError::validation(format!(
                "Locale cannot exceed {} characters",
                MAX_LOCALE_LENGTH
            )));
        }
        if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "Locale must start with a letter: {}",
                trimmed
            )));
        }
        if !trimmed.chars().all(is_code_char) {
            return Err(DomainError::validation(format!(
                "Locale contains invalid characters: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase().replace('_', "-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (`pt` for `pt-br`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Locale {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> String {
        locale.0
    }
}

// ============================================================================
// AttributeName
// ============================================================================

/// The name of a translated attribute (`title`, `meta_description`...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeName(String);

impl AttributeName {
    /// Create a new validated attribute name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty, longer than 64
    /// characters, or contains anything besides ASCII letters, digits, `_`, `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Attribute name cannot be empty"));
        }
        if trimmed.len() > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Attribute name cannot exceed {} characters",
                MAX_CODE_LENGTH
            )));
        }
        if !trimmed.chars().all(is_code_char) {
            return Err(DomainError::validation(format!(
                "Attribute name contains invalid characters: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AttributeName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AttributeName> for String {
    fn from(name: AttributeName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod display_name {
        use super::*;

        #[test]
        fn trims_whitespace() {
            let name = DisplayName::new("  Rhône-Alpes  ").unwrap();
            assert_eq!(name.as_str(), "Rhône-Alpes");
        }

        #[test]
        fn rejects_empty() {
            assert!(DisplayName::new("   ").is_err());
        }

        #[test]
        fn counts_characters_not_bytes() {
            let accented = "é".repeat(MAX_NAME_LENGTH);
            assert!(DisplayName::new(accented).is_ok());
            assert!(DisplayName::new("é".repeat(MAX_NAME_LENGTH + 1)).is_err());
        }

        #[test]
        fn deserialization_validates() {
            let err = serde_json::from_str::<DisplayName>("\"\"");
            assert!(err.is_err());
            let ok: DisplayName = serde_json::from_str("\"Savoie\"").unwrap();
            assert_eq!(ok.as_str(), "Savoie");
        }
    }

    mod locale {
        use super::*;

        #[test]
        fn normalizes_case_and_separator() {
            let locale = Locale::new("pt_BR").unwrap();
            assert_eq!(locale.as_str(), "pt-br");
            assert_eq!(locale, Locale::new("PT-br").unwrap());
        }

        #[test]
        fn default_is_english() {
            assert_eq!(Locale::default(), Locale::new("EN").unwrap());
        }

        #[test]
        fn language_subtag() {
            assert_eq!(Locale::new("fr-CA").unwrap().language(), "fr");
            assert_eq!(Locale::new("en").unwrap().language(), "en");
        }

        #[test]
        fn rejects_bad_codes() {
            assert!(Locale::new("").is_err());
            assert!(Locale::new("1fr").is_err());
            assert!(Locale::new("fr ca").is_err());
            assert!(Locale::new("x".repeat(MAX_LOCALE_LENGTH + 1)).is_err());
        }
    }

    mod attribute_name {
        use super::*;

        #[test]
        fn accepts_snake_case() {
            let attr = AttributeName::new("meta_description").unwrap();
            assert_eq!(attr.to_string(), "meta_description");
        }

        #[test]
        fn rejects_spaces() {
            assert!(AttributeName::new("meta description").is_err());
        }
    }

    mod level_kind {
        use super::*;

        #[test]
        fn lowercases() {
            assert_eq!(LevelKind::new("Country").unwrap().as_str(), "country");
        }

        #[test]
        fn rejects_empty() {
            assert!(LevelKind::new("").is_err());
        }
    }
}
