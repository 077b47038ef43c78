//! User Name Value Object
//!
//! The user name is the login handle and the subject of every issued token.
//!
//! ## Rules
//! - NFKC normalization, then surrounding whitespace is trimmed
//! - 1..=64 characters after normalization
//! - No whitespace or control characters inside
//! - Case is preserved and significant: `Alice` and `alice` are different users

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// User name contains whitespace in the middle
    ContainsWhitespace,

    /// User name contains a control character
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username is required"),
            Self::TooLong { length, max } => {
                write!(f, "Username is too long ({length} chars, maximum {max})")
            }
            Self::ContainsWhitespace => write!(f, "Username cannot contain whitespace"),
            Self::InvalidCharacter { char, position } => write!(
                f,
                "Invalid character {:?} at position {position}",
                char
            ),
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Create a new UserName from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized = input.as_ref().nfkc().collect::<String>().trim().to_string();
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Create from a database value (validated when it was registered)
    pub fn from_db(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(normalized: &str) -> Result<(), UserNameError> {
        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = normalized.chars().count();
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for (position, ch) in normalized.chars().enumerate() {
            if ch.is_whitespace() {
                return Err(UserNameError::ContainsWhitespace);
            }
            if ch.is_control() {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        assert_eq!(UserName::new("alice").unwrap().as_str(), "alice");
        assert_eq!(UserName::new("bob_42").unwrap().as_str(), "bob_42");
        assert_eq!(UserName::new("x").unwrap().as_str(), "x");
        assert_eq!(UserName::new("josé").unwrap().as_str(), "josé");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(UserName::new("  alice \n").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth "ａｌｉｃｅ" normalizes to ASCII
        assert_eq!(
            UserName::new("\u{FF41}\u{FF4C}\u{FF49}\u{FF43}\u{FF45}")
                .unwrap()
                .as_str(),
            "alice"
        );
    }

    #[test]
    fn test_case_is_preserved() {
        let upper = UserName::new("Alice").unwrap();
        let lower = UserName::new("alice").unwrap();
        assert_eq!(upper.as_str(), "Alice");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_empty() {
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
        assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(USER_NAME_MAX_LENGTH + 1);
        assert!(matches!(
            UserName::new(long),
            Err(UserNameError::TooLong { .. })
        ));
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_inner_whitespace() {
        assert_eq!(
            UserName::new("alice smith"),
            Err(UserNameError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_control_character() {
        assert!(matches!(
            UserName::new("ali\u{0000}ce"),
            Err(UserNameError::InvalidCharacter { position: 3, .. })
        ));
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"carol\"").unwrap();
        assert_eq!(name.as_str(), "carol");
        assert!(serde_json::from_str::<UserName>("\"\"").is_err());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(UserNameError::Empty.to_string(), "Username is required");
    }
}
