//! Email Value Object
//!
//! Represents a validated, case-normalized email address. Uniqueness is
//! enforced by the credential store, not here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{GatewayError, GatewayResult};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
///
/// Trimmed and lowercased on construction so that lookups and the
/// store-level unique constraint agree on one canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> GatewayResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(GatewayError::Validation("Email cannot be empty".into()));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(GatewayError::Validation(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(GatewayError::Validation("Invalid email format".into()));
        }

        Ok(Self(email))
    }

    /// Basic structural validation; real verification is out of scope
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || local.contains('@') || domain.contains('@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with('.')
            || domain.ends_with('.')
            || domain.starts_with('-')
            || domain.ends_with('-'))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = GatewayError;

    fn from_str(s: &str) -> GatewayResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("student@university.edu").is_ok());
        assert!(Email::new("Student@University.EDU").is_ok()); // lowercased
        assert!(Email::new("first.last@cs.university.edu").is_ok());
        assert!(Email::new("student+tag@university.edu").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("studentuniversity.edu").is_err());
        assert!(Email::new("student@").is_err());
        assert!(Email::new("@university.edu").is_err());
        assert!(Email::new("student@@university.edu").is_err());
        assert!(Email::new("student@university").is_err());
        assert!(Email::new("student@.university.edu").is_err());
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  Student@University.EDU ").unwrap();
        assert_eq!(email.as_str(), "student@university.edu");
    }

    #[test]
    fn test_normalized_emails_are_equal() {
        let a = Email::new("a@u.edu").unwrap();
        let b = Email::new("A@U.EDU").unwrap();
        assert_eq!(a, b);
    }
}
