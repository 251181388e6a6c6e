//! Full Name Value Object

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Maximum full name length
const FULL_NAME_MAX_LENGTH: usize = 100;

/// Registrant's full name (non-empty, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName(String);

impl FullName {
    /// Create a new full name with validation
    pub fn new(name: impl Into<String>) -> GatewayResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(GatewayError::Validation("Full name cannot be empty".into()));
        }

        if name.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(GatewayError::Validation(format!(
                "Full name must be at most {} characters",
                FULL_NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
