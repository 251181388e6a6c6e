//! University Identifier Value Object
//!
//! The campus-issued student/staff number. Unique across all members;
//! uniqueness is enforced by the credential store.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// University-issued identifier (positive integer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversityId(i64);

impl UniversityId {
    /// Create a new university identifier with validation
    pub fn new(id: i64) -> GatewayResult<Self> {
        if id <= 0 {
            return Err(GatewayError::Validation(
                "University ID must be a positive number".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UniversityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
