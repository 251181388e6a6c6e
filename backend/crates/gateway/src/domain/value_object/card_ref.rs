//! University Card Reference Value Object
//!
//! Opaque reference (URL or path) to the uploaded identity-document
//! asset. Produced by an external upload pipeline; the gateway stores
//! and forwards it verbatim and never inspects its content.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Maximum reference length (generous URL bound)
const CARD_REF_MAX_LENGTH: usize = 2048;

/// Opaque identity-document reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef(String);

impl CardRef {
    /// Create a new card reference
    ///
    /// Only presence and length are checked; content validation is the
    /// upload pipeline's concern.
    pub fn new(reference: impl Into<String>) -> GatewayResult<Self> {
        let reference = reference.into();

        if reference.trim().is_empty() {
            return Err(GatewayError::Validation(
                "University card reference cannot be empty".into(),
            ));
        }

        if reference.len() > CARD_REF_MAX_LENGTH {
            return Err(GatewayError::Validation(format!(
                "University card reference must be at most {} characters",
                CARD_REF_MAX_LENGTH
            )));
        }

        Ok(Self(reference))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
