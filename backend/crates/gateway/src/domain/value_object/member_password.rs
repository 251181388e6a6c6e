//! Member Password Value Object
//!
//! Domain value object for member passwords. Delegates to
//! `platform::password` for the cryptographic work.
//!
//! ## Security Features
//! - Argon2id hashing (memory-hard, tunable work factor)
//! - Automatic memory zeroization of plaintexts
//! - Constant-time comparison
//! - Unicode NFKC normalization

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, WorkFactor,
};
use std::fmt;

use crate::error::{GatewayError, GatewayResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Wrapper around `ClearTextPassword` with gateway error handling.
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with policy validation
    pub fn new(raw: String) -> GatewayResult<Self> {
        let clear_text = ClearTextPassword::new(raw)
            .map_err(|e| GatewayError::PasswordPolicy(e.to_string()))?;

        Ok(Self(clear_text))
    }

    /// Access the inner ClearTextPassword
    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Member Password (Hashed, for storage)
// ============================================================================

/// Hashed member password for database storage
///
/// Stores the digest in Argon2id PHC string format; safe to persist,
/// never reversible to the plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct MemberPassword(HashedPassword);

impl MemberPassword {
    /// Create from raw password by hashing
    ///
    /// ## Arguments
    /// * `raw` - The validated raw password
    /// * `work_factor` - Argon2id cost parameters from configuration
    /// * `pepper` - Optional application-wide secret
    pub fn from_raw(
        raw: &RawPassword,
        work_factor: &WorkFactor,
        pepper: Option<&[u8]>,
    ) -> GatewayResult<Self> {
        let hashed = raw.inner().hash(work_factor, pepper).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                GatewayError::Internal(format!("Password hashing failed: {}", msg))
            }
            PasswordHashError::InvalidWorkFactor(msg) => {
                GatewayError::Internal(format!("Invalid hashing work factor: {}", msg))
            }
            _ => GatewayError::Internal("Unexpected error during password hashing".into()),
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> GatewayResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| GatewayError::Internal("Invalid password hash in database".into()))?;

        Ok(Self(hashed))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this digest
    ///
    /// ## Arguments
    /// * `raw` - The raw password to verify
    /// * `pepper` - Must match the pepper used during hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for MemberPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for MemberPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================
