//! Gateway Error Types
//!
//! This module provides gateway-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Outward-facing messages are deliberately coarse: duplicate signups do
//! not reveal which attribute collided, and unknown-email and
//! wrong-password sign-ins are indistinguishable to the caller.

use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gateway-specific result type alias
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway-specific error variants
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller exceeded the admission budget
    #[error("Too many attempts, please slow down")]
    RateLimited { retry_after: Option<Duration> },

    /// Email or university identifier already registered
    #[error("An account with these details already exists")]
    DuplicateIdentity,

    /// Unknown email or wrong password, indistinguishable to the caller
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account was persisted but session issuance failed afterwards
    #[error("Account created, but automatic sign-in failed")]
    SessionError,

    /// Session token missing, malformed, or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Password rejected by policy
    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Request field rejected by validation
    #[error("{0}")]
    Validation(String),

    /// Durable store unreachable; fatal for the current call, never retried
    #[error("Credential store unavailable")]
    StoreUnavailable,

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Classify a sqlx error from the credential store
    ///
    /// Unique-constraint violations become `DuplicateIdentity` (the
    /// store constraint is the authority for uniqueness), connectivity
    /// failures become `StoreUnavailable`, everything else stays a
    /// database error.
    pub fn from_store(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                GatewayError::DuplicateIdentity
            }
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => {
                tracing::error!(error = %err, "Credential store unreachable");
                GatewayError::StoreUnavailable
            }
            _ => GatewayError::Database(err),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::DuplicateIdentity => StatusCode::CONFLICT,
            GatewayError::InvalidCredentials | GatewayError::SessionInvalid => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::PasswordPolicy(_) | GatewayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::SessionError
            | GatewayError::Database(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::RateLimited { .. } => ErrorKind::TooManyRequests,
            GatewayError::DuplicateIdentity => ErrorKind::Conflict,
            GatewayError::InvalidCredentials | GatewayError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            GatewayError::PasswordPolicy(_) | GatewayError::Validation(_) => ErrorKind::BadRequest,
            GatewayError::StoreUnavailable => ErrorKind::ServiceUnavailable,
            GatewayError::SessionError
            | GatewayError::Database(_)
            | GatewayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details never leak into the user-facing message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            GatewayError::Database(_) | GatewayError::Internal(_) => {
                AppError::new(self.kind(), "Something went wrong, please try again")
            }
            GatewayError::DuplicateIdentity => {
                AppError::new(self.kind(), self.to_string()).with_action("Try signing in instead")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    ///
    /// Plaintext passwords and digests never reach these call sites.
    fn log(&self) {
        match self {
            GatewayError::Database(e) => {
                tracing::error!(error = %e, "Gateway database error");
            }
            GatewayError::Internal(msg) => {
                tracing::error!(message = %msg, "Gateway internal error");
            }
            GatewayError::StoreUnavailable => {
                tracing::error!("Credential store unavailable");
            }
            GatewayError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            GatewayError::RateLimited { .. } => {
                tracing::warn!("Rate limit exceeded");
            }
            GatewayError::SessionError => {
                tracing::warn!("Session issuance failed after account creation");
            }
            _ => {
                tracing::debug!(error = %self, "Gateway error");
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.log();

        let mut response = self.to_app_error().into_response();

        // Suggested retry delay for rate-limited callers
        if let GatewayError::RateLimited {
            retry_after: Some(delay),
        } = &self
        {
            let secs = delay.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        GatewayError::from_store(err)
    }
}

impl From<AppError> for GatewayError {
    fn from(err: AppError) -> Self {
        GatewayError::Internal(err.to_string())
    }
}
