//! Application Layer
//!
//! Use cases and application services.

pub mod admission;
pub mod check_session;
pub mod config;
pub mod issue_session;
pub mod session_token;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::GatewayConfig;
pub use issue_session::{IssuedSession, SessionIssuer};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SessionOutcome, SignUpInput, SignUpOutput, SignUpUseCase};
