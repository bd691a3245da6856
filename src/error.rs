//! Error types and the readable-error table

use thiserror::Error;

use crate::service::ServiceError;

/// Fallback shown when a service error code has no table entry.
pub const FALLBACK_MESSAGE: &str = "There was a problem with your request.";

/// Translate a machine-readable service error code into its user-facing
/// message. Unknown (or absent) codes resolve to [`FALLBACK_MESSAGE`].
pub fn readable_message(code: Option<&str>) -> &'static str {
    match code {
        Some("INVALID_PASSWORD") => "This is an invalid password",
        Some("EMAIL_NOT_FOUND") => "This email has not been registered",
        Some("EMAIL_EXISTS") => "This email already exists. Try logging in instead.",
        Some("TOO_MANY_ATTEMPTS_TRY_LATER") => "Too many attempts, please try again later",
        Some("USER_DISABLED") => "This account has been disabled by an administrator.",
        _ => FALLBACK_MESSAGE,
    }
}

#[derive(Error, Debug)]
pub enum AccountError {
    /// Account creation was rejected by the external service.
    #[error("{0}")]
    Registration(String),

    /// Sign-in was rejected by the external service.
    #[error("{0}")]
    Login(String),

    /// A profile update was rejected by the external service.
    #[error("{0}")]
    Update(String),

    /// Bad local input, caught before any external call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The profile has no local id yet, so it cannot be addressed.
    #[error("Profile is missing its local id")]
    MissingLocalId,

    /// Auth succeeded but no profile record exists for this user.
    #[error("No profile record found for user {0}")]
    ProfileNotFound(String),

    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(#[from] std::io::Error),

    #[error("Failed to read config file: {0}")]
    ConfigFileError(std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(serde_json::Error),

    /// A service failure outside the translated protocol-error path.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AccountError {
    /// The display-ready message carried by a translated error, if this is one.
    pub fn readable(&self) -> Option<&str> {
        match self {
            AccountError::Registration(msg)
            | AccountError::Login(msg)
            | AccountError::Update(msg) => Some(msg),
            _ => None,
        }
    }
}
