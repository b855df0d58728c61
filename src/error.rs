//! Error taxonomy shared by the gate, record client, and export pipeline.
//!
//! DESIGN
//! ======
//! Each concern owns a `thiserror` enum. Validation problems are caught before
//! any backend call; backend failures carry enough detail for logs but are
//! shown to users as generic messages by the `tracker` facade.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured logging.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Local input problems. These block submission and never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required visitor field is empty. Carries the form's message.
    #[error("{0}")]
    MissingField(&'static str),

    /// The admin password was empty after trimming.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// The new admin password was empty after trimming.
    #[error("New password cannot be empty")]
    EmptyNewPassword,

    /// The new password and its confirmation differ.
    #[error("New password and confirmation do not match")]
    PasswordMismatch,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "E_MISSING_FIELD",
            Self::EmptyPassword => "E_EMPTY_PASSWORD",
            Self::EmptyNewPassword => "E_EMPTY_NEW_PASSWORD",
            Self::PasswordMismatch => "E_PASSWORD_MISMATCH",
        }
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// Failure calling the backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No backend handle is available (not yet connected, offline).
    #[error("backend unavailable")]
    Unavailable,

    /// The request failed in transit.
    #[error("backend transport failed: {0}")]
    Transport(String),

    /// The backend did not answer in time.
    #[error("backend call timed out")]
    Timeout,

    /// The backend refused the call (e.g. caller lacks privileges).
    #[error("backend rejected call: {0}")]
    Rejected(String),
}

impl ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable => "E_BACKEND_UNAVAILABLE",
            Self::Transport(_) => "E_BACKEND_TRANSPORT",
            Self::Timeout => "E_BACKEND_TIMEOUT",
            Self::Rejected(_) => "E_BACKEND_REJECTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable | Self::Transport(_) | Self::Timeout)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// An environment value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        "E_CONFIG_PARSE"
    }
}
