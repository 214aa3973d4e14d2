//! Error types for TinderMate
//!
//! Errors are grouped per concern. None of the errors raised while
//! bootstrapping credentials is fatal: the state machine folds every one of
//! them into a screen transition plus a user-visible notification. Only
//! configuration and terminal errors can end the process.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Credential persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The credential file exists but could not be read
    #[error("Failed to read credentials from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not a valid credential record
    #[error("Credential file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The credential record could not be written to its temporary file
    #[error("Failed to write credentials to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be moved over the credential file
    #[error("Failed to replace credential file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credential record could not be encoded
    #[error("Failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error happened while reading (as opposed to writing)
    pub fn is_read_error(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Corrupt { .. })
    }
}

/// Transport-level failures while contacting a service.
///
/// These are never a verdict on the credentials themselves: a token that
/// could not be checked is "unknown", not "invalid".
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The service did not answer within the configured timeout
    #[error("{service} did not respond within {} seconds", .timeout.as_secs())]
    Timeout { service: String, timeout: Duration },

    /// HTTP request failed before a response was received
    #[error("Could not reach {service}: {source}")]
    Http {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a status that says nothing about the token
    #[error("{service} is unavailable right now (HTTP {status})")]
    UnexpectedStatus { service: String, status: u16 },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ValidationError {
    /// Name of the service involved, if any
    pub fn service(&self) -> Option<&str> {
        match self {
            ValidationError::Timeout { service, .. }
            | ValidationError::Http { service, .. }
            | ValidationError::UnexpectedStatus { service, .. } => Some(service),
            ValidationError::Client(_) => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read or written
    #[error("Configuration file I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No usable per-user config directory
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Terminal UI errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal setup, drawing or teardown failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Keyboard input stream ended while the UI was running
    #[error("Terminal input stream closed")]
    InputClosed,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Credential storage error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Credential validation transport error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal UI error
    #[error(transparent)]
    Tui(#[from] TuiError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient or degradable)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Store(_) => true,
            AppError::Validation(ValidationError::Client(_)) => false,
            AppError::Validation(_) => true,
            AppError::Config(_) | AppError::Tui(_) => false,
            _ => false,
        }
    }

    /// Advice printed under a recoverable error
    pub fn recovery_hint(&self) -> Option<&'static str> {
        if !self.is_recoverable() {
            return None;
        }
        match self {
            AppError::Store(_) => Some("Run 'tindermate auth setup' to store the tokens again"),
            AppError::Validation(_) => {
                Some("The services could not be reached, try again in a moment")
            }
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Store(_) => "storage",
            AppError::Validation(_) => "validation",
            AppError::Config(_) => "config",
            AppError::Tui(_) => "terminal",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Credential storage result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
