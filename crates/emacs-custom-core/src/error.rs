//! Application error types with rich context

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Emacs Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Emacs not found: '{program}'. Ensure it is in your PATH or set [emacs] program.")]
    EmacsNotFound { program: String },

    #[error("Failed to spawn Emacs process: {reason}")]
    ProcessSpawn { reason: String },

    #[error("{}", emacs_failed_message(.returncode))]
    EmacsFailed {
        returncode: Option<i32>,
        stderr: String,
        command: Vec<String>,
    },

    #[error("emacs did not finish within {limit:?}")]
    Timeout { limit: Duration, command: Vec<String> },

    // ─────────────────────────────────────────────────────────────
    // Configuration / Invocation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

fn emacs_failed_message(returncode: &Option<i32>) -> String {
    match returncode {
        Some(code) => format!("emacs failed with exit code {}", code),
        None => "emacs failed (terminated by signal)".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn emacs_not_found(program: impl Into<String>) -> Self {
        Self::EmacsNotFound {
            program: program.into(),
        }
    }

    pub fn process_spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn emacs_failed(
        returncode: Option<i32>,
        stderr: impl Into<String>,
        command: Vec<String>,
    ) -> Self {
        Self::EmacsFailed {
            returncode,
            stderr: stderr.into(),
            command,
        }
    }

    pub fn timeout(limit: Duration, command: Vec<String>) -> Self {
        Self::Timeout { limit, command }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Exit status of the failed Emacs process, if this error carries one
    pub fn emacs_returncode(&self) -> Option<i32> {
        match self {
            Error::EmacsFailed { returncode, .. } => *returncode,
            _ => None,
        }
    }

    /// Captured stderr of the failed Emacs process
    pub fn emacs_stderr(&self) -> Option<&str> {
        match self {
            Error::EmacsFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Full command line of the failed Emacs process
    pub fn emacs_command(&self) -> Option<&[String]> {
        match self {
            Error::EmacsFailed { command, .. } | Error::Timeout { command, .. } => Some(command),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
