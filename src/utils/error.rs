//! Error types for EZPlayer
//!
//! This module defines the error type shared by the shell. We use thiserror
//! for the library error type and anyhow only at the binary boundary.

use thiserror::Error;

/// Main error type for EZPlayer
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Playback engine errors (load failures, missing media)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Session persistence errors
    #[error("Session error: {0}")]
    Session(String),

    /// Window-related errors
    #[error("Window error: {0}")]
    Window(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operating system queries (idle time, sleep control)
    #[error("System error: {0}")]
    System(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::Session(format!("Malformed session record: {}", err))
    }
}

impl PlayerError {
    /// Create an engine error from string
    pub fn engine_error<S: Into<String>>(msg: S) -> Self {
        PlayerError::Engine(msg.into())
    }
}

/// Convenience type alias for Results in EZPlayer
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Extension trait for converting other errors to PlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerError with the given context
    fn engine_err(self, context: &str) -> Result<T>;
    fn session_err(self, context: &str) -> Result<T>;
    fn window_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
    fn system_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn engine_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Engine(format!("{}: {}", context, e)))
    }

    fn session_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Session(format!("{}: {}", context, e)))
    }

    fn window_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Window(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Config(format!("{}: {}", context, e)))
    }

    fn system_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::System(format!("{}: {}", context, e)))
    }
}

/// Helper macro for creating internal errors with file and line information
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::utils::error::PlayerError::Internal(
            format!("{} at {}:{}", $msg, file!(), line!())
        )
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::utils::error::PlayerError::Internal(
            format!("{} at {}:{}", format!($fmt, $($arg)*), file!(), line!())
        )
    };
}
