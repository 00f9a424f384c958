/*!
 * Error types for the translatable crate.
 *
 * Missing translations are not errors: read paths return `None`.
 * Only storage failures, bad identifiers and unreadable configuration
 * surface as `TranslatableError`.
 */

use thiserror::Error;

/// Errors raised by the translation layer and its storage collaborator
#[derive(Error, Debug)]
pub enum TranslatableError {
    /// A write failed while saving an entity or one of its translations
    #[error("Failed to persist row in '{table}': {message}")]
    Persistence {
        /// Table the failed write targeted
        table: String,
        /// Underlying storage message
        message: String,
    },

    /// A read from storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A table or column name is not a plain SQL identifier
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// The configuration could not be read or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslatableError {
    /// Build a persistence error for the given table
    pub fn persistence(table: &str, message: impl std::fmt::Display) -> Self {
        Self::Persistence {
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error was raised by a write during save
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

impl From<anyhow::Error> for TranslatableError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", error))
    }
}

impl From<rusqlite::Error> for TranslatableError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<std::io::Error> for TranslatableError {
    fn from(error: std::io::Error) -> Self {
        Self::Config(error.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TranslatableError>;
