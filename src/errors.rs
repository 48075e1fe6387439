/*!
 * Error types for the quizterm application.
 *
 * Domain failures the session controller knows how to report are modelled
 * here with thiserror; startup plumbing uses anyhow on top of these.
 */

use thiserror::Error;

/// Errors raised by the persistence layer and the quiz workflow
#[derive(Error, Debug)]
pub enum QuizError {
    /// Registration attempted with a username that is already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// A question that cannot be stored or played
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// Error reported by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error encoding or decoding JSON data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reading or writing the terminal or a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Whether this error is the recoverable duplicate-username conflict
    pub fn is_duplicate_username(&self) -> bool {
        matches!(self, QuizError::DuplicateUsername(_))
    }
}

/// Result alias for quiz operations
pub type QuizResult<T> = std::result::Result<T, QuizError>;
