/*!
 * Database module for persistent storage of users, questions and scores.
 *
 * This module provides SQLite-based persistence for:
 * - Registered users with salted password digests
 * - Multiple-choice questions grouped by subject
 * - Scores of completed quiz sessions
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{LeaderboardEntry, NewQuestion, Question, Score, SubjectSummary, User};
pub use repository::Repository;
