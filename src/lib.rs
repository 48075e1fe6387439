/*!
 * # quizterm - terminal quiz application
 *
 * Users register and log in, answer multiple-choice questions grouped by
 * subject, and have their scores recorded in a local SQLite database.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite persistence for users, questions and scores:
 *   - `database::connection`: Owned connection and statistics
 *   - `database::schema`: Idempotent table creation
 *   - `database::repository`: Create/read operations and credential hashing
 *   - `database::models`: Row types and options encoding
 * - `quiz`: Question selection and answer grading
 * - `app_controller`: Interactive session controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod quiz;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, SessionState};
pub use database::{Repository, User, Question, Score};
pub use errors::{QuizError, QuizResult};
pub use quiz::{AnswerOutcome, QuizOutcome};
