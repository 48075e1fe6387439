/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::{debug, info};
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::connection::{DatabaseConnection, DatabaseStats};
use super::models::{
    decode_options, encode_options, LeaderboardEntry, NewQuestion, Question, Score,
    SubjectSummary, User,
};
use crate::errors::{QuizError, QuizResult};

/// Number of random salt bytes prepended to each password digest
const SALT_LEN: usize = 16;

/// Separator between salt and digest in the stored credential
const CREDENTIAL_SEPARATOR: char = '$';

/// Length of a hex-encoded SHA-256 digest
const DIGEST_HEX_LEN: usize = 64;

/// Repository for database operations
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Row counts for every table
    pub fn stats(&self) -> QuizResult<DatabaseStats> {
        self.db.stats()
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Register a new user.
    ///
    /// Fails with `QuizError::DuplicateUsername` when the name is taken.
    pub fn create_user(&self, username: &str, password: &str) -> QuizResult<User> {
        let credential = hash_password(password);

        let inserted = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                params![username, credential],
            )?;
            Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
        });

        match inserted {
            Ok(id) => {
                info!("Registered user '{}' (id {})", username, id);
                Ok(User {
                    id,
                    username: username.to_string(),
                })
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                debug!("Rejected duplicate username '{}'", username);
                Err(QuizError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user whose username and password both match
    pub fn authenticate_user(&self, username: &str, password: &str) -> QuizResult<Option<User>> {
        let row = self.db.execute(|conn| {
            conn.query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok((
                        User {
                            id: row.get(0)?,
                            username: row.get(1)?,
                        },
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
        })?;

        let Some((user, stored)) = row else {
            return Ok(None);
        };
        if !verify_password(password, &stored) {
            return Ok(None);
        }

        if !is_hashed_credential(&stored) {
            // Plaintext rows from older databases are upgraded on first login
            let credential = hash_password(password);
            self.db.execute(|conn| {
                conn.execute(
                    "UPDATE users SET password = ?1 WHERE id = ?2",
                    params![credential, user.id],
                )
            })?;
            info!("Upgraded stored password of '{}' to a salted digest", user.username);
        }

        Ok(Some(user))
    }

    /// Number of registered users
    pub fn count_users(&self) -> QuizResult<i64> {
        Ok(self.db.stats()?.user_count)
    }

    // =========================================================================
    // Question Operations
    // =========================================================================

    /// All questions stored for `subject`, in unspecified order
    pub fn fetch_questions(&self, subject: &str) -> QuizResult<Vec<Question>> {
        let questions = self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, subject, question, options, answer FROM questions WHERE subject = ?1",
            )?;
            let rows = stmt.query_map([subject], question_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;

        debug!("Fetched {} question(s) for '{}'", questions.len(), subject);
        Ok(questions)
    }

    /// Store a new question
    pub fn insert_question(&self, question: &NewQuestion) -> QuizResult<Question> {
        question.validate().map_err(QuizError::InvalidQuestion)?;
        let options = encode_options(&question.options)?;

        let id = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO questions (subject, question, options, answer) VALUES (?1, ?2, ?3, ?4)",
                params![question.subject, question.question, options, question.answer],
            )?;
            Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
        })?;

        Ok(Question {
            id,
            subject: question.subject.clone(),
            question: question.question.clone(),
            options: question.options.clone(),
            answer: question.answer.clone(),
        })
    }

    /// Store a batch of questions atomically; returns how many were inserted
    pub fn import_questions(&self, questions: &[NewQuestion]) -> QuizResult<usize> {
        for question in questions {
            question.validate().map_err(QuizError::InvalidQuestion)?;
        }

        let count = self.db.transaction(|tx| {
            let mut stmt = tx.prepare(
                "INSERT INTO questions (subject, question, options, answer) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for q in questions {
                let options = encode_options(&q.options)?;
                stmt.execute(params![q.subject, q.question, options, q.answer])?;
            }
            Ok(questions.len())
        })?;

        info!("Imported {} question(s)", count);
        Ok(count)
    }

    /// Subjects that have at least one question, with their question counts
    pub fn list_subjects(&self) -> QuizResult<Vec<SubjectSummary>> {
        let subjects = self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT subject, COUNT(*) FROM questions GROUP BY subject ORDER BY subject",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(SubjectSummary {
                    subject: row.get(0)?,
                    question_count: row.get(1)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(subjects)
    }

    // =========================================================================
    // Score Operations
    // =========================================================================

    /// Record the result of a completed quiz
    pub fn record_score(&self, user_id: i64, subject: &str, score: i64) -> QuizResult<Score> {
        let taken_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        let id = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO scores (user_id, subject, score, taken_at) VALUES (?1, ?2, ?3, ?4)",
                params![user_id, subject, score, taken_at],
            )?;
            Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
        })?;

        let recorded = Score {
            id,
            user_id,
            subject: subject.to_string(),
            score,
            taken_at,
        };

        info!(
            "Recorded score {} for user {} in '{}'",
            recorded.score, recorded.user_id, recorded.subject
        );
        Ok(recorded)
    }

    /// Scores of one user, newest first
    pub fn scores_for_user(&self, user_id: i64) -> QuizResult<Vec<Score>> {
        let scores = self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, user_id, subject, score, taken_at
                FROM scores WHERE user_id = ?1
                ORDER BY taken_at DESC, id DESC
                "#,
            )?;
            let rows = stmt.query_map([user_id], score_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(scores)
    }

    /// Best score per user, optionally restricted to one subject
    pub fn leaderboard(&self, subject: Option<&str>, limit: usize) -> QuizResult<Vec<LeaderboardEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let entries = self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT u.username, MAX(s.score) AS best, COUNT(*) AS attempts
                FROM scores s
                JOIN users u ON u.id = s.user_id
                WHERE ?1 IS NULL OR s.subject = ?1
                GROUP BY u.id
                ORDER BY best DESC, u.username ASC
                LIMIT ?2
                "#,
            )?;
            let rows = stmt.query_map(params![subject, limit], |row| {
                Ok(LeaderboardEntry {
                    username: row.get(0)?,
                    best_score: row.get(1)?,
                    attempts: row.get(2)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(entries)
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        subject: row.get(1)?,
        question: row.get(2)?,
        options: decode_options(&row.get::<_, String>(3)?),
        answer: row.get(4)?,
    })
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<Score> {
    Ok(Score {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        score: row.get(3)?,
        taken_at: row.get(4)?,
    })
}

// =========================================================================
// Credentials
// =========================================================================

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn digest(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Produce the stored credential `<salt>$<sha256(salt || password)>`
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let salt_hex = to_hex(&salt);
    let hash = digest(&salt_hex, password);
    format!("{}{}{}", salt_hex, CREDENTIAL_SEPARATOR, hash)
}

/// Whether `stored` has the `<32 hex>$<64 hex>` shape written by `hash_password`
pub fn is_hashed_credential(stored: &str) -> bool {
    let is_hex = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit());

    match stored.split_once(CREDENTIAL_SEPARATOR) {
        Some((salt_hex, hash)) => is_hex(salt_hex, SALT_LEN * 2) && is_hex(hash, DIGEST_HEX_LEN),
        None => false,
    }
}

/// Check a password against a stored credential.
///
/// Anything that is not a salted digest is a legacy plaintext password
/// and must match exactly.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(CREDENTIAL_SEPARATOR) {
        Some((salt_hex, expected)) if is_hashed_credential(stored) => {
            digest(salt_hex, password) == expected
        }
        _ => stored == password,
    }
}
