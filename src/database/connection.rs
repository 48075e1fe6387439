/*!
 * Database connection management.
 *
 * A single SQLite connection is opened per process run and owned by
 * `DatabaseConnection`; every repository call borrows it.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::schema;
use crate::errors::QuizResult;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "quizterm.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "quizterm";

const IN_MEMORY_PATH: &str = ":memory:";

/// Owned database connection with its file location
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    connection: Connection,
}

impl DatabaseConnection {
    /// Create a new database connection at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: conn,
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            connection: conn,
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection
    pub fn execute<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
    {
        f(&self.connection)
    }

    /// Run operations inside a transaction, committing only if all succeed
    pub fn transaction<F, T>(&self, f: F) -> QuizResult<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> QuizResult<T>,
    {
        let tx = self.connection.unchecked_transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }

    /// Get database statistics
    pub fn stats(&self) -> QuizResult<DatabaseStats> {
        self.execute(|conn| {
            let count = |table: &str| -> QuizResult<i64> {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?)
            };

            let file_size = if self.db_path.to_string_lossy() != IN_MEMORY_PATH {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            } else {
                0
            };

            Ok(DatabaseStats {
                user_count: count("users")?,
                question_count: count("questions")?,
                score_count: count("scores")?,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of registered users
    pub user_count: i64,
    /// Number of stored questions
    pub question_count: i64,
    /// Number of recorded quiz scores
    pub score_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Users: {}, Questions: {}, Scores: {}, Size: {} KB",
            self.user_count,
            self.question_count,
            self.score_count,
            self.file_size_bytes / 1024
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newInMemory_shouldCreateValidConnection() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create in-memory DB");
        assert_eq!(db.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_execute_shouldRunOperation() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let result: rusqlite::Result<i64> =
            db.execute(|conn| conn.query_row("SELECT 1 + 1", [], |row| row.get(0)));

        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_transaction_shouldRollbackOnError() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let result: QuizResult<()> = db.transaction(|tx| {
            tx.execute("INSERT INTO users (username, password) VALUES ('tx', 'p')", [])?;
            Err(crate::errors::QuizError::InvalidQuestion("abort".to_string()))
        });
        assert!(result.is_err());

        let stats = db.stats().unwrap();
        assert_eq!(stats.user_count, 0);
    }

    #[test]
    fn test_stats_shouldReturnZeroCountsForFreshDatabase() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let stats = db.stats().expect("Failed to get stats");

        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.question_count, 0);
        assert_eq!(stats.score_count, 0);
        assert_eq!(stats.file_size_bytes, 0);
    }

    #[test]
    fn test_new_withFilePath_shouldCreateParentDirectory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.db");

        let db = DatabaseConnection::new(&path).expect("Failed to open file DB");

        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }
}
