/*!
 * Database schema definitions.
 *
 * The schema is created idempotently on every startup; there is no
 * version table.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Names of the tables owned by the application
pub const TABLES: [&str; 3] = ["users", "questions", "scores"];

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Enable foreign keys so scores always reference a user
    conn.execute_batch("PRAGMA foreign_keys=ON;")
        .context("Failed to enable foreign keys")?;

    create_all_tables(conn)?;
    ensure_score_timestamps(conn)?;

    debug!("Database schema ready");
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL
        );
        "#,
    )
    .context("Failed to create users table")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            question TEXT NOT NULL,
            options TEXT NOT NULL,
            answer TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_subject ON questions(subject);
        "#,
    )
    .context("Failed to create questions table")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            subject TEXT NOT NULL,
            score INTEGER NOT NULL,
            taken_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_scores_user ON scores(user_id);
        CREATE INDEX IF NOT EXISTS idx_scores_subject ON scores(subject);
        "#,
    )
    .context("Failed to create scores table")?;

    Ok(())
}

/// Add `scores.taken_at` to databases created before scores were timestamped
fn ensure_score_timestamps(conn: &Connection) -> Result<()> {
    let has_column = conn
        .prepare("SELECT 1 FROM pragma_table_info('scores') WHERE name = 'taken_at'")?
        .exists([])
        .context("Failed to inspect scores table")?;

    if !has_column {
        info!("Adding taken_at column to existing scores table");
        // SQLite only accepts constant defaults in ALTER TABLE ADD COLUMN
        conn.execute_batch("ALTER TABLE scores ADD COLUMN taken_at TEXT NOT NULL DEFAULT '';")
            .context("Failed to add scores.taken_at")?;
    }

    Ok(())
}
