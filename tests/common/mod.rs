/*!
 * Common test utilities for the quizterm test suite
 */

use anyhow::Result;
use quizterm::database::{NewQuestion, Repository};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a question whose first option is the answer
pub fn question(subject: &str, text: &str, options: &[&str]) -> NewQuestion {
    NewQuestion {
        subject: subject.to_string(),
        question: text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        answer: options[0].to_string(),
    }
}

/// In-memory repository holding `per_subject` questions for each subject
pub fn repository_with_questions(subjects: &[&str], per_subject: usize) -> Result<Repository> {
    let repo = Repository::new_in_memory()?;
    let mut batch = Vec::new();
    for subject in subjects {
        for i in 1..=per_subject {
            batch.push(question(
                subject,
                &format!("{} question {}", subject, i),
                &["correct", "incorrect", "unsure", "none"],
            ));
        }
    }
    repo.import_questions(&batch)?;
    Ok(repo)
}
