/*!
 * Tests for the repository against database files on disk
 */

use crate::common;
use quizterm::database::{DatabaseConnection, Repository};

/// Data written through one connection is visible after reopening the file
#[test]
fn test_reopen_shouldKeepUsersAndScores() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("quiz.db");

    let user_id = {
        let repo = Repository::new(DatabaseConnection::new(&path).unwrap());
        let user = repo.create_user("alice", "pw1").unwrap();
        repo.record_score(user.id, "C++", 2).unwrap();
        user.id
    };

    let repo = Repository::new(DatabaseConnection::new(&path).unwrap());
    let user = repo.authenticate_user("alice", "pw1").unwrap().expect("user should persist");
    assert_eq!(user.id, user_id);
    assert_eq!(repo.scores_for_user(user_id).unwrap().len(), 1);
    assert!(repo.create_user("alice", "pw1").unwrap_err().is_duplicate_username());
}

/// Questions are fetched by exact subject name
#[test]
fn test_fetchQuestions_shouldMatchSubjectExactly() {
    let repo = common::repository_with_questions(&["Python", "DSA"], 3).unwrap();

    assert_eq!(repo.fetch_questions("Python").unwrap().len(), 3);
    assert!(repo.fetch_questions("python").unwrap().is_empty());
    let subjects = repo.list_subjects().unwrap();
    let names: Vec<&str> = subjects.iter().map(|s| s.subject.as_str()).collect();
    assert_eq!(names, vec!["DSA", "Python"]);
    assert!(subjects.iter().all(|s| s.question_count == 3));
}

/// Options containing commas survive storage
#[test]
fn test_insertQuestion_withCommaInOption_shouldRoundTrip() {
    let repo = Repository::new_in_memory().unwrap();
    repo.insert_question(&common::question(
        "Python",
        "Which creates a tuple?",
        &["(1, 2)", "[1, 2]", "{1, 2}"],
    ))
    .unwrap();

    let questions = repo.fetch_questions("Python").unwrap();
    let stored = &questions[0];

    assert_eq!(stored.options, vec!["(1, 2)", "[1, 2]", "{1, 2}"]);
    assert_eq!(stored.check_selection(1), Some(true));
}
