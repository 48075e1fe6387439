/*!
 * End-to-end tests driving the interactive session with scripted input
 */

use crate::common;
use quizterm::database::Repository;
use quizterm::{Config, Controller};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;

fn run_session(repo: &Repository, script: &str) -> String {
    let mut controller = Controller::new(
        repo,
        Config::default(),
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
        StdRng::seed_from_u64(2024),
    );
    controller.run().expect("Session should not fail");
    String::from_utf8(controller.into_output()).unwrap()
}

/// Register, fail a login, log in, score 3/3 and stop
#[test]
fn test_session_aliceScenario_shouldRecordFullScore() {
    let repo = common::repository_with_questions(&["Python"], 3).unwrap();

    let output = run_session(
        &repo,
        "1\nalice\npw1\n2\nalice\nwrong\n2\nalice\npw1\n2\n1\n1\n1\nno\n",
    );

    assert!(output.contains("User registration successful!"));
    assert!(output.contains("Invalid username or password!"));
    assert!(output.contains("Login successful!"));
    assert_eq!(output.matches("Correct!").count(), 3);
    assert!(output.contains("Your score is 3/3."));

    let alice = repo.authenticate_user("alice", "pw1").unwrap().unwrap();
    let scores = repo.scores_for_user(alice.id).unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].score, 3);
    assert_eq!(scores[0].subject, "Python");
}

/// An empty subject writes no score and still offers another quiz
#[test]
fn test_session_withEmptySubject_shouldOfferAnotherQuiz() {
    let repo = common::repository_with_questions(&["Python"], 2).unwrap();
    repo.create_user("bob", "pw").unwrap();

    let output = run_session(&repo, "2\nbob\npw\n1\nYES\n3\nno\n");

    assert!(output.contains("No questions available for C++."));
    assert!(output.contains("No questions available for DSA."));
    assert_eq!(output.matches("Do you want to take another quiz?").count(), 2);
    assert_eq!(repo.stats().unwrap().score_count, 0);
}

/// Two quizzes in a row record two scores
#[test]
fn test_session_playAgain_shouldRecordEachQuiz() {
    let repo = common::repository_with_questions(&["DSA"], 8).unwrap();
    repo.create_user("carol", "pw").unwrap();

    let output = run_session(
        &repo,
        "2\ncarol\npw\n3\n1\n1\n2\n2\n9\nyes\n3\n1\n1\n1\n1\n1\nno\n",
    );

    assert!(output.contains("Your score is 2/5."));
    assert!(output.contains("Your score is 5/5."));
    assert_eq!(output.matches("Q5:").count(), 2);
    assert!(!output.contains("Q6:"));

    let board = repo.leaderboard(Some("DSA"), 10).unwrap();
    assert_eq!(board[0].username, "carol");
    assert_eq!(board[0].best_score, 5);
    assert_eq!(board[0].attempts, 2);
}
