/*!
 * Quiz engine: question selection and answer grading.
 *
 * Nothing here touches the terminal or the database; the session
 * controller feeds it stored questions and raw user input.
 */

use rand::seq::SliceRandom;
use rand::Rng;

use crate::database::Question;

/// Result of grading one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The selected option matches the stored answer
    Correct,
    /// A valid option was selected but it is not the answer
    Wrong,
    /// Input was not a number or named no option
    Skipped,
}

/// Summary of one quiz attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub subject: String,
    /// Ids of the questions shown, in presentation order
    pub presented: Vec<i64>,
    pub score: i64,
    /// Id of the stored score row; `None` when no questions were available
    /// or input ended before the quiz finished
    pub score_id: Option<i64>,
}

impl QuizOutcome {
    /// Outcome of a quiz that could not start
    pub fn empty(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            presented: Vec::new(),
            score: 0,
            score_id: None,
        }
    }
}

/// Shuffle `questions` and keep at most `count` of them
pub fn select_questions<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    questions.shuffle(rng);
    questions.truncate(count);
    questions
}

/// Parse a 1-based menu or answer selection
pub fn parse_selection(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}

/// Grade raw user input against a question
pub fn grade(question: &Question, input: &str) -> AnswerOutcome {
    match parse_selection(input).and_then(|n| question.check_selection(n)) {
        Some(true) => AnswerOutcome::Correct,
        Some(false) => AnswerOutcome::Wrong,
        None => AnswerOutcome::Skipped,
    }
}
