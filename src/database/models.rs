/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// Delimiter used by rows written before options were stored as JSON
pub const LEGACY_OPTIONS_DELIMITER: char = ',';

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Stored multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub subject: String,
    pub question: String,
    /// Ordered answer choices, presented 1-based
    pub options: Vec<String>,
    /// Text of the correct choice
    pub answer: String,
}

impl Question {
    /// Whether the choice at the 1-based `selection` matches the answer.
    ///
    /// Returns `None` when the selection does not name an option.
    pub fn check_selection(&self, selection: usize) -> Option<bool> {
        let index = selection.checked_sub(1)?;
        let option = self.options.get(index)?;
        Some(option.trim() == self.answer.trim())
    }
}

/// Question about to be inserted, as found in import files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub subject: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl NewQuestion {
    /// Check that the question is playable
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("subject is empty".to_string());
        }
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.is_empty() {
            return Err(format!("'{}' has no options", self.question));
        }
        if !self.options.iter().any(|o| o.trim() == self.answer.trim()) {
            return Err(format!(
                "answer '{}' is not one of the options of '{}'",
                self.answer, self.question
            ));
        }
        Ok(())
    }
}

/// Completed quiz result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub score: i64,
    /// Completion timestamp (ISO 8601)
    pub taken_at: String,
}

/// Subject with the number of questions stored for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub question_count: i64,
}

/// Best score of one user, as shown by the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub best_score: i64,
    pub attempts: i64,
}

/// Encode options for the `questions.options` column
pub fn encode_options(options: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(options)
}

/// Decode the `questions.options` column.
///
/// JSON arrays are the current format; anything else is treated as a
/// comma-delimited legacy list.
pub fn decode_options(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(options) => options,
        Err(_) => raw
            .split(LEGACY_OPTIONS_DELIMITER)
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer: &str) -> Question {
        Question {
            id: 1,
            subject: "DSA".to_string(),
            question: "Pick one".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_decodeOptions_withLegacyString_shouldSplitOnComma() {
        let options = decode_options("O(1), O(n),O(log n)");
        assert_eq!(options, vec!["O(1)", " O(n)", "O(log n)"]);
    }

    #[test]
    fn test_decodeOptions_withJsonArray_shouldKeepEmbeddedCommas() {
        let encoded = encode_options(&["a, b".to_string(), "c".to_string()]).unwrap();
        assert_eq!(decode_options(&encoded), vec!["a, b", "c"]);
    }

    #[test]
    fn test_checkSelection_shouldCompareTrimmedText() {
        let q = question(&["int", " float "], "float");
        assert_eq!(q.check_selection(2), Some(true));
        assert_eq!(q.check_selection(1), Some(false));
    }

    #[test]
    fn test_checkSelection_shouldBeCaseSensitive() {
        let q = question(&["Float"], "float");
        assert_eq!(q.check_selection(1), Some(false));
    }

    #[test]
    fn test_checkSelection_outOfRange_shouldReturnNone() {
        let q = question(&["a", "b", "c", "d"], "a");
        assert_eq!(q.check_selection(0), None);
        assert_eq!(q.check_selection(9), None);
    }

    #[test]
    fn test_newQuestionValidate_withAnswerNotInOptions_shouldFail() {
        let q = NewQuestion {
            subject: "Python".to_string(),
            question: "Which keyword defines a function?".to_string(),
            options: vec!["func".to_string(), "def".to_string()],
            answer: "lambda".to_string(),
        };
        assert!(q.validate().is_err());
    }
}
