use log::{debug, info};
use rand::Rng;
use std::io::{BufRead, Write};

use crate::app_config::Config;
use crate::database::{Repository, User};
use crate::errors::{QuizError, QuizResult};
use crate::quiz::{self, AnswerOutcome, QuizOutcome};

// @module: Interactive session controller for the quiz application

/// Coarse state of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Register/login menu
    Unauthenticated,
    /// Logged in, choosing a subject
    AuthenticatedIdle(User),
    /// A subject was chosen and its quiz is being played
    QuizInProgress { user: User, subject: String },
}

/// Blocking read-eval loop driving registration, login and quizzes
pub struct Controller<'a, R, W, G> {
    // @field: Persistence layer shared with the caller
    repository: &'a Repository,
    // @field: App configuration
    config: Config,
    input: R,
    output: W,
    rng: G,
}

impl<'a, R, W, G> Controller<'a, R, W, G>
where
    R: BufRead,
    W: Write,
    G: Rng,
{
    // @method: Create a controller over the given terminal streams
    pub fn new(repository: &'a Repository, config: Config, input: R, output: W, rng: G) -> Self {
        Self {
            repository,
            config,
            input,
            output,
            rng,
        }
    }

    /// Consume the controller and hand back its output stream
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the session until the user exits or input ends
    pub fn run(&mut self) -> QuizResult<()> {
        writeln!(self.output, "Welcome to the Quiz Application!")?;

        let mut state = SessionState::Unauthenticated;
        loop {
            debug!("Session state: {:?}", state);

            let next = match state {
                SessionState::Unauthenticated => self.account_menu()?,
                SessionState::AuthenticatedIdle(user) => self.subject_menu(user)?,
                SessionState::QuizInProgress { user, subject } => {
                    self.start_quiz(&subject, &user)?;
                    self.play_again(user)?
                }
            };

            match next {
                Some(s) => state = s,
                None => break,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Register / Login / Exit menu. `None` ends the session.
    fn account_menu(&mut self) -> QuizResult<Option<SessionState>> {
        writeln!(self.output, "\n1. Register\n2. Login\n3. Exit")?;
        let Some(choice) = self.prompt("Enter your choice: ")? else {
            return Ok(None);
        };

        match choice.trim() {
            "1" => {
                let Some((username, password)) =
                    self.read_credentials("Enter a username: ", "Enter a password: ")?
                else {
                    return Ok(None);
                };

                match self.repository.create_user(&username, &password) {
                    Ok(_) => writeln!(self.output, "User registration successful!")?,
                    Err(QuizError::DuplicateUsername(_)) => {
                        writeln!(self.output, "Username already exists!")?
                    }
                    Err(e) => return Err(e),
                }
                Ok(Some(SessionState::Unauthenticated))
            }
            "2" => {
                let Some((username, password)) =
                    self.read_credentials("Enter your username: ", "Enter your password: ")?
                else {
                    return Ok(None);
                };

                match self.repository.authenticate_user(&username, &password)? {
                    Some(user) => {
                        info!("User '{}' logged in", user.username);
                        writeln!(self.output, "Login successful!")?;
                        Ok(Some(SessionState::AuthenticatedIdle(user)))
                    }
                    None => {
                        writeln!(self.output, "Invalid username or password!")?;
                        Ok(Some(SessionState::Unauthenticated))
                    }
                }
            }
            "3" => {
                writeln!(self.output, "Thank you!")?;
                Ok(None)
            }
            _ => {
                writeln!(self.output, "Invalid choice!")?;
                Ok(Some(SessionState::Unauthenticated))
            }
        }
    }

    /// Subject selection for a logged-in user
    fn subject_menu(&mut self, user: User) -> QuizResult<Option<SessionState>> {
        writeln!(self.output, "\nSubjects:")?;
        for (idx, subject) in self.config.subjects.iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, subject)?;
        }

        let prompt = format!("Choose a subject ({}): ", numbered_choices(self.config.subjects.len()));
        let Some(choice) = self.prompt(&prompt)? else {
            return Ok(None);
        };

        let subject = quiz::parse_selection(&choice)
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.config.subjects.get(i))
            .cloned();

        match subject {
            Some(subject) => Ok(Some(SessionState::QuizInProgress { user, subject })),
            None => {
                writeln!(self.output, "Invalid choice!")?;
                Ok(Some(SessionState::AuthenticatedIdle(user)))
            }
        }
    }

    fn play_again(&mut self, user: User) -> QuizResult<Option<SessionState>> {
        let answer = self.prompt("Do you want to take another quiz? (yes/no): ")?;

        if answer.is_some_and(|a| a.trim().to_lowercase() == "yes") {
            Ok(Some(SessionState::AuthenticatedIdle(user)))
        } else {
            writeln!(self.output, "Thank you for using the quiz application!")?;
            Ok(None)
        }
    }

    /// Play one quiz for `subject` and record the score.
    ///
    /// A subject without questions, or input ending before the last
    /// answer, ends early and writes no score.
    pub fn start_quiz(&mut self, subject: &str, user: &User) -> QuizResult<QuizOutcome> {
        writeln!(self.output, "\nStarting {} quiz!", subject)?;

        let questions = self.repository.fetch_questions(subject)?;
        if questions.is_empty() {
            writeln!(self.output, "No questions available for {}.", subject)?;
            return Ok(QuizOutcome::empty(subject));
        }

        let selected =
            quiz::select_questions(questions, self.config.questions_per_quiz, &mut self.rng);

        let mut score = 0i64;
        let mut presented = Vec::with_capacity(selected.len());

        for (i, question) in selected.iter().enumerate() {
            presented.push(question.id);

            writeln!(self.output, "\nQ{}: {}", i + 1, question.question)?;
            for (idx, option) in question.options.iter().enumerate() {
                writeln!(self.output, "{}. {}", idx + 1, option)?;
            }

            let prompt = format!("Your answer ({}): ", numbered_choices(question.options.len()));
            let Some(input) = self.prompt(&prompt)? else {
                info!("Input closed during '{}' quiz; score not recorded", subject);
                return Ok(QuizOutcome {
                    subject: subject.to_string(),
                    presented,
                    score,
                    score_id: None,
                });
            };

            match quiz::grade(question, &input) {
                AnswerOutcome::Correct => {
                    writeln!(self.output, "Correct!")?;
                    score += 1;
                }
                AnswerOutcome::Wrong => {
                    writeln!(self.output, "Wrong! The correct answer was: {}", question.answer)?
                }
                AnswerOutcome::Skipped => {
                    writeln!(self.output, "Invalid input! Skipping this question.")?
                }
            }
        }

        writeln!(self.output, "\nYour score is {}/{}.", score, presented.len())?;
        let recorded = self.repository.record_score(user.id, subject, score)?;

        Ok(QuizOutcome {
            subject: subject.to_string(),
            presented,
            score,
            score_id: Some(recorded.id),
        })
    }

    fn read_credentials(
        &mut self,
        user_prompt: &str,
        password_prompt: &str,
    ) -> QuizResult<Option<(String, String)>> {
        let Some(username) = self.prompt(user_prompt)? else {
            return Ok(None);
        };
        let Some(password) = self.prompt(password_prompt)? else {
            return Ok(None);
        };
        Ok(Some((username, password)))
    }

    /// Print `text` and read one line without its line ending; `None` at end of input
    fn prompt(&mut self, text: &str) -> QuizResult<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("Input closed");
            return Ok(None);
        }

        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// "1/2/3" style hint for a menu of `n` entries
fn numbered_choices(n: usize) -> String {
    (1..=n).map(|i| i.to_string()).collect::<Vec<_>>().join("/")
}
