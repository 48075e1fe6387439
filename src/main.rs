// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use quizterm::app_config::{self, Config};
use quizterm::database::{DatabaseConnection, NewQuestion, Repository};
use quizterm::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive quiz session (default command)
    Play,

    /// Load questions from a JSON file
    Import {
        /// JSON array of {subject, question, options, answer} objects
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the best score of each user
    Scores {
        /// Only count quizzes for this subject
        #[arg(short, long)]
        subject: Option<String>,

        /// Maximum number of rows
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// List subjects that have stored questions
    Subjects,

    /// Generate shell completions for quizterm
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// quizterm - multiple-choice quizzes in the terminal
#[derive(Parser, Debug)]
#[command(name = "quizterm")]
#[command(version)]
#[command(about = "Terminal quiz application with per-user score tracking")]
#[command(long_about = "quizterm asks multiple-choice questions grouped by subject and records each user's score.

EXAMPLES:
    quizterm                                # Register, log in and play
    quizterm import questions.json          # Load questions
    quizterm scores --subject Python        # Leaderboard for one subject
    quizterm --database ./quiz.db play      # Use a specific database file
    quizterm completions bash > quizterm.bash

CONFIGURATION:
    Configuration is stored in quizterm.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "quizterm.json")]
    config_path: String,

    /// Database file path (overrides the configuration)
    #[arg(short, long, global = true, env = "QUIZTERM_DATABASE")]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Start quiet; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Warn)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "quizterm", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(database) = &cli.database {
        config.database_path = Some(database.to_string_lossy().into_owned());
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let db = match config.database_path() {
        Some(path) => DatabaseConnection::new(path)?,
        None => DatabaseConnection::new_default()?,
    };
    let repository = Repository::new(db);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => run_play(&repository, config),
        Commands::Import { file } => run_import(&repository, &file),
        Commands::Scores { subject, limit } => run_scores(&repository, subject.as_deref(), limit),
        Commands::Subjects => run_subjects(&repository),
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_play(repository: &Repository, config: Config) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    let mut controller = Controller::new(repository, config, stdin.lock(), stdout.lock(), rand::rng());
    controller.run().context("Quiz session failed")?;

    Ok(())
}

fn run_import(repository: &Repository, file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(anyhow!("Question file does not exist: {:?}", file));
    }

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read question file: {:?}", file))?;
    let questions: Vec<NewQuestion> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse question file: {:?}", file))?;

    let count = repository
        .import_questions(&questions)
        .with_context(|| format!("Failed to import questions from {:?}", file))?;

    info!("{}", repository.stats()?);
    println!("Imported {} question(s).", count);
    Ok(())
}

fn run_scores(repository: &Repository, subject: Option<&str>, limit: usize) -> Result<()> {
    let entries = repository.leaderboard(subject, limit)?;

    if entries.is_empty() {
        println!("No scores recorded yet.");
        return Ok(());
    }

    println!("{:<4} {:<20} {:>6} {:>9}", "#", "User", "Best", "Attempts");
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>6} {:>9}",
            rank + 1,
            entry.username,
            entry.best_score,
            entry.attempts
        );
    }
    Ok(())
}

fn run_subjects(repository: &Repository) -> Result<()> {
    let subjects = repository.list_subjects()?;

    if subjects.is_empty() {
        println!("No questions stored yet. Use `quizterm import <FILE>` to add some.");
    }
    for summary in subjects {
        println!("{} ({} questions)", summary.subject, summary.question_count);
    }
    Ok(())
}
