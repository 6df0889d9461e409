//! Input validation for statement submissions.
//!
//! Two rules block submission (missing subject, statement too short). The UCAS
//! character and line limits are advisory only: they are measured and reported
//! but never reject the input.

use serde::Serialize;
use thiserror::Error;

use crate::models::analysis::UserInput;

/// UCAS hard limit on characters, shown to the user as advisory.
pub const MAX_CHARS: usize = 4000;
/// UCAS hard limit on lines, shown to the user as advisory.
pub const MAX_LINES: usize = 47;
/// Minimum trimmed statement length worth sending for analysis.
pub const MIN_STATEMENT_CHARS: usize = 100;

pub const OVER_LIMIT_WARNING: &str =
    "You are over the UCAS limit. Please shorten your statement.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a subject.")]
    MissingSubject,

    #[error("Your statement is too short to analyze accurately.")]
    StatementTooShort,
}

/// Advisory length measurements for a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementMetrics {
    pub char_count: usize,
    pub line_count: usize,
    pub max_chars: usize,
    pub max_lines: usize,
    pub over_limit: bool,
}

impl StatementMetrics {
    pub fn measure(statement: &str) -> Self {
        let char_count = statement.chars().count();
        // An empty statement is still one (empty) line.
        let line_count = statement.split('\n').count();

        Self {
            char_count,
            line_count,
            max_chars: MAX_CHARS,
            max_lines: MAX_LINES,
            over_limit: char_count > MAX_CHARS || line_count > MAX_LINES,
        }
    }

    /// Counter text shown under the statement box, e.g. `120/4000 chars • 3/47 lines`.
    pub fn counter_label(&self) -> String {
        format!(
            "{}/{} chars • {}/{} lines",
            self.char_count, self.max_chars, self.line_count, self.max_lines
        )
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.over_limit.then_some(OVER_LIMIT_WARNING)
    }
}

/// Input that passed the blocking checks. Only `validate_submission` builds one,
/// so the controller can never be handed an unchecked submission.
#[derive(Debug, Clone)]
pub struct ValidatedInput {
    input: UserInput,
    metrics: StatementMetrics,
}

impl ValidatedInput {
    pub fn input(&self) -> &UserInput {
        &self.input
    }

    pub fn metrics(&self) -> StatementMetrics {
        self.metrics
    }
}

/// Browsers submit textarea line breaks as CRLF; counts and the provider
/// prompt both work on plain LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Checks a submission in order: subject first, then statement length.
pub fn validate_submission(input: UserInput) -> Result<ValidatedInput, ValidationError> {
    if input.subject.trim().is_empty() {
        return Err(ValidationError::MissingSubject);
    }
    if input.statement.trim().chars().count() < MIN_STATEMENT_CHARS {
        return Err(ValidationError::StatementTooShort);
    }

    let metrics = StatementMetrics::measure(&input.statement);
    Ok(ValidatedInput { input, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(subject: &str, statement: &str) -> UserInput {
        UserInput {
            subject: subject.to_string(),
            university: None,
            statement: statement.to_string(),
        }
    }

    fn long_statement() -> String {
        "I have wanted to study physics since I first built a radio. ".repeat(3)
    }

    #[test]
    fn test_normalize_newlines_drops_carriage_returns() {
        assert_eq!(normalize_newlines("one\r\ntwo\r\n\r\nthree"), "one\ntwo\n\nthree");
        assert_eq!(normalize_newlines("already\nplain"), "already\nplain");

        let crlf = vec!["x".repeat(84); 47].join("\r\n");
        let metrics = StatementMetrics::measure(&normalize_newlines(&crlf));
        assert_eq!(metrics.char_count, 3994);
        assert_eq!(metrics.line_count, 47);
        assert!(!metrics.over_limit);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let err = validate_submission(input("", &long_statement())).unwrap_err();
        assert_eq!(err, ValidationError::MissingSubject);
        assert_eq!(err.to_string(), "Please enter a subject.");
    }

    #[test]
    fn test_whitespace_subject_rejected_even_with_short_statement() {
        // Subject is checked before statement length.
        let err = validate_submission(input(" \t\n ", "short")).unwrap_err();
        assert_eq!(err, ValidationError::MissingSubject);
    }

    #[test]
    fn test_short_statement_rejected() {
        let err = validate_submission(input("Physics", "I like physics.")).unwrap_err();
        assert_eq!(err, ValidationError::StatementTooShort);
        assert_eq!(
            err.to_string(),
            "Your statement is too short to analyze accurately."
        );
    }

    #[test]
    fn test_statement_length_is_measured_after_trim() {
        let padded = format!("{}{}{}", " ".repeat(200), "x".repeat(99), "\n".repeat(50));
        assert_eq!(
            validate_submission(input("Physics", &padded)).unwrap_err(),
            ValidationError::StatementTooShort
        );
        let exact = "x".repeat(100);
        assert!(validate_submission(input("Physics", &exact)).is_ok());
    }

    #[test]
    fn test_university_never_blocks() {
        let mut i = input("Physics", &long_statement());
        i.university = Some(String::new());
        assert!(validate_submission(i).is_ok());
    }

    #[test]
    fn test_over_char_limit_still_accepted_but_flagged() {
        let statement = "a".repeat(4001);
        let validated = validate_submission(input("History", &statement)).unwrap();
        let metrics = validated.metrics();
        assert_eq!(metrics.char_count, 4001);
        assert!(metrics.over_limit);
        assert_eq!(metrics.warning(), Some(OVER_LIMIT_WARNING));
    }

    #[test]
    fn test_exactly_at_limits_is_not_over() {
        let metrics = StatementMetrics::measure(&"a".repeat(4000));
        assert!(!metrics.over_limit);
        let lines = vec!["line"; 47].join("\n");
        let metrics = StatementMetrics::measure(&lines);
        assert_eq!(metrics.line_count, 47);
        assert!(!metrics.over_limit);
    }

    #[test]
    fn test_48_lines_counted_and_flagged() {
        let statement = vec!["This line describes one more reason."; 48].join("\n");
        let metrics = StatementMetrics::measure(&statement);
        assert_eq!(metrics.line_count, 48);
        assert!(metrics.over_limit);
        assert!(validate_submission(input("Maths", &statement)).is_ok());
    }

    #[test]
    fn test_empty_statement_is_one_line() {
        let metrics = StatementMetrics::measure("");
        assert_eq!(metrics.char_count, 0);
        assert_eq!(metrics.line_count, 1);
        assert_eq!(metrics.warning(), None);
    }

    #[test]
    fn test_chars_counted_as_unicode_scalars() {
        let metrics = StatementMetrics::measure("café");
        assert_eq!(metrics.char_count, 4);
    }

    #[test]
    fn test_counter_label() {
        let metrics = StatementMetrics::measure("one\ntwo");
        assert_eq!(metrics.counter_label(), "7/4000 chars • 2/47 lines");
    }
}
