//! Parse error reporting

use std::fmt::{self, Display};

use thiserror::Error;

/// One failed attempt: where it happened and why.
#[derive(Error, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Hash)]
#[error("error at {position}: {message}")]
pub struct ParseError {
    /// Char offset into the input at which the attempt failed.
    pub position: usize,

    /// Human-readable reason, e.g. `Wrong Character`.
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        ParseError {
            position,
            message: message.into(),
        }
    }
}

/// A parse failure returned by the driver.
///
/// `errors` are in the order they were raised: the innermost failed attempt
/// comes first, the enclosing rules follow.
#[derive(Error, PartialEq, Eq, Debug, Clone)]
#[error("{}", render(.errors))]
pub struct ParseFailure {
    pub errors: Vec<ParseError>,
}

fn render(errors: &[ParseError]) -> String {
    if errors.is_empty() {
        return "parse failed".to_owned();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ParseFailure {
    /// The error raised first, which is the most specific one.
    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Pair every error with its line and column in `text`.
    pub fn locate<'a>(&'a self, text: &str) -> Vec<(LineCol, &'a ParseError)> {
        self.errors
            .iter()
            .map(|e| (LineCol::at(text, e.position), e))
            .collect()
    }
}

/// Line and column of a char offset.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct LineCol {
    /// Line (1-indexed)
    pub line: usize,

    /// Column (1-indexed, in chars)
    pub column: usize,

    /// Char offset from start of input, 0-indexed
    pub offset: usize,
}

impl LineCol {
    /// Locate the char offset `offset` in `text`. Offsets past the end are
    /// clamped to the end of the text.
    pub fn at(text: &str, offset: usize) -> LineCol {
        let mut line = 1;
        let mut column = 1;
        let mut chars = text.chars().take(offset).peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => {
                    line += 1;
                    column = 1;
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                _ => column += 1,
            }
        }
        LineCol {
            line,
            column,
            offset: offset.min(text.chars().count()),
        }
    }
}

impl Display for LineCol {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "{}:{}", self.line, self.column)
    }
}

/// A mistake in the grammar itself, detected while it is being built.
#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum GrammarError {
    #[error("Range is empty: {min}..{max}")]
    EmptyRange { min: usize, max: usize },

    #[error("The sequence must contain 1 or more subexpressions")]
    EmptySequence,

    #[error("The prioritized choice must contain 1 or more alternatives")]
    EmptyChoice,

    #[error("Symbol({0}) is already defined")]
    AlreadyDefined(String),
}

/// Abort grammar construction on an author error.
pub(crate) fn grammar_bug<T>(result: Result<T, GrammarError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("invalid grammar: {}", e),
    }
}
