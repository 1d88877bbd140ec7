//! Per-run parser configuration.

/// Whitespace skipped by rules that ignore whitespace: `' '`, `'\t'`, `'\r'`, `'\n'`.
pub const DEFAULT_WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// No whitespace at all; every character is significant.
pub const NO_WHITESPACE: &[char] = &[];

/// Options for one call of [`parse_with`](crate::parse_with).
///
/// ```
/// use peg_engine::{ParseConfig, NO_WHITESPACE};
///
/// let config = ParseConfig::default()
///     .with_whitespace(NO_WHITESPACE)
///     .with_stack_limit(64);
/// assert!(config.whitespace.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Characters skipped around tokens of whitespace-ignoring rules.
    pub whitespace: Vec<char>,

    /// Maximum nesting depth of rule evaluations. `None` means unlimited, in
    /// which case a pathological grammar can exhaust the native stack.
    pub stack_limit: Option<usize>,
}

impl ParseConfig {
    pub fn with_whitespace(mut self, whitespace: &[char]) -> Self {
        self.whitespace = whitespace.to_vec();
        self
    }

    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = Some(limit);
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            whitespace: DEFAULT_WHITESPACE.to_vec(),
            stack_limit: None,
        }
    }
}
