use std::any::Any;
use std::mem;

use hashbrown::HashMap;

use crate::config::ParseConfig;
use crate::error::ParseError;
use crate::expr::ExprId;
use crate::input::Input;
use crate::RuleResult;

/// Outcome of a memoized expression at one position.
enum Memo {
    /// The errors the expression raised when it failed there.
    Failure(Vec<ParseError>),

    /// Where the match ended and the value it produced.
    Success { end: usize, value: Box<dyn Any> },
}

/// The mutable context of one parse run.
///
/// A state is created per run and owned by it; grammars are shared, states
/// never are. Composite expressions snapshot [`cursor`](Self::cursor) on entry
/// and [`reset_to`](Self::reset_to) it when they fail, so a failed evaluation
/// leaves the cursor where it found it.
pub struct ParserState<'input> {
    input: Input<'input>,
    cursor: usize,

    /// Whether the innermost rule skips whitespace. Saved and restored around
    /// every rule evaluation.
    skip_ws: bool,
    whitespace: Vec<char>,

    /// One table per position `0..=len`, keyed by expression identity.
    memo: Vec<HashMap<ExprId, Memo>>,

    /// Failed attempts, in the order they were raised.
    errors: Vec<ParseError>,

    depth: usize,
    stack_limit: Option<usize>,

    /// Set once the stack limit was hit. Outcomes computed afterwards depend on
    /// the nesting depth and are no longer recorded.
    overflowed: bool,
}

impl<'input> ParserState<'input> {
    /// A state over `text` that treats no character as whitespace.
    pub fn new(text: &'input str) -> Self {
        Self::with_config(text, &ParseConfig::default().with_whitespace(&[]))
    }

    pub fn with_config(text: &'input str, config: &ParseConfig) -> Self {
        let input = Input::new(text);
        let mut memo = Vec::with_capacity(input.len() + 1);
        memo.resize_with(input.len() + 1, HashMap::new);
        ParserState {
            input,
            cursor: 0,
            skip_ws: false,
            whitespace: config.whitespace.clone(),
            memo,
            errors: Vec::new(),
            depth: 0,
            stack_limit: config.stack_limit,
            overflowed: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text(&self) -> &'input str {
        self.input.text()
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.len() == 0
    }

    pub fn is_eof(&self) -> bool {
        self.cursor >= self.input.len()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn take_errors(&mut self) -> Vec<ParseError> {
        mem::take(&mut self.errors)
    }

    /// Move the cursor `n` chars forward, stopping at the end of the text.
    pub fn advance(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_add(n).min(self.input.len());
    }

    /// Move the cursor to `position`, or to the end of the text if it lies
    /// beyond it.
    pub fn reset_to(&mut self, position: usize) {
        self.cursor = position.min(self.input.len());
    }

    /// Push an error at the current cursor.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.errors.push(ParseError::new(self.cursor, message));
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Drop the errors recorded after the first `len`.
    pub fn truncate_errors(&mut self, len: usize) {
        self.errors.truncate(len);
    }

    pub fn skips_whitespace(&self) -> bool {
        self.skip_ws
    }

    /// Switch whitespace skipping on or off, returning the previous mode.
    pub fn set_skip_whitespace(&mut self, on: bool) -> bool {
        mem::replace(&mut self.skip_ws, on)
    }

    /// Consume the run of whitespace at the cursor, if skipping is on.
    pub fn skip_whitespace(&mut self) {
        if !self.skip_ws {
            return;
        }
        while let Some(c) = self.input.char_at(self.cursor) {
            if !self.whitespace.contains(&c) {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Number of recorded memo entries across all positions.
    pub fn memo_entries(&self) -> usize {
        self.memo.iter().map(HashMap::len).sum()
    }

    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.input.char_at(pos)
    }

    pub(crate) fn slice(&self, pos: usize, len: usize) -> Option<&'input str> {
        self.input.slice(pos, len)
    }

    /// Replay the recorded outcome of `id` at the cursor, if there is one.
    ///
    /// A success moves the cursor to the recorded end; a failure appends the
    /// recorded errors.
    pub(crate) fn recall<T: Clone + 'static>(&mut self, id: ExprId) -> Option<RuleResult<T>> {
        let start = self.cursor;
        match self.memo.get(start)?.get(&id)? {
            Memo::Success { end, value } => {
                let value = value.downcast_ref::<T>()?.clone();
                let end = *end;
                self.cursor = end;
                Some(RuleResult::Matched(end, value))
            }
            Memo::Failure(errors) => {
                let errors = errors.clone();
                self.errors.extend(errors);
                Some(RuleResult::Failed)
            }
        }
    }

    /// Run `f` at the cursor and record its outcome under `id`.
    ///
    /// `f` sees an empty error stack, so the failure entry holds exactly the
    /// errors this evaluation raised. Those are appended to the caller's stack
    /// on failure and dropped on success.
    pub(crate) fn memoize<T: Clone + 'static>(
        &mut self,
        id: ExprId,
        f: impl FnOnce(&mut Self) -> RuleResult<T>,
    ) -> RuleResult<T> {
        let start = self.cursor;
        let outer = mem::take(&mut self.errors);
        let result = f(self);
        let own = mem::replace(&mut self.errors, outer);

        let entry = match &result {
            RuleResult::Matched(end, value) => Memo::Success {
                end: *end,
                value: Box::new(value.clone()),
            },
            RuleResult::Failed => {
                self.errors.extend(own.iter().cloned());
                Memo::Failure(own)
            }
        };
        if !self.overflowed {
            self.memo[start].insert(id, entry);
        }
        result
    }

    /// Enter one level of rule nesting. Returns `false` once the stack limit
    /// is exceeded, in which case the level is not entered.
    pub(crate) fn enter_rule(&mut self) -> bool {
        if let Some(limit) = self.stack_limit {
            if self.depth >= limit {
                self.overflowed = true;
                return false;
            }
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave_rule(&mut self) {
        self.depth -= 1;
    }
}
