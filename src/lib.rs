//! A packrat parsing-expression-grammar engine.
//!
//! Grammars are built at runtime from typed parsing expressions ([`Expr<T>`])
//! and named rules ([`Symbol<T>`]). A rule is memoized per input position, may
//! refer to itself or to rules defined after it, and decides whether leading and
//! trailing whitespace is skipped inside its body.
//!
//! ```
//! use once_cell::sync::Lazy;
//! use peg_engine::{char_in, digit, parse, seq, Symbol, Values};
//!
//! static NUM: Lazy<Symbol<i64>> = Lazy::new(|| {
//!     Symbol::atomic("Num", || {
//!         seq(|s| {
//!             let sign = s.add(char_in(['+', '-']).or_default('+'));
//!             let digits = s.add(digit().one_or_more().join(""));
//!             move |v: &mut Values| {
//!                 let n: i64 = v.get(&digits).parse().unwrap_or(0);
//!                 if *v.get(&sign) == '-' { -n } else { n }
//!             }
//!         })
//!     })
//! });
//!
//! assert_eq!(parse(&NUM, "-123"), Ok(-123));
//! assert!(parse(&NUM, "123x").is_err());
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod expr;
mod input;
mod parser;
mod state;

pub use crate::config::{ParseConfig, DEFAULT_WHITESPACE, NO_WHITESPACE};
pub use crate::error::{GrammarError, LineCol, ParseError, ParseFailure};
pub use crate::expr::derived::ListBuilder;
pub use crate::expr::sequence::{seq, try_seq, SequenceBuilder, Stored, Values};
pub use crate::expr::symbol::Symbol;
pub use crate::expr::terminal::{
    any, char_eq, char_in, char_range, char_where, digit, empty, fail, hex_digit, letter,
    literal, literal_where, position,
};
pub use crate::expr::combinator::{and, choice, not, try_choice};
pub use crate::expr::{Expr, ExprId, ExprKind};
pub use crate::parser::{parse, parse_with};
pub use crate::state::ParserState;

/// The result of evaluating one parsing expression.
///
/// `Matched` carries the cursor after the match, which is always equal to
/// [`ParserState::cursor`] once `evaluate` returns.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug, Hash)]
pub enum RuleResult<T> {
    Matched(usize, T),
    Failed,
}

impl<T> RuleResult<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, RuleResult::Matched(..))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RuleResult<U> {
        match self {
            RuleResult::Matched(pos, v) => RuleResult::Matched(pos, f(v)),
            RuleResult::Failed => RuleResult::Failed,
        }
    }

    /// Drop the end position, keeping only the value.
    pub fn into_option(self) -> Option<T> {
        match self {
            RuleResult::Matched(_, v) => Some(v),
            RuleResult::Failed => None,
        }
    }
}
