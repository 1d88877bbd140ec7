//! Terminals: expressions that look at the text directly.
//!
//! Character and literal terminals consume on success and leave the cursor
//! untouched on failure. After a match they skip trailing whitespace if the
//! enclosing rule ignores it.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;

use super::{Expr, ExprId, ExprKind, Node};
use crate::state::ParserState;
use crate::RuleResult;

type CharPredicate = Box<dyn Fn(char) -> bool + Send + Sync>;
type StrPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct Character {
    label: String,
    predicate: CharPredicate,
    packrat: bool,
}

impl Character {
    fn scan(&self, ps: &mut ParserState<'_>) -> RuleResult<char> {
        match ps.char_at(ps.cursor()) {
            None => {
                ps.record_failure(format!("Can't parse {} - text is too short", self.label));
                RuleResult::Failed
            }
            Some(c) if (self.predicate)(c) => {
                ps.advance(1);
                RuleResult::Matched(ps.cursor(), c)
            }
            Some(_) => {
                ps.record_failure(format!("Wrong {}", self.label));
                RuleResult::Failed
            }
        }
    }
}

impl Node<char> for Character {
    fn kind(&self) -> ExprKind {
        ExprKind::Character
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<char> {
        let result = if self.packrat {
            match ps.recall(id) {
                Some(hit) => hit,
                None => ps.memoize(id, |ps| self.scan(ps)),
            }
        } else {
            self.scan(ps)
        };
        after_match(ps, result)
    }
}

struct Literal {
    len: usize,
    predicate: StrPredicate,
}

impl Node<String> for Literal {
    fn kind(&self) -> ExprKind {
        ExprKind::Literal
    }

    fn label(&self) -> &str {
        "Literal"
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<String> {
        let result = match ps.slice(ps.cursor(), self.len) {
            None => {
                ps.record_failure("Can't parse Literal - text is too short");
                RuleResult::Failed
            }
            Some(s) if (self.predicate)(s) => {
                ps.advance(self.len);
                RuleResult::Matched(ps.cursor(), s.to_owned())
            }
            Some(_) => {
                ps.record_failure("Wrong Literal");
                RuleResult::Failed
            }
        };
        after_match(ps, result)
    }
}

fn after_match<T>(ps: &mut ParserState<'_>, result: RuleResult<T>) -> RuleResult<T> {
    match result {
        RuleResult::Matched(_, v) => {
            ps.skip_whitespace();
            RuleResult::Matched(ps.cursor(), v)
        }
        RuleResult::Failed => RuleResult::Failed,
    }
}

struct Empty;

impl Node<()> for Empty {
    fn kind(&self) -> ExprKind {
        ExprKind::Empty
    }

    fn label(&self) -> &str {
        "Empty"
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<()> {
        RuleResult::Matched(ps.cursor(), ())
    }
}

struct Fail {
    message: String,
}

impl<T> Node<T> for Fail {
    fn kind(&self) -> ExprKind {
        ExprKind::Fail
    }

    fn label(&self) -> &str {
        "Fail"
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<T> {
        ps.record_failure(self.message.clone());
        RuleResult::Failed
    }
}

struct Position;

impl Node<usize> for Position {
    fn kind(&self) -> ExprKind {
        ExprKind::Position
    }

    fn label(&self) -> &str {
        "Position"
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<usize> {
        RuleResult::Matched(ps.cursor(), ps.cursor())
    }
}

fn builtin(label: &str, predicate: fn(char) -> bool) -> Expr<char> {
    Expr::from_node(Character {
        label: label.to_owned(),
        predicate: Box::new(predicate),
        packrat: true,
    })
}

static ANY: Lazy<Expr<char>> = Lazy::new(|| builtin("Any", |_| true));
static DIGIT: Lazy<Expr<char>> = Lazy::new(|| builtin("Digit", |c| c.is_ascii_digit()));
static LETTER: Lazy<Expr<char>> = Lazy::new(|| builtin("Letter", char::is_alphabetic));
static HEX_DIGIT: Lazy<Expr<char>> = Lazy::new(|| builtin("HexDigit", |c| c.is_ascii_hexdigit()));

/// Any single character.
pub fn any() -> Expr<char> {
    ANY.clone()
}

/// One of `0`-`9`.
pub fn digit() -> Expr<char> {
    DIGIT.clone()
}

/// An alphabetic character, including non-ASCII letters.
pub fn letter() -> Expr<char> {
    LETTER.clone()
}

/// One of `0`-`9`, `a`-`f`, `A`-`F`.
pub fn hex_digit() -> Expr<char> {
    HEX_DIGIT.clone()
}

/// A character satisfying `predicate`.
pub fn char_where<F>(predicate: F) -> Expr<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Expr::from_node(Character {
        label: "Character".to_owned(),
        predicate: Box::new(predicate),
        packrat: false,
    })
}

pub fn char_eq(expected: char) -> Expr<char> {
    char_where(move |c| c == expected)
}

/// Any of the given characters.
pub fn char_in(chars: impl IntoIterator<Item = char>) -> Expr<char> {
    let chars: Vec<char> = chars.into_iter().collect();
    char_where(move |c| chars.contains(&c))
}

pub fn char_range(range: RangeInclusive<char>) -> Expr<char> {
    char_where(move |c| range.contains(&c))
}

/// Exactly the text `expected`.
pub fn literal(expected: &str) -> Expr<String> {
    let expected = expected.to_owned();
    literal_where(expected.chars().count(), move |s| s == expected)
}

/// The next `len` characters, if they satisfy `predicate`.
///
/// ```
/// use peg_engine::{literal_where, ParserState, RuleResult};
///
/// let keyword = literal_where(3, |s| s.eq_ignore_ascii_case("let"));
/// let mut ps = ParserState::new("LET x");
/// assert_eq!(keyword.evaluate(&mut ps), RuleResult::Matched(3, "LET".to_owned()));
/// ```
pub fn literal_where<F>(len: usize, predicate: F) -> Expr<String>
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Expr::from_node(Literal {
        len,
        predicate: Box::new(predicate),
    })
}

/// Always matches without consuming anything.
pub fn empty() -> Expr<()> {
    Expr::from_node(Empty)
}

/// Always fails with `message`.
pub fn fail<T: 'static>(message: impl Into<String>) -> Expr<T> {
    Expr::from_node(Fail {
        message: message.into(),
    })
}

/// Matches without consuming anything; the value is the cursor.
pub fn position() -> Expr<usize> {
    Expr::from_node(Position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_keep_their_identity() {
        assert_eq!(digit().id(), digit().id());
        assert_ne!(digit().id(), letter().id());
        assert_eq!(hex_digit().label(), "HexDigit");
    }

    #[test]
    fn packrat_terminals_are_recorded() {
        let mut ps = ParserState::new("7");
        assert!(digit().evaluate(&mut ps).is_matched());
        assert_eq!(ps.memo_entries(), 1);

        let mut ps = ParserState::new("7");
        assert!(char_eq('7').evaluate(&mut ps).is_matched());
        assert_eq!(ps.memo_entries(), 0);
    }
}
