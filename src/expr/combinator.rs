//! Composite expressions over a single child or a list of alternatives.
//!
//! Every composite restores the cursor it started from when it fails. When it
//! succeeds it drops the errors raised since it started, keeping the ones
//! recorded before it.

use std::ops::{Bound, RangeBounds};

use super::{Expr, ExprId, ExprKind, Node};
use crate::error::{grammar_bug, GrammarError};
use crate::state::ParserState;
use crate::RuleResult;

struct Optional<T> {
    child: Expr<T>,
    label: String,
}

impl<T: 'static> Node<Option<T>> for Optional<T> {
    fn kind(&self) -> ExprKind {
        ExprKind::Optional
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<Option<T>> {
        let mark = ps.errors().len();
        let value = self.child.evaluate(ps).into_option();
        ps.truncate_errors(mark);
        RuleResult::Matched(ps.cursor(), value)
    }
}

struct Repeated<T> {
    child: Expr<T>,
    min: usize,
    max: Option<usize>,
    label: String,
}

impl<T: 'static> Node<Vec<T>> for Repeated<T> {
    fn kind(&self) -> ExprKind {
        ExprKind::Repeated
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<Vec<T>> {
        let start = ps.cursor();
        let mark = ps.errors().len();
        let mut items = Vec::new();
        while self.max.map_or(true, |max| items.len() < max) {
            let before = ps.cursor();
            match self.child.evaluate(ps) {
                RuleResult::Matched(end, value) => {
                    items.push(value);
                    // Past the minimum, a match that consumed nothing would
                    // repeat forever.
                    if end == before && items.len() >= self.min {
                        break;
                    }
                }
                RuleResult::Failed => break,
            }
        }

        if items.len() >= self.min {
            ps.truncate_errors(mark);
            RuleResult::Matched(ps.cursor(), items)
        } else {
            ps.reset_to(start);
            ps.record_failure(format!(
                "Wrong {}, but was repeated {} times",
                self.label,
                items.len()
            ));
            RuleResult::Failed
        }
    }
}

struct Predicate<T> {
    child: Expr<T>,
    negated: bool,
    label: String,
}

impl<T: 'static> Node<()> for Predicate<T> {
    fn kind(&self) -> ExprKind {
        if self.negated {
            ExprKind::Not
        } else {
            ExprKind::And
        }
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<()> {
        let start = ps.cursor();
        let mark = ps.errors().len();
        let matched = self.child.evaluate(ps).is_matched();
        ps.reset_to(start);
        if matched != self.negated {
            ps.truncate_errors(mark);
            RuleResult::Matched(start, ())
        } else {
            ps.record_failure(format!("Wrong {}", self.label));
            RuleResult::Failed
        }
    }
}

struct Choice<T> {
    alternatives: Vec<Expr<T>>,
    label: String,
}

impl<T: 'static> Node<T> for Choice<T> {
    fn kind(&self) -> ExprKind {
        ExprKind::PrioritizedChoice
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<T> {
        let start = ps.cursor();
        let mark = ps.errors().len();
        for alternative in &self.alternatives {
            if let RuleResult::Matched(end, value) = alternative.evaluate(ps) {
                ps.truncate_errors(mark);
                return RuleResult::Matched(end, value);
            }
            ps.reset_to(start);
        }
        ps.record_failure(format!("Wrong {}", self.label));
        RuleResult::Failed
    }
}

struct Map<T, U> {
    child: Expr<T>,
    f: Box<dyn Fn(T) -> U + Send + Sync>,
}

impl<T: 'static, U> Node<U> for Map<T, U> {
    fn kind(&self) -> ExprKind {
        ExprKind::Map
    }

    fn label(&self) -> &str {
        self.child.label()
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<U> {
        self.child.evaluate(ps).map(&self.f)
    }
}

fn range_label(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) => format!("{}..{}", min, max),
        None => format!("{}..", min),
    }
}

impl<T: 'static> Expr<T> {
    /// Match the expression if possible. Never fails.
    pub fn optional(self) -> Expr<Option<T>> {
        let label = format!("Optional({})", self.label());
        Expr::from_node(Optional { child: self, label })
    }

    /// Match the expression greedily a number of times within `range`.
    ///
    /// Panics if the range is empty; see [`try_repeated`](Self::try_repeated).
    pub fn repeated(self, range: impl RangeBounds<usize>) -> Expr<Vec<T>> {
        grammar_bug(self.try_repeated(range))
    }

    pub fn try_repeated(
        self,
        range: impl RangeBounds<usize>,
    ) -> Result<Expr<Vec<T>>, GrammarError> {
        let min = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let max = match range.end_bound() {
            Bound::Included(&n) => Some(n),
            Bound::Excluded(&n) => match n.checked_sub(1) {
                Some(max) => Some(max),
                None => return Err(GrammarError::EmptyRange { min, max: n }),
            },
            Bound::Unbounded => None,
        };
        if let Some(max) = max {
            if min > max {
                return Err(GrammarError::EmptyRange { min, max });
            }
        }

        let label = format!("Repeated({}) {} times", self.label(), range_label(min, max));
        Ok(Expr::from_node(Repeated {
            child: self,
            min,
            max,
            label,
        }))
    }

    pub fn repeated_exactly(self, n: usize) -> Expr<Vec<T>> {
        self.repeated(n..=n)
    }

    pub fn zero_or_more(self) -> Expr<Vec<T>> {
        self.repeated(..)
    }

    pub fn one_or_more(self) -> Expr<Vec<T>> {
        self.repeated(1..)
    }

    /// Transform the value of a successful match.
    pub fn map<U, F>(self, f: F) -> Expr<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Expr::from_node(Map {
            child: self,
            f: Box::new(f),
        })
    }

    /// Try `self`, and `other` if `self` fails.
    pub fn or(self, other: impl Into<Expr<T>>) -> Expr<T> {
        choice([self, other.into()])
    }
}

/// Succeeds without consuming input if `expr` matches here.
pub fn and<T: 'static>(expr: impl Into<Expr<T>>) -> Expr<()> {
    predicate(expr.into(), false)
}

/// Succeeds without consuming input if `expr` does not match here.
pub fn not<T: 'static>(expr: impl Into<Expr<T>>) -> Expr<()> {
    predicate(expr.into(), true)
}

fn predicate<T: 'static>(child: Expr<T>, negated: bool) -> Expr<()> {
    let name = if negated { "Not" } else { "And" };
    let label = format!("{}({})", name, child.label());
    Expr::from_node(Predicate {
        child,
        negated,
        label,
    })
}

/// Prioritized choice: the first alternative that matches wins.
///
/// Panics if there are no alternatives.
pub fn choice<T: 'static>(alternatives: impl IntoIterator<Item = Expr<T>>) -> Expr<T> {
    grammar_bug(try_choice(alternatives))
}

pub fn try_choice<T: 'static>(
    alternatives: impl IntoIterator<Item = Expr<T>>,
) -> Result<Expr<T>, GrammarError> {
    let alternatives: Vec<Expr<T>> = alternatives.into_iter().collect();
    if alternatives.is_empty() {
        return Err(GrammarError::EmptyChoice);
    }
    let label = format!(
        "PrioritizedChoice({})",
        alternatives
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(" / ")
    );
    Ok(Expr::from_node(Choice {
        alternatives,
        label,
    }))
}
