//! Conveniences composed from the primitive expressions.

use std::fmt::Display;
use std::ops::Bound;

use super::sequence::{try_seq, Values};
use super::Expr;
use crate::error::{grammar_bug, GrammarError};
use crate::expr::terminal::empty;

impl<T: Clone + Send + Sync + 'static> Expr<T> {
    /// Match the expression if possible, producing `default` otherwise.
    pub fn or_default(self, default: T) -> Expr<T> {
        self.optional()
            .map(move |value| value.unwrap_or_else(|| default.clone()))
    }

    /// Start building a delimited list of this expression.
    ///
    /// ```
    /// use peg_engine::{char_eq, digit, ParserState, RuleResult};
    ///
    /// let digits = digit()
    ///     .list()
    ///     .separator(char_eq(','))
    ///     .prefix(char_eq('['))
    ///     .postfix(char_eq(']'))
    ///     .build();
    ///
    /// let mut ps = ParserState::new("[1,2,3]");
    /// assert_eq!(digits.evaluate(&mut ps), RuleResult::Matched(7, vec!['1', '2', '3']));
    /// ```
    pub fn list(self) -> ListBuilder<T> {
        ListBuilder {
            element: self,
            separator: None,
            prefix: None,
            postfix: None,
            min: 0,
            max: None,
        }
    }
}

impl<T: Display + 'static> Expr<Vec<T>> {
    /// Concatenate the displayed items, with `separator` between them.
    pub fn join(self, separator: &str) -> Expr<String> {
        let separator = separator.to_owned();
        self.map(move |items| {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(separator.as_str())
        })
    }

    /// Like [`join`](Self::join), with `prefix` and `postfix` around the
    /// result.
    pub fn join_with(self, separator: &str, prefix: &str, postfix: &str) -> Expr<String> {
        let prefix = prefix.to_owned();
        let postfix = postfix.to_owned();
        self.join(separator)
            .map(move |joined| format!("{}{}{}", prefix, joined, postfix))
    }
}

/// Builder for `prefix? element (separator element)* postfix?` lists.
///
/// The prefix and postfix are required when set. `min` and `max` bound the
/// number of elements; the default is any number.
pub struct ListBuilder<T> {
    element: Expr<T>,
    separator: Option<Expr<()>>,
    prefix: Option<Expr<()>>,
    postfix: Option<Expr<()>>,
    min: usize,
    max: Option<usize>,
}

fn discard<U: 'static>(expr: impl Into<Expr<U>>) -> Option<Expr<()>> {
    Some(expr.into().map(|_| ()))
}

impl<T: Clone + Send + Sync + 'static> ListBuilder<T> {
    pub fn separator<U: 'static>(mut self, separator: impl Into<Expr<U>>) -> Self {
        self.separator = discard(separator);
        self
    }

    pub fn prefix<U: 'static>(mut self, prefix: impl Into<Expr<U>>) -> Self {
        self.prefix = discard(prefix);
        self
    }

    pub fn postfix<U: 'static>(mut self, postfix: impl Into<Expr<U>>) -> Self {
        self.postfix = discard(postfix);
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Panics if `min > max`; see [`try_build`](Self::try_build).
    pub fn build(self) -> Expr<Vec<T>> {
        grammar_bug(self.try_build())
    }

    pub fn try_build(self) -> Result<Expr<Vec<T>>, GrammarError> {
        let ListBuilder {
            element,
            separator,
            prefix,
            postfix,
            min,
            max,
        } = self;

        if let Some(max) = max {
            if min > max {
                return Err(GrammarError::EmptyRange { min, max });
            }
        }

        let elements = match max {
            Some(0) => empty().map(|()| Vec::new()),
            _ => {
                let next = match separator {
                    Some(separator) => try_seq(|s| {
                        s.skip(separator);
                        let item = s.add(element.clone());
                        move |v: &mut Values| v.take(item)
                    })?,
                    None => element.clone(),
                };
                let upper = match max {
                    Some(max) => Bound::Included(max - 1),
                    None => Bound::Unbounded,
                };
                let rest = next.try_repeated((Bound::Included(min.saturating_sub(1)), upper))?;
                let elements = try_seq(|s| {
                    let first = s.add(element);
                    let rest = s.add(rest);
                    move |v: &mut Values| {
                        let mut items = vec![v.take(first)];
                        items.extend(v.take(rest));
                        items
                    }
                })?;
                if min == 0 {
                    elements.or_default(Vec::new())
                } else {
                    elements
                }
            }
        };

        if prefix.is_none() && postfix.is_none() {
            return Ok(elements);
        }
        try_seq(|s| {
            if let Some(prefix) = prefix {
                s.skip(prefix);
            }
            let items = s.add(elements);
            if let Some(postfix) = postfix {
                s.skip(postfix);
            }
            move |v: &mut Values| v.take(items)
        })
    }
}
