//! Named rules.
//!
//! A [`Symbol`] is a memoized rule with its own whitespace mode. Its body is
//! built on first use (or supplied later with [`Symbol::define`]), so rules
//! can refer to themselves and to each other.
//!
//! Rule bodies usually hold clones of the symbols they refer to, so a
//! recursive grammar is a reference cycle and is never freed. Grammars are
//! meant to be built once and kept, typically in a `Lazy` static.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{Expr, ExprId, ExprKind, Node};
use crate::error::GrammarError;
use crate::state::ParserState;
use crate::RuleResult;

type Builder<T> = Box<dyn Fn() -> Expr<T> + Send + Sync>;

struct SymbolNode<T> {
    name: String,
    label: String,
    skip_whitespace: bool,
    body: OnceCell<Expr<T>>,
    builder: Option<Builder<T>>,
}

impl<T: 'static> SymbolNode<T> {
    fn body(&self) -> Option<&Expr<T>> {
        match &self.builder {
            Some(build) => Some(self.body.get_or_init(build)),
            None => self.body.get(),
        }
    }

    fn evaluate_body(&self, ps: &mut ParserState<'_>) -> RuleResult<T> {
        let start = ps.cursor();
        let outer = ps.set_skip_whitespace(self.skip_whitespace);
        ps.skip_whitespace();
        let result = match self.body() {
            Some(body) => body.evaluate(ps),
            None => {
                ps.record_failure(format!("{} is not defined", self.label));
                RuleResult::Failed
            }
        };
        ps.set_skip_whitespace(outer);

        if let RuleResult::Failed = result {
            ps.reset_to(start);
            ps.record_failure(format!("Wrong {}", self.label));
        }
        result
    }
}

impl<T: Clone + 'static> Node<T> for SymbolNode<T> {
    fn kind(&self) -> ExprKind {
        ExprKind::Symbol
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<T> {
        let start = ps.cursor();
        let result = if let Some(entry) = ps.recall::<T>(id) {
            match &entry {
                RuleResult::Matched(..) => {
                    peg_trace!("Cached match of rule `{}` at {}", self.name, start)
                }
                RuleResult::Failed => {
                    peg_trace!("Cached fail of rule `{}` at {}", self.name, start)
                }
            }
            entry
        } else if ps.enter_rule() {
            peg_trace!("Attempting to match rule `{}` at {}", self.name, start);
            let result = ps.memoize(id, |ps| self.evaluate_body(ps));
            ps.leave_rule();
            match &result {
                RuleResult::Matched(end, _) => {
                    peg_trace!("Matched rule `{}` at {} to {}", self.name, start, end)
                }
                RuleResult::Failed => {
                    peg_trace!("Failed to match rule `{}` at {}", self.name, start)
                }
            }
            result
        } else {
            peg_trace!("Stack limit reached in rule `{}` at {}", self.name, start);
            ps.record_failure(format!("Stack overflow in {}", self.label));
            RuleResult::Failed
        };

        // Trailing whitespace belongs to the caller's mode.
        match result {
            RuleResult::Matched(_, value) => {
                ps.skip_whitespace();
                RuleResult::Matched(ps.cursor(), value)
            }
            RuleResult::Failed => RuleResult::Failed,
        }
    }
}

/// A named, memoized rule producing a `T`.
///
/// ```
/// use once_cell::sync::Lazy;
/// use peg_engine::{char_eq, parse, seq, Symbol, Values};
///
/// // parens = "(" parens ")" / ""
/// static PARENS: Lazy<Symbol<usize>> = Lazy::new(|| {
///     Symbol::rule("Parens", || {
///         seq(|s| {
///             s.skip(char_eq('('));
///             let inner = s.add(&*PARENS);
///             s.skip(char_eq(')'));
///             move |v: &mut Values| v.get(&inner) + 1
///         })
///         .or_default(0)
///     })
/// });
///
/// assert_eq!(parse(&PARENS, "(( ))"), Ok(2));
/// assert!(parse(&PARENS, "(()").is_err());
/// ```
pub struct Symbol<T> {
    node: Arc<SymbolNode<T>>,
    expr: Expr<T>,
}

impl<T> Clone for Symbol<T> {
    fn clone(&self) -> Self {
        Symbol {
            node: Arc::clone(&self.node),
            expr: self.expr.clone(),
        }
    }
}

impl<T> fmt::Debug for Symbol<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.node.name)
            .field("skip_whitespace", &self.node.skip_whitespace)
            .finish()
    }
}

impl<T: Clone + 'static> Symbol<T> {
    fn new(name: &str, skip_whitespace: bool, builder: Option<Builder<T>>) -> Self {
        let node = Arc::new(SymbolNode {
            name: name.to_owned(),
            label: format!("Symbol({})", name),
            skip_whitespace,
            body: OnceCell::new(),
            builder,
        });
        let expr = Expr::from_shared(node.clone());
        Symbol { node, expr }
    }

    /// A rule that skips whitespace around its tokens. `body` runs once, on
    /// the first evaluation.
    pub fn rule<F>(name: &str, body: F) -> Self
    where
        F: Fn() -> Expr<T> + Send + Sync + 'static,
    {
        Self::new(name, true, Some(Box::new(body)))
    }

    /// A rule in which every character is significant.
    pub fn atomic<F>(name: &str, body: F) -> Self
    where
        F: Fn() -> Expr<T> + Send + Sync + 'static,
    {
        Self::new(name, false, Some(Box::new(body)))
    }

    /// A whitespace-skipping rule whose body is supplied later with
    /// [`define`](Self::define).
    pub fn declare(name: &str) -> Self {
        Self::new(name, true, None)
    }

    pub fn declare_atomic(name: &str) -> Self {
        Self::new(name, false, None)
    }

    /// Set the body of a declared rule.
    ///
    /// Fails if the body is already set, or if the rule was created with a
    /// body builder.
    pub fn define(&self, body: impl Into<Expr<T>>) -> Result<(), GrammarError> {
        let already_defined = || GrammarError::AlreadyDefined(self.node.name.clone());
        if self.node.builder.is_some() {
            return Err(already_defined());
        }
        self.node.body.set(body.into()).map_err(|_| already_defined())
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn skips_whitespace(&self) -> bool {
        self.node.skip_whitespace
    }

    /// The rule as an expression. All clones share the rule's memo entries.
    pub fn expr(&self) -> Expr<T> {
        self.expr.clone()
    }
}

impl<T: Clone + 'static> From<Symbol<T>> for Expr<T> {
    fn from(symbol: Symbol<T>) -> Expr<T> {
        symbol.expr
    }
}

impl<T: Clone + 'static> From<&Symbol<T>> for Expr<T> {
    fn from(symbol: &Symbol<T>) -> Expr<T> {
        symbol.expr()
    }
}
