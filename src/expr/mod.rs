//! Parsing expressions.
//!
//! Every expression is an [`Expr<T>`]: a shared, immutable node that produces a
//! `T` when it matches. The set of node kinds is closed ([`ExprKind`]); new
//! behavior is built by composing the existing kinds.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::state::ParserState;
use crate::RuleResult;

pub mod combinator;
pub mod derived;
pub mod sequence;
pub mod symbol;
pub mod terminal;

/// Identity of an expression node, used as the memoization key.
///
/// Clones of an [`Expr`] share their id; every constructor call allocates a
/// new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId(usize);

impl ExprId {
    fn fresh() -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        ExprId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of an expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Character,
    Literal,
    Empty,
    Fail,
    Position,
    Optional,
    Repeated,
    And,
    Not,
    Sequence,
    PrioritizedChoice,
    Map,
    Symbol,
}

impl ExprKind {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExprKind::Character
                | ExprKind::Literal
                | ExprKind::Empty
                | ExprKind::Fail
                | ExprKind::Position
        )
    }
}

/// Evaluation behavior of one node kind.
pub(crate) trait Node<T>: Send + Sync {
    fn kind(&self) -> ExprKind;

    /// Name used in error messages, e.g. `Repeated(Digit) 1.. times`.
    fn label(&self) -> &str;

    fn evaluate(&self, id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<T>;
}

/// A parsing expression producing a `T` on success.
///
/// Expressions are cheap to clone and may be shared between rules and
/// between threads. Failed evaluation never moves the cursor.
pub struct Expr<T> {
    id: ExprId,
    node: Arc<dyn Node<T>>,
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Expr {
            id: self.id,
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("id", &self.id)
            .field("kind", &self.node.kind())
            .field("label", &self.node.label())
            .finish()
    }
}

impl<T> From<&Expr<T>> for Expr<T> {
    fn from(expr: &Expr<T>) -> Expr<T> {
        expr.clone()
    }
}

impl<T: 'static> Expr<T> {
    pub(crate) fn from_node(node: impl Node<T> + 'static) -> Self {
        Self::from_shared(Arc::new(node))
    }

    pub(crate) fn from_shared(node: Arc<dyn Node<T>>) -> Self {
        Expr {
            id: ExprId::fresh(),
            node,
        }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn kind(&self) -> ExprKind {
        self.node.kind()
    }

    pub fn label(&self) -> &str {
        self.node.label()
    }

    /// Evaluate against `ps` at its current cursor.
    pub fn evaluate(&self, ps: &mut ParserState<'_>) -> RuleResult<T> {
        self.node.evaluate(self.id, ps)
    }

    pub(crate) fn erase(self) -> Arc<dyn ErasedExpr> {
        Arc::new(self)
    }
}

/// An expression with its value type hidden, for nodes whose children have
/// differing types.
pub(crate) trait ErasedExpr: Send + Sync {
    fn evaluate_erased(&self, ps: &mut ParserState<'_>) -> Option<Box<dyn Any>>;

    fn label(&self) -> &str;
}

impl<T: 'static> ErasedExpr for Expr<T> {
    fn evaluate_erased(&self, ps: &mut ParserState<'_>) -> Option<Box<dyn Any>> {
        self.evaluate(ps)
            .into_option()
            .map(|v| Box::new(v) as Box<dyn Any>)
    }

    fn label(&self) -> &str {
        self.node.label()
    }
}
