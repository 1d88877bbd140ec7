//! Sequences with named intermediate values.
//!
//! A sequence is declared with a builder closure: it registers the steps in
//! order through a [`SequenceBuilder`], keeping a [`Stored`] handle for each
//! value it needs, and returns the function that builds the sequence's value
//! from those handles.
//!
//! ```
//! use peg_engine::{char_eq, digit, seq, ParserState, RuleResult, Values};
//!
//! let pair = seq(|s| {
//!     let a = s.add(digit());
//!     s.skip(char_eq(','));
//!     let b = s.add(digit());
//!     move |v: &mut Values| (*v.get(&a), *v.get(&b))
//! });
//!
//! let mut ps = ParserState::new("1,2");
//! assert_eq!(pair.evaluate(&mut ps), RuleResult::Matched(3, ('1', '2')));
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{ErasedExpr, Expr, ExprId, ExprKind, Node};
use crate::error::{grammar_bug, GrammarError};
use crate::state::ParserState;
use crate::RuleResult;

struct Step {
    expr: Arc<dyn ErasedExpr>,
    keep: bool,
}

/// Collects the steps of a sequence. See [`seq`].
pub struct SequenceBuilder {
    steps: Vec<Step>,
}

impl SequenceBuilder {
    /// Append a step whose value is kept for the value-building function.
    pub fn add<U: 'static>(&mut self, expr: impl Into<Expr<U>>) -> Stored<U> {
        let index = self.steps.len();
        self.steps.push(Step {
            expr: expr.into().erase(),
            keep: true,
        });
        Stored {
            index,
            _marker: PhantomData,
        }
    }

    /// Append a step that must match but whose value is not needed.
    pub fn skip<U: 'static>(&mut self, expr: impl Into<Expr<U>>) {
        self.steps.push(Step {
            expr: expr.into().erase(),
            keep: false,
        });
    }
}

/// Handle to the value of one step of a sequence.
pub struct Stored<U> {
    index: usize,
    _marker: PhantomData<fn() -> U>,
}

impl<U> Clone for Stored<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for Stored<U> {}

/// The step values of one successful sequence match.
pub struct Values {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl Values {
    /// Borrow a stored value.
    ///
    /// # Panics
    ///
    /// If the handle belongs to another sequence or the value was already
    /// [taken](Self::take).
    pub fn get<U: 'static>(&self, stored: &Stored<U>) -> &U {
        match self
            .slots
            .get(stored.index)
            .and_then(Option::as_ref)
            .and_then(|v| v.downcast_ref::<U>())
        {
            Some(value) => value,
            None => panic!("no stored value for step {}", stored.index),
        }
    }

    /// Move a stored value out.
    ///
    /// # Panics
    ///
    /// Same as [`get`](Self::get).
    pub fn take<U: 'static>(&mut self, stored: Stored<U>) -> U {
        match self
            .slots
            .get_mut(stored.index)
            .and_then(Option::take)
            .and_then(|v| v.downcast::<U>().ok())
        {
            Some(value) => *value,
            None => panic!("no stored value for step {}", stored.index),
        }
    }
}

type Build<T> = Box<dyn Fn(&mut Values) -> T + Send + Sync>;

struct Sequence<T> {
    steps: Vec<Step>,
    build: Build<T>,
    label: String,
}

impl<T> Node<T> for Sequence<T> {
    fn kind(&self) -> ExprKind {
        ExprKind::Sequence
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _id: ExprId, ps: &mut ParserState<'_>) -> RuleResult<T> {
        let start = ps.cursor();
        let mark = ps.errors().len();
        let mut slots = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            match step.expr.evaluate_erased(ps) {
                Some(value) => slots.push(if step.keep { Some(value) } else { None }),
                None => {
                    ps.reset_to(start);
                    ps.record_failure(format!("Wrong {}", self.label));
                    return RuleResult::Failed;
                }
            }
        }
        ps.truncate_errors(mark);
        let value = (self.build)(&mut Values { slots });
        RuleResult::Matched(ps.cursor(), value)
    }
}

/// Build a sequence. Panics if `define` registers no steps; see [`try_seq`].
pub fn seq<T, B, F>(define: B) -> Expr<T>
where
    T: 'static,
    B: FnOnce(&mut SequenceBuilder) -> F,
    F: Fn(&mut Values) -> T + Send + Sync + 'static,
{
    grammar_bug(try_seq(define))
}

pub fn try_seq<T, B, F>(define: B) -> Result<Expr<T>, GrammarError>
where
    T: 'static,
    B: FnOnce(&mut SequenceBuilder) -> F,
    F: Fn(&mut Values) -> T + Send + Sync + 'static,
{
    let mut builder = SequenceBuilder { steps: Vec::new() };
    let build = define(&mut builder);
    if builder.steps.is_empty() {
        return Err(GrammarError::EmptySequence);
    }
    let label = format!(
        "Sequence({})",
        builder
            .steps
            .iter()
            .map(|s| s.expr.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(Expr::from_node(Sequence {
        steps: builder.steps,
        build: Box::new(build),
        label,
    }))
}
