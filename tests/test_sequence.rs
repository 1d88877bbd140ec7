use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use peg_engine::{
    char_eq, char_where, digit, letter, parse, seq, try_seq, GrammarError, ParseError,
    ParserState, RuleResult, Symbol, Values,
};

#[test]
fn stored_values_reach_the_constructor() {
    let pair = seq(|s| {
        let a = s.add(letter());
        s.skip(char_eq('='));
        let b = s.add(digit().one_or_more().join(""));
        move |v: &mut Values| (*v.get(&a), v.take(b))
    });

    let mut ps = ParserState::new("x=42");
    assert_eq!(pair.evaluate(&mut ps), RuleResult::Matched(4, ('x', "42".to_owned())));
    assert!(ps.errors().is_empty());
}

#[test]
fn failing_step_stops_the_sequence() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let c = char_where(move |ch| {
        counted.fetch_add(1, Ordering::SeqCst);
        ch == 'c'
    });
    let abc = seq(|s| {
        s.skip(char_eq('a'));
        s.skip(char_eq('b'));
        s.skip(c);
        |_: &mut Values| ()
    });

    let mut ps = ParserState::new("axc");
    assert_eq!(abc.evaluate(&mut ps), RuleResult::Failed);
    assert_eq!(ps.cursor(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        ps.errors(),
        [
            ParseError::new(1, "Wrong Character"),
            ParseError::new(0, "Wrong Sequence(Character, Character, Character)"),
        ]
    );

    let mut ps = ParserState::new("abc");
    assert_eq!(abc.evaluate(&mut ps), RuleResult::Matched(3, ()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn symbols_as_steps() {
    let word = Symbol::atomic("Word", || letter().one_or_more().join(""));
    let inner = word.clone();
    let assignment = Symbol::rule("Assignment", move || {
        let word = inner.clone();
        seq(|s| {
            let name = s.add(&word);
            s.skip(char_eq('='));
            let value = s.add(word);
            move |v: &mut Values| (v.take(name), v.take(value))
        })
    });

    assert_eq!(
        parse(&assignment, "key = value"),
        Ok(("key".to_owned(), "value".to_owned()))
    );
}

#[test]
fn empty_sequence_is_a_grammar_error() {
    let result = try_seq(|_| |_: &mut Values| 0);
    assert_eq!(result.unwrap_err(), GrammarError::EmptySequence);
}

#[test]
#[should_panic(expected = "invalid grammar: The sequence must contain 1 or more subexpressions")]
fn empty_sequence_panics() {
    seq(|_| |_: &mut Values| 0);
}
