use std::thread;

use once_cell::sync::Lazy;
use peg_engine::{char_eq, char_in, digit, parse, seq, Expr, Symbol, Values};

fn fold(first: i64, rest: Vec<(char, i64)>) -> i64 {
    rest.into_iter().fold(first, |acc, (op, n)| match op {
        '+' => acc + n,
        '-' => acc - n,
        '*' => acc * n,
        '/' => acc / n,
        _ => unreachable!(),
    })
}

/// operand (op operand)*
fn chain(operand: &'static Lazy<Symbol<i64>>, ops: [char; 2]) -> Expr<i64> {
    seq(move |s| {
        let first = s.add(&**operand);
        let rest = s.add(
            seq(move |s| {
                let op = s.add(char_in(ops));
                let n = s.add(&**operand);
                move |v: &mut Values| (*v.get(&op), *v.get(&n))
            })
            .zero_or_more(),
        );
        move |v: &mut Values| fold(*v.get(&first), v.take(rest))
    })
}

static EXPR: Lazy<Symbol<i64>> = Lazy::new(|| Symbol::rule("Expr", || chain(&TERM, ['+', '-'])));

static TERM: Lazy<Symbol<i64>> = Lazy::new(|| Symbol::rule("Term", || chain(&FACTOR, ['*', '/'])));

static FACTOR: Lazy<Symbol<i64>> = Lazy::new(|| {
    Symbol::rule("Factor", || {
        let parens = seq(|s| {
            s.skip(char_eq('('));
            let e = s.add(&*EXPR);
            s.skip(char_eq(')'));
            move |v: &mut Values| *v.get(&e)
        });
        NUM.expr().or(parens)
    })
});

static NUM: Lazy<Symbol<i64>> = Lazy::new(|| {
    Symbol::atomic("Num", || {
        digit()
            .one_or_more()
            .join("")
            .map(|s| s.parse().unwrap())
    })
});

#[test]
fn precedence() {
    assert_eq!(parse(&EXPR, "1+2*3"), Ok(7));
    assert_eq!(parse(&EXPR, "10/3-1"), Ok(2));
    assert_eq!(parse(&EXPR, "2*3-4*5"), Ok(-14));
}

#[test]
fn parentheses_and_whitespace() {
    assert_eq!(parse(&EXPR, " ( 1 + 2 ) * 3 "), Ok(9));
    assert_eq!(parse(&EXPR, "((((42))))"), Ok(42));
    assert_eq!(parse(&EXPR, "12 * (3 -\n 1)"), Ok(24));
}

#[test]
fn malformed() {
    assert!(parse(&EXPR, "").is_err());
    assert!(parse(&EXPR, "2*(3").is_err());
    assert!(parse(&EXPR, "1 2").is_err());
    assert!(parse(&EXPR, "1 +").is_err());
}

#[test]
fn grammar_is_shared_between_threads() {
    let handles: Vec<_> = (1..=4)
        .map(|i| thread::spawn(move || parse(&EXPR, &format!("{} * ({} + 1)", i, i))))
        .collect();
    for (i, handle) in (1..=4).zip(handles) {
        assert_eq!(handle.join().unwrap(), Ok(i * (i + 1)));
    }
}
