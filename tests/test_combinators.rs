#[macro_use]
extern crate assert_matches;

use peg_engine::{
    and, char_eq, digit, empty, letter, literal, not, parse, Expr, GrammarError, ParserState,
    RuleResult, Symbol,
};

fn run<T: 'static>(e: &Expr<T>, text: &str) -> (RuleResult<T>, usize) {
    let mut ps = ParserState::new(text);
    let result = e.evaluate(&mut ps);
    (result, ps.cursor())
}

fn whole(name: &str, e: Expr<Vec<char>>) -> Symbol<String> {
    let e = e.join("");
    Symbol::atomic(name, move || e.clone())
}

#[test]
fn repetition_boundaries() {
    let a2_3 = char_eq('a').repeated(2..=3);

    assert_eq!(run(&a2_3, "aa"), (RuleResult::Matched(2, vec!['a'; 2]), 2));
    assert_eq!(run(&a2_3, "aaa"), (RuleResult::Matched(3, vec!['a'; 3]), 3));
    assert_eq!(run(&a2_3, "aaaa"), (RuleResult::Matched(3, vec!['a'; 3]), 3));

    let mut ps = ParserState::new("a");
    assert_eq!(a2_3.evaluate(&mut ps), RuleResult::Failed);
    assert_eq!(ps.cursor(), 0);
    let last = ps.errors().last().map(|e| e.message.as_str());
    assert_eq!(last, Some("Wrong Repeated(Character) 2..3 times, but was repeated 1 times"));
}

#[test]
fn repeats() {
    let repeat_n = whole("RepeatN", digit().repeated_exactly(4));
    assert!(parse(&repeat_n, "123").is_err());
    assert_eq!(parse(&repeat_n, "1234").as_deref(), Ok("1234"));
    assert!(parse(&repeat_n, "12345").is_err());

    let repeat_min = whole("RepeatMin", digit().repeated(2..));
    assert!(parse(&repeat_min, "").is_err());
    assert!(parse(&repeat_min, "1").is_err());
    assert_eq!(parse(&repeat_min, "12").as_deref(), Ok("12"));
    assert_eq!(parse(&repeat_min, "123").as_deref(), Ok("123"));

    let repeat_max = whole("RepeatMax", digit().repeated(..=2));
    assert_eq!(parse(&repeat_max, "").as_deref(), Ok(""));
    assert_eq!(parse(&repeat_max, "1").as_deref(), Ok("1"));
    assert_eq!(parse(&repeat_max, "12").as_deref(), Ok("12"));
    assert!(parse(&repeat_max, "123").is_err());

    let star = whole("Star", digit().zero_or_more());
    assert_eq!(parse(&star, "").as_deref(), Ok(""));
    let plus = whole("Plus", digit().one_or_more());
    assert!(parse(&plus, "").is_err());
    assert_eq!(parse(&plus, "42").as_deref(), Ok("42"));
}

#[test]
fn repetition_of_nullable_expression_terminates() {
    let (result, cursor) = run(&empty().zero_or_more(), "abc");
    assert!(result.is_matched());
    assert_eq!(cursor, 0);
}

#[test]
fn nullable_expression_reaches_the_minimum() {
    let (result, cursor) = run(&char_eq('a').optional().repeated(2..=2), "");
    assert_eq!(result, RuleResult::Matched(0, vec![None, None]));
    assert_eq!(cursor, 0);

    let (result, cursor) = run(&empty().repeated_exactly(3), "x");
    assert_eq!(result, RuleResult::Matched(0, vec![(); 3]));
    assert_eq!(cursor, 0);

    // Past the minimum, a zero-width match still ends the loop.
    let (result, _) = run(&empty().repeated(1..), "x");
    assert_eq!(result, RuleResult::Matched(0, vec![()]));
}

#[test]
fn optional() {
    let e = char_eq('a').optional();
    assert_eq!(run(&e, "a"), (RuleResult::Matched(1, Some('a')), 1));

    let mut ps = ParserState::new("b");
    assert_eq!(e.evaluate(&mut ps), RuleResult::Matched(0, None));
    assert!(ps.errors().is_empty());

    let d = char_eq('-').or_default('+');
    assert_eq!(run(&d, "-"), (RuleResult::Matched(1, '-'), 1));
    assert_eq!(run(&d, "5"), (RuleResult::Matched(0, '+'), 0));
}

#[test]
fn lookahead_never_consumes() {
    let ab = literal("ab");

    assert_eq!(run(&and(ab.clone()), "abc"), (RuleResult::Matched(0, ()), 0));
    assert_eq!(run(&and(ab.clone()), "xyz"), (RuleResult::Failed, 0));
    assert_eq!(run(&not(ab.clone()), "xyz"), (RuleResult::Matched(0, ()), 0));

    let mut ps = ParserState::new("abc");
    assert_eq!(not(ab).evaluate(&mut ps), RuleResult::Failed);
    assert_eq!(ps.cursor(), 0);
    assert_eq!(
        ps.errors().last().map(|e| e.message.as_str()),
        Some("Wrong Not(Literal)")
    );
}

#[test]
fn map_and_join() {
    let value = digit().map(|c| c.to_digit(10).unwrap_or(0));
    assert_eq!(run(&value, "7"), (RuleResult::Matched(1, 7), 1));

    let dashed = letter().one_or_more().join("-");
    assert_eq!(run(&dashed, "abc1"), (RuleResult::Matched(3, "a-b-c".to_owned()), 3));

    let bracketed = digit().one_or_more().join_with(", ", "[", "]");
    assert_eq!(run(&bracketed, "123"), (RuleResult::Matched(3, "[1, 2, 3]".to_owned()), 3));
}

#[test]
fn lists() {
    let csv = digit().list().separator(char_eq(',')).build();
    assert_eq!(run(&csv, "1,2,3"), (RuleResult::Matched(5, vec!['1', '2', '3']), 5));
    assert_eq!(run(&csv, ""), (RuleResult::Matched(0, vec![]), 0));
    // A dangling separator is left unconsumed.
    assert_eq!(run(&csv, "1,"), (RuleResult::Matched(1, vec!['1']), 1));

    let at_least_two = digit().list().separator(char_eq(',')).min(2).build();
    assert_eq!(run(&at_least_two, "1"), (RuleResult::Failed, 0));
    assert_matches!(run(&at_least_two, "1,2").0, RuleResult::Matched(3, _));

    let at_most_two = digit().list().separator(char_eq(',')).max(2).build();
    assert_eq!(run(&at_most_two, "1,2,3"), (RuleResult::Matched(3, vec!['1', '2']), 3));

    let none = digit().list().max(0).build();
    assert_eq!(run(&none, "1"), (RuleResult::Matched(0, vec![]), 0));

    let bracketed = digit()
        .list()
        .separator(literal(", "))
        .prefix(char_eq('['))
        .postfix(char_eq(']'))
        .build();
    assert_eq!(run(&bracketed, "[]"), (RuleResult::Matched(2, vec![]), 2));
    assert_eq!(run(&bracketed, "[4, 2]"), (RuleResult::Matched(6, vec!['4', '2']), 6));
    assert_eq!(run(&bracketed, "4, 2"), (RuleResult::Failed, 0));
    assert_eq!(run(&bracketed, "[4, 2"), (RuleResult::Failed, 0));

    let unseparated = digit().list().min(1).max(3).build();
    assert_eq!(run(&unseparated, "12345"), (RuleResult::Matched(3, vec!['1', '2', '3']), 3));
}

#[test]
fn list_bounds_are_checked() {
    let result = digit().list().min(3).max(2).try_build();
    assert_eq!(result.unwrap_err(), GrammarError::EmptyRange { min: 3, max: 2 });
}
