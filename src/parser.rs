//! The driver: run a rule over a whole text.

use crate::config::ParseConfig;
use crate::error::ParseFailure;
use crate::expr::symbol::Symbol;
use crate::state::ParserState;
use crate::RuleResult;

/// Parse all of `text` with `symbol`, skipping [default
/// whitespace](crate::DEFAULT_WHITESPACE) in rules that ignore it.
pub fn parse<T: Clone + 'static>(symbol: &Symbol<T>, text: &str) -> Result<T, ParseFailure> {
    parse_with(symbol, text, &ParseConfig::default())
}

/// Parse all of `text` with `symbol` under `config`.
///
/// The rule must consume the whole text; a match that stops early fails with
/// `Text is too long` at the position where it stopped.
pub fn parse_with<T: Clone + 'static>(
    symbol: &Symbol<T>,
    text: &str,
    config: &ParseConfig,
) -> Result<T, ParseFailure> {
    let mut ps = ParserState::with_config(text, config);
    let result = symbol.expr().evaluate(&mut ps);

    match result {
        RuleResult::Matched(_, value) if ps.is_eof() => {
            peg_trace!("Parsed `{}`: {} chars", symbol.name(), ps.len());
            Ok(value)
        }
        RuleResult::Matched(..) => {
            ps.record_failure("Text is too long");
            peg_trace!("Rule `{}` stopped at {} of {}", symbol.name(), ps.cursor(), ps.len());
            Err(ParseFailure {
                errors: ps.take_errors(),
            })
        }
        RuleResult::Failed => {
            peg_trace!("Rule `{}` failed with {} errors", symbol.name(), ps.errors().len());
            Err(ParseFailure {
                errors: ps.take_errors(),
            })
        }
    }
}
