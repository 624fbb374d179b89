//! Grammar engines.
//!
//! Arithmetic sequences are recognized by pest, a PEG parser framework. pest
//! reports repetitions as flat lists of pairs, so each style's adapter folds
//! them into the left-recursive concrete tree the transformer consumes:
//! - [`relabeled`]: `program`, `seq_one`/`seq_more`, `expr`/`term`/`factor`
//!   wrappers and `plus`/`minus`/`multiply`/`divide` nodes
//! - [`tagged`]: `seq`, and `sum`/`product` nodes holding `left op right`

pub mod relabeled;
pub mod tagged;

pub use relabeled::RelabeledProduction;
pub use tagged::TaggedProduction;

use crate::cst::Span;
use crate::error::ParserError;
use crate::Result;
use pest::iterators::{Pair, Pairs};
use pest::RuleType;

/// Adapter failure: pest produced a pair the lowering does not expect.
fn unexpected_pair<R: RuleType>(
    production: &'static str,
    expected: &'static str,
    pair: &Pair<'_, R>,
) -> ParserError {
    ParserError::UnexpectedChild {
        production,
        expected,
        found: format!("{:?} '{}'", pair.as_rule(), pair.as_str()),
        span: pair.as_span().into(),
    }
}

/// Next inner pair, or a failure naming what was missing.
fn next_pair<'i, R: RuleType>(
    pairs: &mut Pairs<'i, R>,
    production: &'static str,
    expected: &'static str,
    span: Span,
) -> Result<Pair<'i, R>> {
    pairs.next().ok_or_else(|| ParserError::UnexpectedChild {
        production,
        expected,
        found: "nothing".to_string(),
        span,
    })
}
