//! Relabeled-style grammar: every alternative gets its own node name.
//!
//! Concrete shape for `1 + 2 * 3  4`:
//! ```text
//! program
//!   seq_more
//!     seq_one
//!       plus
//!         expr
//!           term
//!             factor
//!               1
//!         multiply
//!           term
//!             factor
//!               2
//!           factor
//!             3
//!     expr
//!       term
//!         factor
//!           4
//! ```

use super::{next_pair, unexpected_pair};
use crate::cst::{Child, ConcreteNode, Production, Span, Token};
use crate::error::ParserError;
use crate::Result;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

#[derive(Parser)]
#[grammar = "grammar/relabeled.pest"]
pub struct RelabeledParser;

/// Node names of the relabeled grammar.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RelabeledProduction {
    /// Top rule: zero children, or the finished sequence accumulator.
    Program,
    /// First element of a sequence.
    SeqOne,
    /// Accumulator followed by one more element.
    SeqMore,
    Expr,
    Term,
    Factor,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Production for RelabeledProduction {
    fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::SeqOne => "seq_one",
            Self::SeqMore => "seq_more",
            Self::Expr => "expr",
            Self::Term => "term",
            Self::Factor => "factor",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

type Node = ConcreteNode<RelabeledProduction>;

/// Parse `source` into a relabeled concrete tree rooted at `program`.
pub fn parse(source: &str) -> Result<Node> {
    let program = RelabeledParser::parse(Rule::program, source)
        .map_err(|e| ParserError::Syntax {
            style: "relabeled",
            message: e.to_string(),
        })?
        .next()
        .ok_or_else(|| ParserError::Syntax {
            style: "relabeled",
            message: "no program found".to_string(),
        })?;
    let tree = lower_program(program)?;
    debug!("Lowered relabeled tree with {} elements", tree.size());
    Ok(tree)
}

fn lower_program(pair: Pair<'_, Rule>) -> Result<Node> {
    let span = Span::from(pair.as_span());
    let mut seq: Option<Node> = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::expr => {
                let expr = lower_expr(inner)?;
                seq = Some(match seq.take() {
                    None => Node::spanning(RelabeledProduction::SeqOne, vec![expr.into()]),
                    Some(acc) => Node::spanning(
                        RelabeledProduction::SeqMore,
                        vec![acc.into(), expr.into()],
                    ),
                });
            }
            Rule::EOI => {}
            _ => return Err(unexpected_pair("program", "an expression", &inner)),
        }
    }

    let children = seq.map(Child::from).into_iter().collect();
    Ok(Node::new(RelabeledProduction::Program, span, children))
}

/// `term ((plus | minus) term)*`, folded to the left.
fn lower_expr(pair: Pair<'_, Rule>) -> Result<Node> {
    let span = Span::from(pair.as_span());
    let mut inner = pair.into_inner();

    let first = lower_term(next_pair(&mut inner, "expr", "a term", span)?)?;
    let mut acc = Node::spanning(RelabeledProduction::Expr, vec![first.into()]);

    while let Some(op) = inner.next() {
        let production = match op.as_rule() {
            Rule::plus => RelabeledProduction::Plus,
            Rule::minus => RelabeledProduction::Minus,
            _ => return Err(unexpected_pair("expr", "'+' or '-'", &op)),
        };
        let rhs = lower_term(next_pair(&mut inner, "expr", "a term after operator", span)?)?;
        acc = Node::spanning(production, vec![acc.into(), rhs.into()]);
    }
    Ok(acc)
}

/// `factor ((times | divide) factor)*`, folded to the left.
fn lower_term(pair: Pair<'_, Rule>) -> Result<Node> {
    if pair.as_rule() != Rule::term {
        return Err(unexpected_pair("expr", "a term", &pair));
    }
    let span = Span::from(pair.as_span());
    let mut inner = pair.into_inner();

    let first = lower_factor(next_pair(&mut inner, "term", "a factor", span)?)?;
    let mut acc = Node::spanning(RelabeledProduction::Term, vec![first.into()]);

    while let Some(op) = inner.next() {
        let production = match op.as_rule() {
            Rule::times => RelabeledProduction::Multiply,
            Rule::divide => RelabeledProduction::Divide,
            _ => return Err(unexpected_pair("term", "'*' or '/'", &op)),
        };
        let rhs = lower_factor(next_pair(&mut inner, "term", "a factor after operator", span)?)?;
        acc = Node::spanning(production, vec![acc.into(), rhs.into()]);
    }
    Ok(acc)
}

/// `number | "(" expr ")"`; the parentheses leave no trace.
fn lower_factor(pair: Pair<'_, Rule>) -> Result<Node> {
    if pair.as_rule() != Rule::factor {
        return Err(unexpected_pair("term", "a factor", &pair));
    }
    let span = Span::from(pair.as_span());
    let inner = next_pair(&mut pair.into_inner(), "factor", "a number or expression", span)?;

    let child: Child<RelabeledProduction> = match inner.as_rule() {
        Rule::number => Token::number(inner.as_str(), inner.as_span().into()).into(),
        Rule::expr => lower_expr(inner)?.into(),
        _ => return Err(unexpected_pair("factor", "a number or expression", &inner)),
    };
    Ok(Node::new(RelabeledProduction::Factor, span, vec![child]))
}
