//! Tagged-style grammar: one node name per rule, operator text kept.
//!
//! A `sum` or `product` node has either one child (the operand) or three
//! (`left`, operator token, `right`), where `left` is a node of the same rule.
//! Numerals appear directly as tokens inside `product`.

use super::{next_pair, unexpected_pair};
use crate::cst::{Child, ConcreteNode, Production, Span, Token};
use crate::error::ParserError;
use crate::Result;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

#[derive(Parser)]
#[grammar = "grammar/tagged.pest"]
pub struct TaggedParser;

/// Node names of the tagged grammar.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum TaggedProduction {
    /// Top rule, one child per expression.
    Seq,
    /// Addition and subtraction.
    Sum,
    /// Multiplication and division.
    Product,
}

impl Production for TaggedProduction {
    fn name(self) -> &'static str {
        match self {
            Self::Seq => "seq",
            Self::Sum => "sum",
            Self::Product => "product",
        }
    }
}

type Node = ConcreteNode<TaggedProduction>;

/// Parse `source` into a tagged concrete tree rooted at `seq`.
pub fn parse(source: &str) -> Result<Node> {
    let seq = TaggedParser::parse(Rule::seq, source)
        .map_err(|e| ParserError::Syntax {
            style: "tagged",
            message: e.to_string(),
        })?
        .next()
        .ok_or_else(|| ParserError::Syntax {
            style: "tagged",
            message: "no sequence found".to_string(),
        })?;
    let tree = lower_seq(seq)?;
    debug!("Lowered tagged tree with {} elements", tree.size());
    Ok(tree)
}

fn lower_seq(pair: Pair<'_, Rule>) -> Result<Node> {
    let span = Span::from(pair.as_span());
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::sum => children.push(lower_sum(inner)?.into()),
            Rule::EOI => {}
            _ => return Err(unexpected_pair("seq", "a sum", &inner)),
        }
    }
    Ok(Node::new(TaggedProduction::Seq, span, children))
}

/// Fold `first (op rest)*` into nested `production` nodes.
fn fold_left<'i>(
    production: TaggedProduction,
    pair: Pair<'i, Rule>,
    operand: fn(Pair<'i, Rule>) -> Result<Child<TaggedProduction>>,
) -> Result<Node> {
    let name = production.name();
    let span = Span::from(pair.as_span());
    let mut inner = pair.into_inner();

    let first = operand(next_pair(&mut inner, name, "an operand", span)?)?;
    let mut acc = Node::spanning(production, vec![first]);

    while let Some(op) = inner.next() {
        if !matches!(op.as_rule(), Rule::add_op | Rule::mul_op) {
            return Err(unexpected_pair(name, "an operator", &op));
        }
        let token = Token::operator(op.as_str(), op.as_span().into());
        let rhs = operand(next_pair(&mut inner, name, "an operand after operator", span)?)?;
        acc = Node::spanning(production, vec![acc.into(), token.into(), rhs]);
    }
    Ok(acc)
}

fn lower_sum(pair: Pair<'_, Rule>) -> Result<Node> {
    fold_left(TaggedProduction::Sum, pair, |p| match p.as_rule() {
        Rule::product => Ok(lower_product(p)?.into()),
        _ => Err(unexpected_pair("sum", "a product", &p)),
    })
}

fn lower_product(pair: Pair<'_, Rule>) -> Result<Node> {
    fold_left(TaggedProduction::Product, pair, |p| match p.as_rule() {
        Rule::number => Ok(Token::number(p.as_str(), p.as_span().into()).into()),
        Rule::sum => Ok(lower_sum(p)?.into()),
        _ => Err(unexpected_pair("product", "a number or sum", &p)),
    })
}
