//! Rewrite rules for relabeled-style trees.

use super::{exactly, terminal, Rules, Value};
use crate::ast::{Expr, Operator, Sequence};
use crate::cst::{Production, Span, Token};
use crate::engine::RelabeledProduction;
use crate::error::ParserError;
use crate::Result;

/// Rules dispatching purely on node names.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelabeledRules;

impl Rules for RelabeledRules {
    type Production = RelabeledProduction;

    fn token(&self, token: Token) -> Result<Value> {
        terminal(token)
    }

    fn node(
        &self,
        production: RelabeledProduction,
        span: Span,
        children: Vec<Value>,
    ) -> Result<Value> {
        use RelabeledProduction as P;
        let name = production.name();

        match production {
            // Wrappers naming a grammar alternative collapse into their child.
            P::Expr | P::Term | P::Factor => {
                let [child] = exactly(name, span, children)?;
                Ok(Value::Expr(child.into_expr(name, span)?))
            }
            P::Plus => binary(Operator::Plus, name, span, children),
            P::Minus => binary(Operator::Minus, name, span, children),
            P::Multiply => binary(Operator::Multiply, name, span, children),
            P::Divide => binary(Operator::Divide, name, span, children),
            P::SeqOne => {
                let [first] = exactly(name, span, children)?;
                let mut seq = Sequence::new();
                seq.push(first.into_expr(name, span)?);
                Ok(Value::Seq(seq))
            }
            P::SeqMore => {
                // The accumulator is moved, extended and handed on; never copied.
                let [acc, next] = exactly(name, span, children)?;
                let mut seq = acc.into_seq(name, span)?;
                seq.push(next.into_expr(name, span)?);
                Ok(Value::Seq(seq))
            }
            P::Program => match children.len() {
                0 => Ok(Value::Seq(Sequence::new())),
                1 => {
                    let [seq] = exactly(name, span, children)?;
                    Ok(Value::Seq(seq.into_seq(name, span)?))
                }
                found => Err(ParserError::StructuralArity {
                    production: name,
                    expected: "0 or 1".to_string(),
                    found,
                    span,
                }),
            },
        }
    }
}

fn binary(op: Operator, name: &'static str, span: Span, children: Vec<Value>) -> Result<Value> {
    let [left, right] = exactly(name, span, children)?;
    Ok(Value::Expr(Expr::binary(
        op,
        left.into_expr(name, span)?,
        right.into_expr(name, span)?,
    )))
}
