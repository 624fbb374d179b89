//! Rewrite rules for tagged-style trees.
//!
//! `sum` and `product` share one rule: a single child passes through, three
//! children are `left`, operator token, `right`, and the token's text picks
//! the operation. Each rule only accepts the operators of its own precedence
//! level.

use super::{exactly, terminal, Rules, Value};
use crate::ast::{Expr, Operator, Sequence};
use crate::cst::{Production, Span, Token};
use crate::engine::TaggedProduction;
use crate::error::ParserError;
use crate::Result;

/// Rules dispatching on the value of operator tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedRules;

impl Rules for TaggedRules {
    type Production = TaggedProduction;

    fn token(&self, token: Token) -> Result<Value> {
        terminal(token)
    }

    fn node(
        &self,
        production: TaggedProduction,
        span: Span,
        children: Vec<Value>,
    ) -> Result<Value> {
        let name = production.name();
        match production {
            TaggedProduction::Seq => children
                .into_iter()
                .map(|child| child.into_expr(name, span))
                .collect::<Result<Sequence>>()
                .map(Value::Seq),
            TaggedProduction::Sum => {
                binary_or_pass(name, span, children, &[Operator::Plus, Operator::Minus])
            }
            TaggedProduction::Product => {
                binary_or_pass(name, span, children, &[Operator::Multiply, Operator::Divide])
            }
        }
    }
}

fn binary_or_pass(
    name: &'static str,
    span: Span,
    children: Vec<Value>,
    accepted: &[Operator],
) -> Result<Value> {
    match children.len() {
        1 => {
            let [only] = exactly(name, span, children)?;
            Ok(Value::Expr(only.into_expr(name, span)?))
        }
        3 => {
            let [left, op, right] = exactly(name, span, children)?;
            let token = op.into_token(name, span)?;
            let op = token
                .text()
                .parse::<Operator>()
                .ok()
                .filter(|op| accepted.contains(op))
                .ok_or_else(|| ParserError::UnrecognizedOperator {
                    production: name,
                    text: token.text().to_string(),
                    span: token.span(),
                })?;
            Ok(Value::Expr(Expr::binary(
                op,
                left.into_expr(name, span)?,
                right.into_expr(name, span)?,
            )))
        }
        found => Err(ParserError::StructuralArity {
            production: name,
            expected: "1 or 3".to_string(),
            found,
            span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Child, ConcreteNode};
    use crate::transform::{transform, transform_program};
    use TaggedProduction as P;

    fn n(v: u64) -> Expr {
        Expr::literal(v)
    }

    fn num(text: &str) -> Child<P> {
        Token::number(text, Span::default()).into()
    }

    fn op(text: &str) -> Child<P> {
        Token::operator(text, Span::new(2, 3)).into()
    }

    fn node(production: P, children: Vec<Child<P>>) -> Child<P> {
        ConcreteNode::spanning(production, children).into()
    }

    fn root(production: P, children: Vec<Child<P>>) -> ConcreteNode<P> {
        ConcreteNode::spanning(production, children)
    }

    fn leaf_sum(text: &str) -> Child<P> {
        node(P::Sum, vec![node(P::Product, vec![num(text)])])
    }

    #[test]
    fn single_child_passes_through() {
        let value = transform(&TaggedRules, root(P::Sum, vec![node(P::Product, vec![num("7")])]));
        assert_eq!(value, Ok(Value::Expr(n(7))));
    }

    #[test]
    fn operator_text_picks_the_operation() {
        let cases = [
            (P::Sum, "+", Operator::Plus),
            (P::Sum, "-", Operator::Minus),
            (P::Product, "*", Operator::Multiply),
            (P::Product, "/", Operator::Divide),
        ];
        for (production, text, expected) in cases {
            let left = node(production, vec![num("1")]);
            let tree = root(production, vec![left, op(text), num("2")]);
            let value = transform(&TaggedRules, tree).unwrap();
            assert_eq!(value, Value::Expr(Expr::binary(expected, n(1), n(2))));
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let left = node(P::Product, vec![num("1")]);
        let tree = root(P::Product, vec![left, op("%"), num("2")]);
        let err = transform(&TaggedRules, tree).unwrap_err();
        assert_eq!(
            err,
            ParserError::UnrecognizedOperator {
                production: "product",
                text: "%".into(),
                span: Span::new(2, 3),
            }
        );
        assert!(!err.is_defect());
    }

    #[test]
    fn operator_from_another_level_is_rejected() {
        let left = node(P::Sum, vec![node(P::Product, vec![num("1")])]);
        let tree = root(P::Sum, vec![left, op("*"), node(P::Product, vec![num("2")])]);
        assert!(matches!(
            transform(&TaggedRules, tree),
            Err(ParserError::UnrecognizedOperator { production: "sum", .. })
        ));
    }

    #[test]
    fn arity_other_than_one_or_three_is_a_defect() {
        for count in [0, 2, 4] {
            let children = (0..count).map(|_| num("1")).collect();
            let err = transform(&TaggedRules, root(P::Sum, children)).unwrap_err();
            assert!(err.is_defect());
            assert_eq!(
                err,
                ParserError::StructuralArity {
                    production: "sum",
                    expected: "1 or 3".into(),
                    found: count,
                    span: Span::default(),
                }
            );
        }
    }

    #[test]
    fn middle_child_must_be_a_token() {
        let tree = root(P::Sum, vec![num("1"), num("2"), num("3")]);
        let err = transform(&TaggedRules, tree).unwrap_err();
        assert!(matches!(
            err,
            ParserError::UnexpectedChild {
                production: "sum",
                expected: "an operator token",
                ..
            }
        ));
    }

    #[test]
    fn seq_collects_every_child_in_order() {
        let tree = root(P::Seq, vec![leaf_sum("3"), leaf_sum("1"), leaf_sum("2")]);
        let seq = transform_program(&TaggedRules, tree).unwrap();
        assert_eq!(seq.exprs(), &[n(3), n(1), n(2)]);

        let empty = transform_program(&TaggedRules, root(P::Seq, vec![])).unwrap();
        assert!(empty.is_empty());
    }
}
