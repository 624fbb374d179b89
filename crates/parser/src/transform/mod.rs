//! Leaf-to-root rewriting of concrete parse trees into the AST.
//!
//! [`transform`] walks a [`ConcreteNode`] in post-order. Terminal tokens go
//! through [`Rules::token`]; every node goes through [`Rules::node`] once all
//! of its children have been rewritten. Each grammar style has one rule set:
//! - [`RelabeledRules`]: alternatives carry their own node names
//!   (`plus`, `minus`, `seq_one`, `seq_more`, ...)
//! - [`TaggedRules`]: one node name per rule, operator text kept as a token
//!
//! The walk keeps its own stack, so long left-recursive chains of sequence
//! nodes do not grow the call stack.

pub mod relabeled;
pub mod tagged;

pub use relabeled::RelabeledRules;
pub use tagged::TaggedRules;

use crate::ast::{Expr, Sequence};
use crate::cst::{Child, ConcreteNode, Production, Span, Token, TokenKind};
use crate::error::ParserError;
use crate::Result;
use tracing::{error, trace};

/// Result of rewriting one concrete child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Expr(Expr),
    Seq(Sequence),
    /// Terminal without a rewrite of its own (operator text).
    Token(Token),
}

impl Value {
    /// Short description used in mismatch diagnostics.
    #[must_use]
    pub fn kind(&self) -> String {
        match self {
            Self::Expr(_) => "an expression".to_string(),
            Self::Seq(_) => "a sequence".to_string(),
            Self::Token(token) => format!("token {token}"),
        }
    }

    /// The expression carried by this value, as required by `production`.
    pub fn into_expr(self, production: &'static str, span: Span) -> Result<Expr> {
        match self {
            Self::Expr(expr) => Ok(expr),
            other => Err(unexpected(production, "an expression", &other, span)),
        }
    }

    /// The sequence accumulator carried by this value.
    pub fn into_seq(self, production: &'static str, span: Span) -> Result<Sequence> {
        match self {
            Self::Seq(seq) => Ok(seq),
            other => Err(unexpected(production, "a sequence", &other, span)),
        }
    }

    /// The raw terminal carried by this value.
    pub fn into_token(self, production: &'static str, span: Span) -> Result<Token> {
        match self {
            Self::Token(token) => Ok(token),
            other => Err(unexpected(production, "an operator token", &other, span)),
        }
    }
}

fn unexpected(
    production: &'static str,
    expected: &'static str,
    found: &Value,
    span: Span,
) -> ParserError {
    ParserError::UnexpectedChild {
        production,
        expected,
        found: found.kind(),
        span,
    }
}

/// One rewrite rule per production of a grammar style.
pub trait Rules {
    type Production: Production;

    /// Rewrite a terminal token.
    fn token(&self, token: Token) -> Result<Value>;

    /// Rewrite a node whose children have already been rewritten, in order.
    fn node(
        &self,
        production: Self::Production,
        span: Span,
        children: Vec<Value>,
    ) -> Result<Value>;
}

struct Frame<P> {
    production: P,
    span: Span,
    pending: std::vec::IntoIter<Child<P>>,
    done: Vec<Value>,
}

impl<P: Production> Frame<P> {
    fn open(node: ConcreteNode<P>) -> Self {
        let (production, span, children) = node.into_parts();
        Self {
            production,
            span,
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }
}

/// Rewrite a whole concrete tree, children before parents.
///
/// Stops at the first failing rule; no partial result is returned.
pub fn transform<R: Rules>(rules: &R, tree: ConcreteNode<R::Production>) -> Result<Value> {
    let mut parents: Vec<Frame<R::Production>> = Vec::new();
    let mut current = Frame::open(tree);

    loop {
        match current.pending.next() {
            Some(Child::Node(node)) => {
                let child = Frame::open(node);
                parents.push(std::mem::replace(&mut current, child));
            }
            Some(Child::Token(token)) => {
                trace!("Processing token {token} at {}", token.span());
                let value = rules.token(token).map_err(report)?;
                current.done.push(value);
            }
            None => {
                let name = current.production.name();
                let children = std::mem::take(&mut current.done);
                trace!(
                    "Processing '{name}' at {} with {} children",
                    current.span,
                    children.len()
                );
                let value = rules
                    .node(current.production, current.span, children)
                    .map_err(report)?;
                match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        current.done.push(value);
                    }
                    None => return Ok(value),
                }
            }
        }
    }
}

/// Rewrite a tree whose root must produce a [`Sequence`].
pub fn transform_program<R: Rules>(
    rules: &R,
    tree: ConcreteNode<R::Production>,
) -> Result<Sequence> {
    let production = tree.production().name();
    let span = tree.span();
    transform(rules, tree)?.into_seq(production, span)
}

fn report(e: ParserError) -> ParserError {
    if e.is_defect() {
        error!("{e}");
    }
    e
}

/// Numeric terminal rule shared by both grammar styles.
///
/// Operator tokens have no rewrite of their own and pass through unchanged.
pub(crate) fn terminal(token: Token) -> Result<Value> {
    match token.kind() {
        TokenKind::Number => literal(&token).map(Value::Expr),
        TokenKind::Operator => Ok(Value::Token(token)),
    }
}

/// Parse a numeral into a literal; leading zeros are allowed.
pub(crate) fn literal(token: &Token) -> Result<Expr> {
    let text = token.text();
    let invalid = |reason: String| ParserError::LexicalValue {
        text: text.to_string(),
        span: token.span(),
        reason,
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a decimal numeral".to_string()));
    }
    text.parse::<u64>()
        .map(Expr::literal)
        .map_err(|e| invalid(e.to_string()))
}

/// Take exactly `N` children, or fail with an arity mismatch.
pub(crate) fn exactly<const N: usize>(
    production: &'static str,
    span: Span,
    children: Vec<Value>,
) -> Result<[Value; N]> {
    <[Value; N]>::try_from(children).map_err(|children| ParserError::StructuralArity {
        production,
        expected: N.to_string(),
        found: children.len(),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Token {
        Token::number(text, Span::new(0, text.len()))
    }

    #[test]
    fn numerals_become_literals() {
        assert_eq!(literal(&num("42")), Ok(Expr::literal(42)));
        assert_eq!(literal(&num("0042")), Ok(Expr::literal(42)));
        assert_eq!(literal(&num("0")), Ok(Expr::literal(0)));
        assert_eq!(
            literal(&num("18446744073709551615")),
            Ok(Expr::literal(u64::MAX))
        );
    }

    #[test]
    fn bad_numerals_are_lexical_errors() {
        for text in ["18446744073709551616", "+5", "", "1_000", "x"] {
            let err = literal(&num(text)).unwrap_err();
            assert!(
                matches!(err, ParserError::LexicalValue { .. }),
                "{text:?} gave {err:?}"
            );
            assert!(!err.is_defect());
        }
    }

    #[test]
    fn operator_tokens_pass_through() {
        let op = Token::operator("+", Span::new(1, 2));
        assert_eq!(terminal(op.clone()), Ok(Value::Token(op)));
    }

    #[test]
    fn exactly_checks_arity() {
        let values = vec![Value::Expr(Expr::literal(1)), Value::Expr(Expr::literal(2))];
        let [a, b] = exactly::<2>("plus", Span::default(), values.clone()).unwrap();
        assert_eq!(a, Value::Expr(Expr::literal(1)));
        assert_eq!(b, Value::Expr(Expr::literal(2)));

        let err = exactly::<3>("sum", Span::new(4, 9), values).unwrap_err();
        assert_eq!(
            err,
            ParserError::StructuralArity {
                production: "sum",
                expected: "3".into(),
                found: 2,
                span: Span::new(4, 9),
            }
        );
    }

    #[test]
    fn value_conversions_report_mismatch() {
        let err = Value::Seq(Sequence::new())
            .into_expr("plus", Span::default())
            .unwrap_err();
        assert!(err.is_defect());
        assert_eq!(
            err.to_string(),
            "Grammar/transformer mismatch: 'plus' expects an expression, found a sequence at 0..0"
        );
    }
}
