//! Abstract syntax for sequences of arithmetic expressions.
//!
//! - [`Operator`]: `+ | - | * | /`
//! - [`Expr`]: integer literals and binary operations
//! - [`Sequence`]: the expressions of one program, in source order
//!
//! Two renderings are provided. [`fmt::Display`] prints fully parenthesized
//! infix, [`fmt::Debug`] prints constructor style:
//!
//! ```rust
//! use arith_parser::ast::Expr;
//!
//! let e = Expr::plus(Expr::literal(1), Expr::minus(Expr::literal(2), Expr::literal(3)));
//! assert_eq!(e.to_string(), "(1 + (2 - 3))");
//! assert_eq!(format!("{e:?}"), "Plus(1, Minus(2, 3))");
//! ```

use std::str::FromStr;
use std::{fmt, mem};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Operator {
    Plus,     // +
    Minus,    // -
    Multiply, // *
    Divide,   // /
}

impl Operator {
    /// Source symbol of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Constructor name used by the structural rendering.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plus => "Plus",
            Self::Minus => "Minus",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Operator text outside the closed operator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Plus),
            "-" => Ok(Self::Minus),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// A value-producing expression.
///
/// Dropping, comparing and rendering walk the tree with an explicit stack, so
/// chains of any depth are safe to hold.
#[derive(Clone)]
pub enum Expr {
    /// Unsigned integer literal.
    Literal(u64),

    /// `left op right`, each operand owned exclusively.
    BinaryOp {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    #[must_use]
    pub fn literal(value: u64) -> Self {
        Self::Literal(value)
    }

    #[must_use]
    pub fn binary(op: Operator, left: Expr, right: Expr) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn plus(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Plus, left, right)
    }

    #[must_use]
    pub fn minus(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Minus, left, right)
    }

    #[must_use]
    pub fn multiply(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Multiply, left, right)
    }

    #[must_use]
    pub fn divide(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Divide, left, right)
    }

    /// Operator of a binary node, `None` for literals.
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Literal(_) => None,
            Self::BinaryOp { op, .. } => Some(*op),
        }
    }

    /// Height of the tree; a literal has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            match expr {
                Self::Literal(_) => deepest = deepest.max(depth),
                Self::BinaryOp { left, right, .. } => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Number of literal leaves.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Self::Literal(_) => count += 1,
                Self::BinaryOp { left, right, .. } => {
                    stack.push(&**left);
                    stack.push(&**right);
                }
            }
        }
        count
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, structural: bool) -> fmt::Result {
        let mut stack = vec![Piece::Expr(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Op(op) => write!(f, " {op} ")?,
                Piece::Expr(Self::Literal(v)) => write!(f, "{v}")?,
                Piece::Expr(Self::BinaryOp { op, left, right }) => {
                    // Pushed in reverse of the output order.
                    if structural {
                        write!(f, "{}(", op.name())?;
                        stack.extend([
                            Piece::Text(")"),
                            Piece::Expr(right),
                            Piece::Text(", "),
                            Piece::Expr(left),
                        ]);
                    } else {
                        f.write_str("(")?;
                        stack.extend([
                            Piece::Text(")"),
                            Piece::Expr(right),
                            Piece::Op(*op),
                            Piece::Expr(left),
                        ]);
                    }
                }
            }
        }
        Ok(())
    }
}

enum Piece<'a> {
    Expr(&'a Expr),
    Op(Operator),
    Text(&'static str),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, true)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            match pair {
                (Self::Literal(a), Self::Literal(b)) if a == b => {}
                (
                    Self::BinaryOp { op, left, right },
                    Self::BinaryOp {
                        op: other_op,
                        left: other_left,
                        right: other_right,
                    },
                ) if op == other_op => {
                    stack.push((&**left, &**other_left));
                    stack.push((&**right, &**other_right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Expr {}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        detach_operands(self, &mut stack);
        // Every popped node has had its operands taken, so its own drop is shallow.
        while let Some(mut expr) = stack.pop() {
            detach_operands(&mut expr, &mut stack);
        }
    }
}

fn detach_operands(expr: &mut Expr, stack: &mut Vec<Expr>) {
    if let Expr::BinaryOp { left, right, .. } = expr {
        stack.push(mem::replace(&mut **left, Expr::Literal(0)));
        stack.push(mem::replace(&mut **right, Expr::Literal(0)));
    }
}

/// The expressions of one program, in source order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    exprs: Vec<Expr>,
}

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one expression at the end.
    pub fn push(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    #[must_use]
    #[inline]
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.exprs.iter()
    }
}

impl FromIterator<Expr> for Sequence {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Self {
            exprs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Sequence {
    type Item = Expr;
    type IntoIter = std::vec::IntoIter<Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.exprs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Expr;
    type IntoIter = std::slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.exprs.iter()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .exprs
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{items}]")
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .exprs
            .iter()
            .map(|e| format!("{e:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "seq([{items}])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> Expr {
        Expr::literal(v)
    }

    #[test]
    fn operator_symbols_and_parsing() {
        for op in [
            Operator::Plus,
            Operator::Minus,
            Operator::Multiply,
            Operator::Divide,
        ] {
            assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
            assert_eq!(op.to_string(), op.symbol());
        }
        assert_eq!(
            "%".parse::<Operator>(),
            Err(UnknownOperator("%".to_string()))
        );
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let e = Expr::plus(n(1), Expr::minus(n(2), n(3)));
        assert_eq!(e.to_string(), "(1 + (2 - 3))");

        // No precedence shortcuts, even where they would be unambiguous.
        let e = Expr::plus(n(1), Expr::multiply(n(2), n(3)));
        assert_eq!(e.to_string(), "(1 + (2 * 3))");
        assert_eq!(n(7).to_string(), "7");
    }

    #[test]
    fn debug_is_constructor_style() {
        let e = Expr::minus(Expr::plus(n(1), Expr::multiply(n(1), n(2))), n(1));
        assert_eq!(format!("{e:?}"), "Minus(Plus(1, Multiply(1, 2)), 1)");
        let e = Expr::divide(n(6), n(3));
        assert_eq!(format!("{e:?}"), "Divide(6, 3)");
    }

    #[test]
    fn structural_equality() {
        assert_eq!(n(42), Expr::Literal(42));
        assert_ne!(n(42), n(43));
        assert_eq!(
            Expr::plus(n(1), n(2)),
            Expr::binary(Operator::Plus, n(1), n(2))
        );
        assert_ne!(Expr::plus(n(1), n(2)), Expr::plus(n(2), n(1)));
        assert_ne!(Expr::plus(n(1), n(2)), Expr::minus(n(1), n(2)));
    }

    #[test]
    fn sequence_rendering_and_order() {
        let mut seq = Sequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.to_string(), "[]");
        assert_eq!(format!("{seq:?}"), "seq([])");

        seq.push(Expr::plus(n(1), Expr::minus(n(2), n(3))));
        seq.push(Expr::minus(n(2), n(1)));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.to_string(), "[(1 + (2 - 3)), (2 - 1)]");
        assert_eq!(format!("{seq:?}"), "seq([Plus(1, Minus(2, 3)), Minus(2, 1)])");

        let collected: Sequence = seq.iter().cloned().collect();
        assert_eq!(collected, seq);
    }

    #[test]
    fn shape_metrics() {
        let e = Expr::divide(Expr::multiply(n(1), Expr::plus(n(1), n(2))), n(3));
        assert_eq!(e.depth(), 4);
        assert_eq!(e.literal_count(), 4);
        assert_eq!(e.operator(), Some(Operator::Divide));
        assert_eq!(n(0).operator(), None);
    }

    fn left_chain(len: u64) -> Expr {
        (1..len).fold(n(0), |acc, i| Expr::minus(acc, n(i)))
    }

    #[test]
    fn deep_trees_are_walked_without_recursion() {
        let chain = left_chain(200_000);
        assert_eq!(chain.depth(), 200_000);
        assert_eq!(chain.literal_count(), 200_000);

        let text = chain.to_string();
        assert!(text.trim_start_matches('(').starts_with("0 - 1) - 2)"));
        assert!(text.ends_with(" - 199999)"));
        assert!(format!("{chain:?}").ends_with(", 199999)"));

        assert_eq!(chain, left_chain(200_000));
        assert_ne!(chain, left_chain(199_999));
        drop(chain);
    }
}
