//! Concrete parse trees.
//!
//! A [`ConcreteNode`] is named after the grammar production that produced it
//! and keeps every child the grammar retained, including single-child wrapper
//! nodes and left-recursive accumulators. The production names form a closed
//! enum per grammar style (see [`crate::engine`]), so the transformer can match
//! on them exhaustively.

use std::fmt;

/// Byte range in the source text.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn join(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self::new(span.start(), span.end())
    }
}

/// Lexical category of a terminal.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Operator,
}

impl TokenKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::Operator => "OPERATOR",
        }
    }
}

/// A terminal matched directly from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    #[must_use]
    pub fn number(text: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Number, text, span)
    }

    #[must_use]
    pub fn operator(text: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Operator, text, span)
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind.name(), self.text)
    }
}

/// Closed set of production names for one grammar style.
pub trait Production: Copy + fmt::Debug + Eq {
    /// Name of the production as written in the grammar.
    fn name(self) -> &'static str;
}

/// One child of a concrete node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child<P> {
    Node(ConcreteNode<P>),
    Token(Token),
}

impl<P: Production> Child<P> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Node(node) => node.span(),
            Self::Token(token) => token.span(),
        }
    }
}

impl<P> From<ConcreteNode<P>> for Child<P> {
    fn from(node: ConcreteNode<P>) -> Self {
        Self::Node(node)
    }
}

impl<P> From<Token> for Child<P> {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

/// A node of the concrete parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteNode<P> {
    production: P,
    span: Span,
    children: Vec<Child<P>>,
}

impl<P: Production> ConcreteNode<P> {
    #[must_use]
    pub fn new(production: P, span: Span, children: Vec<Child<P>>) -> Self {
        Self {
            production,
            span,
            children,
        }
    }

    /// Build a node whose span covers all of its children.
    ///
    /// A node without children gets an empty span at offset 0.
    #[must_use]
    pub fn spanning(production: P, children: Vec<Child<P>>) -> Self {
        let span = children
            .iter()
            .map(Child::span)
            .reduce(Span::join)
            .unwrap_or_default();
        Self::new(production, span, children)
    }

    #[must_use]
    #[inline]
    pub fn production(&self) -> P {
        self.production
    }

    #[must_use]
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    #[inline]
    pub fn children(&self) -> &[Child<P>] {
        &self.children
    }

    /// Split into production, span and owned children.
    #[must_use]
    pub fn into_parts(mut self) -> (P, Span, Vec<Child<P>>) {
        let children = std::mem::take(&mut self.children);
        (self.production, self.span, children)
    }

    /// Number of nodes and tokens in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            for child in &node.children {
                match child {
                    Child::Node(n) => stack.push(n),
                    Child::Token(_) => count += 1,
                }
            }
        }
        count
    }

    /// Indented rendering, one node or token per line.
    #[must_use]
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, &Child<P>)> = Vec::new();
        out.push_str(self.production.name());
        out.push('\n');
        stack.extend(self.children.iter().rev().map(|c| (1, c)));

        while let Some((depth, child)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            match child {
                Child::Node(node) => {
                    out.push_str(node.production.name());
                    out.push('\n');
                    stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
                }
                Child::Token(token) => {
                    out.push_str(token.text());
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Left-recursive accumulators nest one level per expression, so children are
/// released from a flat worklist instead of recursively.
impl<P> Drop for ConcreteNode<P> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Child::Node(mut node) = child {
                pending.append(&mut node.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toy {
        Sum,
        Wrap,
    }

    impl Production for Toy {
        fn name(self) -> &'static str {
            match self {
                Self::Sum => "sum",
                Self::Wrap => "wrap",
            }
        }
    }

    fn sample() -> ConcreteNode<Toy> {
        let one = Token::number("1", Span::new(0, 1));
        let plus = Token::operator("+", Span::new(2, 3));
        let two = Token::number("2", Span::new(4, 5));
        let right = ConcreteNode::spanning(Toy::Wrap, vec![two.into()]);
        ConcreteNode::spanning(Toy::Sum, vec![one.into(), plus.into(), right.into()])
    }

    #[test]
    fn spanning_covers_children() {
        let tree = sample();
        assert_eq!(tree.span(), Span::new(0, 5));
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.size(), 5);

        let empty: ConcreteNode<Toy> = ConcreteNode::spanning(Toy::Sum, vec![]);
        assert_eq!(empty.span(), Span::default());
        assert_eq!(empty.size(), 1);
    }

    #[test]
    fn pretty_indents_by_depth() {
        assert_eq!(sample().pretty(), "sum\n  1\n  +\n  wrap\n    2\n");
    }

    #[test]
    fn token_display() {
        let t = Token::operator("*", Span::new(3, 4));
        assert_eq!(t.to_string(), "OPERATOR(\"*\")");
        assert_eq!(t.kind(), TokenKind::Operator);
        assert_eq!(Span::new(3, 4).join(Span::new(0, 1)), Span::new(0, 4));
    }

    #[test]
    fn deep_nesting_is_measured_and_released() {
        let zero = Token::number("0", Span::new(0, 1));
        let mut tree = ConcreteNode::spanning(Toy::Wrap, vec![zero.into()]);
        for _ in 0..200_000 {
            tree = ConcreteNode::new(Toy::Wrap, tree.span(), vec![tree.into()]);
        }
        assert_eq!(tree.size(), 200_002);

        let (production, span, children) = tree.into_parts();
        assert_eq!(production, Toy::Wrap);
        assert_eq!(span, Span::new(0, 1));
        assert_eq!(children.len(), 1);
        drop(children);
    }
}
