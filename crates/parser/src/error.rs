use crate::cst::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Syntax error ({style} grammar):\n{message}")]
    Syntax {
        style: &'static str,
        message: String,
    },

    #[error("Parser error: invalid numeral '{text}' at {span}: {reason}")]
    LexicalValue {
        text: String,
        span: Span,
        reason: String,
    },

    #[error("Parser error: unrecognized operator '{text}' in '{production}' at {span}")]
    UnrecognizedOperator {
        production: &'static str,
        text: String,
        span: Span,
    },

    #[error(
        "Grammar/transformer mismatch: '{production}' expects {expected} children, found {found} at {span}"
    )]
    StructuralArity {
        production: &'static str,
        expected: String,
        found: usize,
        span: Span,
    },

    #[error(
        "Grammar/transformer mismatch: '{production}' expects {expected}, found {found} at {span}"
    )]
    UnexpectedChild {
        production: &'static str,
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl ParserError {
    /// `true` when the error means the grammar and the transformer rules have
    /// drifted apart, as opposed to a property of the input text.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::StructuralArity { .. } | Self::UnexpectedChild { .. }
        )
    }
}

impl From<std::io::Error> for ParserError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
