//! Arith Parser Library
//!
//! Parses sequences of arithmetic expressions (unsigned integers, `+ - * /`,
//! parentheses) into a typed AST in two steps:
//! 1. a pest grammar recognizes the text and an adapter shapes the result into
//!    a concrete parse tree ([`cst`]), in one of two grammar styles
//! 2. a leaf-to-root rewrite ([`transform`]) folds that tree into the AST
//!    ([`ast`])
//!
//! ```rust
//! use arith_parser::{parse_source, GrammarStyle};
//!
//! let seq = parse_source("1 + 2 * 3  (4 - 5) - 6", GrammarStyle::Tagged).unwrap();
//! assert_eq!(seq.to_string(), "[(1 + (2 * 3)), ((4 - 5) - 6)]");
//! assert_eq!(format!("{seq:?}"), "seq([Plus(1, Multiply(2, 3)), Minus(Minus(4, 5), 6)])");
//! ```

pub mod ast;
pub mod cst;
pub mod engine;
pub mod error;
pub mod program;
pub mod transform;


// Re-export core types for convenient access
pub use arith_common::GrammarStyle;
pub use ast::{Expr, Operator, Sequence};
pub use error::ParserError;
pub use program::{parse_source, Program};

pub type Result<T> = std::result::Result<T, ParserError>;
