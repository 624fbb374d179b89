//! Parsed arithmetic programs.
//!
//! A program is the [`Sequence`] of expressions found in one source text,
//! together with the grammar style that produced it.

use crate::ast::{Expr, Sequence};
use crate::cst::Production;
use crate::engine::{relabeled, tagged};
use crate::transform::{transform_program, RelabeledRules, TaggedRules};
use crate::{GrammarStyle, Result};
use arith_common::ProgramStats;
use std::path::Path;
use std::{fmt, fs};
use tracing::debug;

/// Parse and transform `source` with the given grammar style.
///
/// Empty input (or input holding only whitespace) yields an empty sequence.
pub fn parse_source(source: &str, style: GrammarStyle) -> Result<Sequence> {
    parse_inspecting(source, style, None)
}

/// Like [`parse_source`], but hands the indented concrete tree to `inspect`
/// before it is transformed. The source is parsed once.
pub fn parse_inspecting(
    source: &str,
    style: GrammarStyle,
    inspect: Option<&mut dyn FnMut(&str)>,
) -> Result<Sequence> {
    let seq = match style {
        GrammarStyle::Relabeled => {
            let tree = relabeled::parse(source)?;
            if let Some(inspect) = inspect {
                inspect(&tree.pretty());
            }
            debug!("Transforming concrete tree rooted at '{}'", tree.production().name());
            transform_program(&RelabeledRules, tree)?
        }
        GrammarStyle::Tagged => {
            let tree = tagged::parse(source)?;
            if let Some(inspect) = inspect {
                inspect(&tree.pretty());
            }
            debug!("Transforming concrete tree rooted at '{}'", tree.production().name());
            transform_program(&TaggedRules, tree)?
        }
    };
    debug!("Built sequence of {} expressions", seq.len());
    Ok(seq)
}

/// Indented concrete parse tree of `source`, as shaped for `style`.
pub fn concrete_tree(source: &str, style: GrammarStyle) -> Result<String> {
    Ok(match style {
        GrammarStyle::Relabeled => relabeled::parse(source)?.pretty(),
        GrammarStyle::Tagged => tagged::parse(source)?.pretty(),
    })
}

/// A complete arithmetic program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    style: GrammarStyle,
    sequence: Sequence,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=============================================")?;
        writeln!(f, "ARITH PROGRAM ({} grammar)", self.style)?;
        writeln!(f, "=============================================")?;
        for (i, expr) in self.sequence.iter().enumerate() {
            writeln!(f, "[{i}] {expr}")?;
        }
        Ok(())
    }
}

impl Program {
    /// Read and parse a program file.
    pub fn parse(path: impl AsRef<Path>, style: GrammarStyle) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_source(&source, style)
    }

    /// Parse a program held in memory.
    pub fn from_source(source: &str, style: GrammarStyle) -> Result<Self> {
        Self::from_source_inspecting(source, style, None)
    }

    /// Parse a program held in memory, showing its concrete tree to `inspect`.
    pub fn from_source_inspecting(
        source: &str,
        style: GrammarStyle,
        inspect: Option<&mut dyn FnMut(&str)>,
    ) -> Result<Self> {
        let sequence = parse_inspecting(source, style, inspect)?;
        Ok(Self { style, sequence })
    }

    #[must_use]
    #[inline]
    pub fn style(&self) -> GrammarStyle {
        self.style
    }

    #[must_use]
    #[inline]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[must_use]
    #[inline]
    pub fn exprs(&self) -> &[Expr] {
        self.sequence.exprs()
    }

    #[must_use]
    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }

    /// Deepest expression tree in the program, 0 when empty.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.exprs().iter().map(Expr::depth).max().unwrap_or(0)
    }

    /// Literal leaves over all expressions.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.exprs().iter().map(Expr::literal_count).sum()
    }

    #[must_use]
    pub fn stats(&self) -> ProgramStats {
        ProgramStats {
            expressions: self.exprs().len(),
            literals: self.literal_count(),
            max_depth: self.max_depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_expressions() {
        let program = Program::from_source("1 + 2\n(3)", GrammarStyle::Relabeled).unwrap();
        let text = program.to_string();
        assert!(text.contains("ARITH PROGRAM (relabeled grammar)"));
        assert!(text.ends_with("[0] (1 + 2)\n[1] 3\n"));
    }

    #[test]
    fn stats_summarize_the_sequence() {
        let program = Program::from_source("1 * (2 + 3)  4", GrammarStyle::Tagged).unwrap();
        assert_eq!(program.style(), GrammarStyle::Tagged);
        assert_eq!(program.max_depth(), 3);
        assert_eq!(program.literal_count(), 4);
        assert_eq!(
            program.stats().to_string(),
            "2 expressions, 4 literals, max depth 3"
        );

        let empty = Program::from_source("", GrammarStyle::Tagged).unwrap();
        assert_eq!(empty.max_depth(), 0);
        assert!(empty.into_sequence().is_empty());
    }

    #[test]
    fn concrete_tree_follows_the_style() {
        let relabeled = concrete_tree("2", GrammarStyle::Relabeled).unwrap();
        assert!(relabeled.starts_with("program\n  seq_one\n"));
        let tagged = concrete_tree("2", GrammarStyle::Tagged).unwrap();
        assert_eq!(tagged, "seq\n  sum\n    product\n      2\n");
    }

    #[test]
    fn inspection_sees_the_tree_that_is_transformed() {
        let mut seen = Vec::new();
        let mut record = |tree: &str| seen.push(tree.to_string());
        let program =
            Program::from_source_inspecting("2", GrammarStyle::Tagged, Some(&mut record)).unwrap();
        assert_eq!(program.exprs(), &[Expr::literal(2)]);
        assert_eq!(seen, ["seq\n  sum\n    product\n      2\n"]);

        // The tree is shown even when the transform then rejects it.
        seen.clear();
        let mut record = |tree: &str| seen.push(tree.to_string());
        let err = parse_inspecting(
            "99999999999999999999",
            GrammarStyle::Relabeled,
            Some(&mut record),
        )
        .unwrap_err();
        assert!(matches!(err, crate::ParserError::LexicalValue { .. }));
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("program\n"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Program::parse("no/such/program.txt", GrammarStyle::Relabeled).unwrap_err();
        assert!(matches!(err, crate::ParserError::Io(_)));
    }
}
