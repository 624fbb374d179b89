//! Reporting for batch runs over the example programs.

use std::fmt;
use std::ops::AddAssign;

use tracing::{error, info};

use crate::GrammarStyle;

/// Shape totals of one parsed program, or of several added together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramStats {
    pub expressions: usize,
    pub literals: usize,
    pub max_depth: usize,
}

impl fmt::Display for ProgramStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expressions, {} literals, max depth {}",
            self.expressions, self.literals, self.max_depth
        )
    }
}

/// Counts add up; depth keeps the deepest.
impl AddAssign for ProgramStats {
    fn add_assign(&mut self, other: Self) {
        self.expressions += other.expressions;
        self.literals += other.literals;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Outcome of parsing every example file with one grammar style.
#[derive(Debug)]
pub struct BatchReport {
    style: GrammarStyle,
    total_files: usize,
    parsed: usize,
    totals: ProgramStats,
    failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn new(style: GrammarStyle, total_files: usize) -> Self {
        info!("Parsing {total_files} example files with the {style} grammar");
        Self {
            style,
            total_files,
            parsed: 0,
            totals: ProgramStats::default(),
            failures: Vec::new(),
        }
    }

    pub fn parsed(&mut self, file_name: &str, stats: ProgramStats) {
        info!("ok      {file_name}: {stats}");
        self.parsed += 1;
        self.totals += stats;
    }

    pub fn failed(&mut self, file_name: &str, reason: impl fmt::Display) {
        error!("failed  {file_name}: {reason}");
        self.failures.push((file_name.to_string(), reason.to_string()));
    }

    #[must_use]
    pub fn totals(&self) -> ProgramStats {
        self.totals
    }

    #[must_use]
    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// Log the summary; `true` when every file parsed.
    pub fn finish(self) -> bool {
        info!(
            "{} grammar: {}/{} files parsed, {}",
            self.style, self.parsed, self.total_files, self.totals
        );
        if self.failures.is_empty() {
            return true;
        }
        let names = self
            .failures
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        error!("{} files failed: {names}", self.failures.len());
        false
    }
}
