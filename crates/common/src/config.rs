//! Command line configuration for the arith tools.

use clap::{ArgAction, Parser, ValueEnum};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Grammar convention used to shape the concrete parse tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, ValueEnum, Default)]
pub enum GrammarStyle {
    /// Every alternative has its own node name (plus, minus, seq_one, seq_more, ...),
    /// so rewriting dispatches on node names alone.
    #[default]
    Relabeled,
    /// One node name per rule (seq, sum, product) with the operator text kept
    /// as a token, so rewriting dispatches on token values.
    Tagged,
}

impl GrammarStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Relabeled => "relabeled",
            Self::Tagged => "tagged",
        }
    }
}

impl fmt::Display for GrammarStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Command line arguments for the arith tools
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the arithmetic program, "-" for stdin, or "all" to process all example files
    #[arg(value_name = "PROGRAM")]
    pub program: String,

    /// Grammar style used to build the concrete parse tree
    #[arg(short = 's', long, value_enum, default_value = "relabeled", value_name = "STYLE")]
    pub style: GrammarStyle,

    /// Directory scanned when PROGRAM is "all"
    #[arg(long, default_value = "example", value_name = "DIR")]
    pub example_dir: String,

    /// Print the concrete parse tree before the AST
    #[arg(long, action = ArgAction::SetTrue)]
    pub cst: bool,

    /// Print the AST in constructor form instead of parenthesized infix
    #[arg(long, action = ArgAction::SetTrue)]
    pub structural: bool,

    /// Trace every rewrite rule (overridden by RUST_LOG)
    #[arg(long, short = 'd', action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Config {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn should_process_all(&self) -> bool {
        self.program == "all" || self.program == "--all"
    }

    pub fn read_stdin(&self) -> bool {
        self.program == "-"
    }

    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_program".into())
    }

    pub fn style(&self) -> GrammarStyle {
        self.style
    }

    pub fn example_dir(&self) -> &str {
        &self.example_dir
    }

    pub fn show_cst(&self) -> bool {
        self.cst
    }

    pub fn structural(&self) -> bool {
        self.structural
    }

    /// Default log filter when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else {
            "info"
        }
    }
}

/// All `.txt` files in `dir`, sorted alphabetically.
pub fn get_example_files(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in dir.read_dir()?.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(path);
        }
    }

    files.sort();

    if files.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no .txt files found in {}", dir.display()),
        ));
    }
    Ok(files)
}
