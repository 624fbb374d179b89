//! Shared command line configuration and reporting for the arith tools.

pub mod config;
pub mod formatter;

pub use config::{get_example_files, Config, GrammarStyle};
pub use formatter::{BatchReport, ProgramStats};
