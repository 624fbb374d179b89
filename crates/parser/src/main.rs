use std::io::Read;
use std::path::Path;
use std::process;

use arith_common::{get_example_files, BatchReport, Config};
use arith_parser::{ParserError, Program};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command line arguments
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level())),
        )
        .init();

    if config.should_process_all() {
        if !run_all_examples(&config) {
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run_single(&config) {
        error!("{e}");
        process::exit(1);
    }
}

fn run_single(config: &Config) -> Result<(), ParserError> {
    let source = if config.read_stdin() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(config.program())?
    };

    let mut show_tree = |tree: &str| {
        println!("Parse tree (concrete syntax):");
        print!("{tree}");
    };
    let inspect: Option<&mut dyn FnMut(&str)> = if config.show_cst() {
        Some(&mut show_tree)
    } else {
        None
    };
    let program = Program::from_source_inspecting(&source, config.style(), inspect)?;
    info!("Success parse program {} ({})", config.program_name(), program.stats());

    if config.structural() {
        println!("{:?}", program.sequence());
    } else {
        println!("{}", program.sequence());
    }
    Ok(())
}

fn run_all_examples(config: &Config) -> bool {
    let example_files = match get_example_files(config.example_dir()) {
        Ok(files) => files,
        Err(e) => {
            error!("Error reading example dir '{}': {}", config.example_dir(), e);
            return false;
        }
    };

    let mut report = BatchReport::new(config.style(), example_files.len());
    for path in &example_files {
        let file_name = display_name(path);
        match Program::parse(path, config.style()) {
            Ok(program) => {
                report.parsed(&file_name, program.stats());
                info!("    {}", program.sequence());
            }
            Err(e) => report.failed(&file_name, e),
        }
    }
    report.finish()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
