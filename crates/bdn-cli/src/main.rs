use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use bdn_core::{canonical_digest, Component, Error, FormatOptions, Formatter};

/// Exit code for a document that failed to parse
const EXIT_INVALID: i32 = 1;
/// Exit code for I/O failures
const EXIT_ERROR: i32 = 2;

/// BDN — document notation CLI
///
/// Validate, format, and hash notation documents.
#[derive(Parser)]
#[command(name = "bdn", version, about, long_about = None)]
struct Cli {
    /// Suppress all output except errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document (lexical + syntax)
    Validate {
        /// Path to .bdn file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a document in canonical form
    Format {
        /// Path to .bdn file
        file: PathBuf,
        /// Deepest nesting rendered before truncating
        #[arg(long, default_value_t = 8)]
        max_depth: usize,
        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },

    /// Compute the canonical digest (SHA-256) of a document
    Hash {
        /// Path to .bdn file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let exit_code = match cli.command {
        Commands::Validate { file, json } => cmd_validate(&file, json, quiet),
        Commands::Format {
            file,
            max_depth,
            indent,
        } => {
            let options = FormatOptions {
                max_depth,
                indent_unit: " ".repeat(indent),
                ..FormatOptions::default()
            };
            cmd_format(&file, options, quiet)
        }
        Commands::Hash { file } => cmd_hash(&file, quiet),
        Commands::Version => {
            if !quiet {
                println!(
                    "bdn {} (bdn-core {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("CARGO_PKG_VERSION")
                );
            }
            0
        }
    };

    process::exit(exit_code);
}

// ── Helpers ───────────────────────────────────────────────

/// Read and parse a document, reporting failures on stderr
fn load(file: &Path) -> Result<Component, i32> {
    let bytes = std::fs::read(file).map_err(|e| {
        eprintln!("{} cannot read {}: {}", "error:".red().bold(), file.display(), e);
        EXIT_ERROR
    })?;
    bdn_core::parse_document(&bytes).map_err(|e| {
        eprintln!("{} {}: {}", "error:".red().bold(), file.display(), e);
        EXIT_INVALID
    })
}

fn error_position(error: &Error) -> Option<(usize, usize)> {
    match error {
        Error::LexicalError { line, column, .. } | Error::SyntaxError { line, column, .. } => {
            Some((*line, *column))
        }
        _ => None,
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_validate(file: &Path, json: bool, quiet: bool) -> i32 {
    let bytes = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{} cannot read {}: {}", "error:".red().bold(), file.display(), e);
            return EXIT_ERROR;
        }
    };

    let result = bdn_core::parse_document(&bytes);
    if json {
        let report = match &result {
            Ok(_) => serde_json::json!({
                "file": file.display().to_string(),
                "valid": true,
                "errors": 0,
            }),
            Err(e) => {
                let (line, column) = error_position(e).unwrap_or((0, 0));
                serde_json::json!({
                    "file": file.display().to_string(),
                    "valid": false,
                    "errors": 1,
                    "message": e.to_string(),
                    "line": line,
                    "column": column,
                })
            }
        };
        println!("{}", report);
        return if result.is_ok() { 0 } else { EXIT_INVALID };
    }

    match result {
        Ok(_) => {
            if !quiet {
                println!("{} {} is valid", "✓".green().bold(), file.display());
            }
            0
        }
        Err(e) => {
            eprintln!("{} {}: {}", "error:".red().bold(), file.display(), e);
            EXIT_INVALID
        }
    }
}

fn cmd_format(file: &Path, options: FormatOptions, quiet: bool) -> i32 {
    let component = match load(file) {
        Ok(component) => component,
        Err(code) => return code,
    };
    if !quiet {
        print!("{}", Formatter::new(options).format_document(&component));
    }
    0
}

fn cmd_hash(file: &Path, quiet: bool) -> i32 {
    let component = match load(file) {
        Ok(component) => component,
        Err(code) => return code,
    };
    if !quiet {
        println!("{}", canonical_digest(&component));
    }
    0
}
