//! The Fabula compiler CLI.
//!
//! Provides the `fabulac` command with three subcommands:
//!
//! - `fabulac lex` - tokenize source, dumping the token stream as JSON
//! - `fabulac parse` - tokenize and parse, dumping the module tree as JSON
//! - `fabulac emit -t {fab,py}` - run the full pipeline and print
//!   canonical surface text or lowered Python text on stdout
//!
//! Each subcommand reads from `-f PATH`, defaulting to stdin.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use fabula_common::Diagnostic;

#[derive(Parser)]
#[command(name = "fabulac", version, about = "The Fabula microcompiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize source, dumping the token stream as JSON
    Lex {
        /// Path to the source file (defaults to stdin)
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },
    /// Tokenize and parse, dumping the module tree as JSON
    Parse {
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },
    /// Run the full pipeline and print the emitted text
    Emit {
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,

        /// Emission target: canonical Fabula surface text, or lowered
        /// Python text
        #[arg(short = 't', long = "target")]
        target: EmitTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EmitTarget {
    Fab,
    Py,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lex { file } => run_lex(file.as_deref()),
        Commands::Parse { file } => run_parse(file.as_deref()),
        Commands::Emit { file, target } => run_emit(file.as_deref(), target),
    };

    if let Err(()) = result {
        process::exit(1);
    }
}

fn read_input(file: Option<&std::path::Path>) -> Result<(String, String), ()> {
    match file {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|e| {
                eprintln!("error: failed to read '{}': {e}", path.display());
            })?;
            Ok((source, path.display().to_string()))
        }
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source).map_err(|e| {
                eprintln!("error: failed to read stdin: {e}");
            })?;
            Ok((source, "<stdin>".to_string()))
        }
    }
}

fn report(diagnostic: &Diagnostic, filename: &str, source: &str) {
    eprint!("{}", diagnostic.render(filename, source));
}

fn run_lex(file: Option<&std::path::Path>) -> Result<(), ()> {
    let (source, filename) = read_input(file)?;
    let tokens = fabula_lexer::lex(&source, &filename).map_err(|e| {
        report(&Diagnostic::error(e.locus, e.to_string()), &filename, &source);
    })?;
    let json = serde_json::to_string_pretty(&tokens).expect("tokens always serialize");
    println!("{json}");
    Ok(())
}

fn run_parse(file: Option<&std::path::Path>) -> Result<(), ()> {
    let (source, filename) = read_input(file)?;
    let module = parse_module(&source, &filename)?;
    let json = serde_json::to_string_pretty(&module).expect("module always serializes");
    println!("{json}");
    Ok(())
}

fn run_emit(file: Option<&std::path::Path>, target: EmitTarget) -> Result<(), ()> {
    let (source, filename) = read_input(file)?;
    let module = parse_module(&source, &filename)?;
    let ctx = fabula_sema::analyze(&module);
    if ctx.has_errors() {
        for diagnostic in &ctx.diagnostics {
            report(diagnostic, &filename, &source);
        }
        return Err(());
    }

    let output = match target {
        EmitTarget::Fab => fabula_fmt::emit_canonical(&module),
        EmitTarget::Py => fabula_lower::emit_lowered(&module, &ctx),
    };
    println!("{output}");
    Ok(())
}

fn parse_module(source: &str, filename: &str) -> Result<fabula_parser::Module, ()> {
    let tokens = fabula_lexer::lex(source, filename).map_err(|e| {
        report(&Diagnostic::error(e.locus, e.to_string()), filename, source);
    })?;
    let tokens = fabula_lexer::prepare(tokens);
    fabula_parser::parse(tokens, filename).map_err(|e| {
        report(&Diagnostic::error(e.locus, e.to_string()), filename, source);
    })
}
