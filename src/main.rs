use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use dmscript::{interpreter::evaluator::core::Context, run_program};
use rustyline::{DefaultEditor, error::ReadlineError};

/// dmscript is an interactive interpreter for a small dynamically-typed
/// scripting language.
#[derive(Parser, Debug)]
#[command(name = "dmscript", about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Script file to execute. Starts the interactive prompt when
    /// omitted.
    script: Option<PathBuf>,

    /// Print version information.
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if args.version {
        println!("dmscript {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match args.script {
        Some(path) => run_script(&path),
        None => run_repl(),
    }
}

/// Executes a script file and exits with code 1 on any error.
fn run_script(path: &Path) {
    let source = fs::read_to_string(path).unwrap_or_else(|_| {
                     eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                               path.display());
                     process::exit(1);
                 });

    let mut context = Context::new();
    if let Err(e) = run_program(&source, &mut context, true) {
        eprintln!("{e}");
        process::exit(1);
    }
}

/// Runs the interactive prompt against a persistent context.
///
/// Each line is evaluated as a complete program; definitions persist
/// between lines. Errors print to stderr and the prompt resumes.
fn run_repl() {
    println!("dmscript {}", env!("CARGO_PKG_VERSION"));
    println!("Type Ctrl+C or Ctrl+D to exit.");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Could not initialize the prompt: {e}");
            process::exit(1);
        },
    };

    let mut context = Context::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if let Err(e) = run_program(line, &mut context, true) {
                    eprintln!("{e}");
                }
            },

            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,

            Err(e) => {
                eprintln!("{e}");
                break;
            },
        }
    }
}
