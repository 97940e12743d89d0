//! # dmscript
//!
//! dmscript is an interactive interpreter for a small dynamically-typed
//! scripting language, written in Rust. It lexes, parses, and evaluates
//! programs with variables, lexical block scoping, control flow, and
//! user-defined functions, behind a line-oriented prompt or a script
//! runner.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use log::debug;

use crate::interpreter::{
    evaluator::core::{Context, Flow},
    lexer::tokenize,
    parser::core::parse_program,
    value::core::Value,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related
/// types that represent the syntactic structure of source code as a tree.
/// The AST is built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source positions to AST nodes for error reporting.
/// - Shares function parameter lists and bodies so function values can
///   outlive the tree that declared them.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing,
/// parsing, or evaluating code. It standardizes error reporting and
/// carries detailed information about failures, including messages and
/// source positions for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser,
///   evaluator).
/// - Attaches line/column positions and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and error handling to provide a complete runtime for
/// source code evaluation. It exposes the public API for interpreting
/// and executing programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and
///   value types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// Parses and evaluates a complete program against a context.
///
/// The source is tokenized and parsed up front; parse failure hands no
/// partial tree to evaluation. Statements then run in order. When
/// `echo_results` is set, each top-level statement echoes `=> <value>`
/// to the context output, with assignments suppressed and function
/// declarations shown as their quoted name — the behavior of the
/// interactive prompt. A top-level `return` stops the program and
/// yields its value.
///
/// Returns the last evaluated statement's value, or `None` for an empty
/// program.
///
/// # Errors
/// Returns the first lexical, parse, or runtime error. The context's
/// global scope keeps all definitions made by statements that ran before
/// the failure.
///
/// # Examples
/// ```
/// use dmscript::{interpreter::evaluator::core::Context, run_program};
/// use dmscript::interpreter::value::core::Value;
///
/// let mut context = Context::new();
///
/// let result = run_program("let x = 21; x * 2;", &mut context, false).unwrap();
/// assert_eq!(result, Some(Value::Float(42.0)));
///
/// // 'y' is not defined, so evaluation fails.
/// let result = run_program("y + 1;", &mut context, false);
/// assert!(result.is_err());
/// ```
pub fn run_program(source: &str,
                   context: &mut Context,
                   echo_results: bool)
                   -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let tokens = tokenize(source)?;
    let mut iter = tokens.iter().peekable();
    let statements = parse_program(&mut iter)?;
    debug!("parsed {} top-level statement(s)", statements.len());

    let mut last = None;
    for statement in &statements {
        let flow = context.eval_statement(statement)?;
        let returned = matches!(flow, Flow::Return(_));
        let value = flow.into_value();

        if echo_results {
            context.echo_result(statement, &value);
        }

        last = Some(value);
        if returned {
            break;
        }
    }

    Ok(last)
}
