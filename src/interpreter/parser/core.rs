use std::iter::Peekable;

use crate::{
    ast::{Position, Statement},
    error::ParseError,
    interpreter::{lexer::Token, parser::statement::parse_statement},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete program: statements until the token stream ends.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Position)` pairs.
///
/// # Returns
/// The program's statements in source order.
///
/// # Errors
/// Returns the first [`ParseError`] encountered; no partial tree is
/// handed to the caller.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut statements = Vec::new();

    while tokens.peek().is_some() {
        statements.push(parse_statement(tokens)?);
    }

    Ok(statements)
}
