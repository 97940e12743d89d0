use std::iter::Peekable;

use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Consumes the next token and checks that it matches `expected`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the token to check.
/// - `expected`: The token that must come next.
/// - `what`: Human-readable description used in the error message.
/// - `fallback`: Position reported when the input ends instead.
///
/// # Returns
/// The position of the consumed token.
///
/// # Errors
/// Returns a `ParseError` when the next token differs or the input ends.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token,
                                                          what: &str,
                                                          fallback: Position)
                                                          -> ParseResult<Position>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((tok, pos)) if tok == expected => Ok(*pos),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { message: format!("Expected {what}, found {tok:?}"),
                                              pos:     *pos, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { pos: fallback }),
    }
}

/// Consumes the `;` that terminates a statement.
///
/// # Errors
/// Returns `ParseError::MissingSemicolon` at the offending token (or at
/// `fallback` when the input ends) if the terminator is absent.
pub(in crate::interpreter::parser) fn expect_semicolon<'a, I>(tokens: &mut Peekable<I>,
                                                              fallback: Position)
                                                              -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((Token::Semicolon, _)) => Ok(()),
        Some((_, pos)) => Err(ParseError::MissingSemicolon { pos: *pos }),
        None => Err(ParseError::MissingSemicolon { pos: fallback }),
    }
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `Token::Identifier`; keywords are never
/// accepted as names.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the
/// input ends.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              fallback: Position)
                                                              -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((Token::Identifier(name), pos)) => Ok((name.clone(), *pos)),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { message: format!("Expected identifier, found {tok:?}"),
                                              pos:     *pos, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { pos: fallback }),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// Shared by call arguments and parameter lists. The closing token is
/// consumed. An immediately encountered closing token produces an empty
/// list; a trailing comma is not allowed.
///
/// Grammar (simplified): `list := (item ("," item)*)?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or the closer.
/// - `parse_item`: Function used to parse one list element.
/// - `closing`: The token that terminates the list (e.g. `)`).
/// - `fallback`: Position reported when the input ends.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, a separator is
/// malformed, or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    fallback: Position)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut items = Vec::new();

    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, pos)) => {
                return Err(ParseError::UnexpectedToken { message: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         pos:     *pos, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { pos: fallback }),
        }
    }

    Ok(items)
}
