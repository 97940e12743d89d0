use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, Position, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            utils::{expect_token, parse_comma_separated},
        },
    },
};

/// Maps a token to its binary operator and precedence level.
///
/// This single table defines the whole expression grammar above unary
/// operators; adding an operator or a level is an edit here. Higher
/// numbers bind tighter. All listed operators are left-associative.
///
/// # Example
/// ```
/// use dmscript::{ast::BinaryOperator, interpreter::{lexer::Token, parser::expression::binary_operator}};
///
/// assert_eq!(binary_operator(&Token::Plus),
///            Some((BinaryOperator::Add, 5)));
/// assert_eq!(binary_operator(&Token::Semicolon), None);
/// ```
#[must_use]
pub const fn binary_operator(token: &Token) -> Option<(BinaryOperator, u8)> {
    match token {
        Token::PipePipe => Some((BinaryOperator::Or, 1)),
        Token::AmpAmp => Some((BinaryOperator::And, 2)),
        Token::EqualEqual => Some((BinaryOperator::Equal, 3)),
        Token::BangEqual => Some((BinaryOperator::NotEqual, 3)),
        Token::Less => Some((BinaryOperator::Less, 4)),
        Token::Greater => Some((BinaryOperator::Greater, 4)),
        Token::LessEqual => Some((BinaryOperator::LessEqual, 4)),
        Token::GreaterEqual => Some((BinaryOperator::GreaterEqual, 4)),
        Token::Plus => Some((BinaryOperator::Add, 5)),
        Token::Minus => Some((BinaryOperator::Sub, 5)),
        Token::Star => Some((BinaryOperator::Mul, 6)),
        Token::Slash => Some((BinaryOperator::Div, 6)),
        Token::Percent => Some((BinaryOperator::Mod, 6)),
        _ => None,
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It starts the
/// precedence climb at the lowest level, so every operator in the table
/// is accepted.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Position)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let fallback = tokens.peek().map_or_else(Position::default, |(_, pos)| *pos);
    parse_binary(tokens, 1, fallback)
}

/// Precedence-climbing loop for binary operators.
///
/// Parses a unary operand, then folds in operators from the table as
/// long as their precedence is at least `min_precedence`. Recursing with
/// `precedence + 1` for the right operand makes every level
/// left-associative.
fn parse_binary<'a, I>(tokens: &mut Peekable<I>,
                       min_precedence: u8,
                       fallback: Position)
                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut left = parse_unary(tokens, fallback)?;

    while let Some((token, pos)) = tokens.peek() {
        let Some((op, precedence)) = binary_operator(token) else {
            break;
        };
        if precedence < min_precedence {
            break;
        }

        let pos = *pos;
        tokens.next();

        let right = parse_binary(tokens, precedence + 1, pos)?;
        left = Expr::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right),
                              pos };
    }

    Ok(left)
}

/// Parses unary prefix operators.
///
/// `-` and `!` are right-associative: `--x` and `!!x` nest naturally
/// through recursion. Anything else falls through to primary parsing.
fn parse_unary<'a, I>(tokens: &mut Peekable<I>, fallback: Position) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => Some(UnaryOperator::Negate),
        Some((Token::Bang, _)) => Some(UnaryOperator::Not),
        _ => None,
    };

    if let Some(op) = op {
        let (_, pos) = tokens.next().expect("peeked operator");
        let operand = parse_unary(tokens, *pos)?;
        return Ok(Expr::Unary { op,
                                operand: Box::new(operand),
                                pos: *pos, });
    }

    parse_primary(tokens, fallback)
}

/// Parses a primary expression.
///
/// Grammar: `primary := literal | identifier | identifier "(" args ")" |
/// "(" expression ")"`.
///
/// # Errors
/// - `ReservedKeyword` when a reserved word appears in expression
///   position.
/// - `UnexpectedToken` / `UnexpectedEndOfInput` for anything that cannot
///   begin an expression.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>, fallback: Position) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    match tokens.next() {
        Some((Token::Number(n), pos)) => {
            Ok(Expr::Literal { value: LiteralValue::Number(*n),
                               pos:   *pos, })
        },
        Some((Token::Str(s), pos)) => {
            Ok(Expr::Literal { value: LiteralValue::String(s.clone()),
                               pos:   *pos, })
        },
        Some((Token::Bool(b), pos)) => {
            Ok(Expr::Literal { value: LiteralValue::Boolean(*b),
                               pos:   *pos, })
        },
        Some((Token::Null, pos)) => {
            Ok(Expr::Literal { value: LiteralValue::Null,
                               pos:   *pos, })
        },

        Some((Token::Identifier(name), pos)) => {
            if let Some((Token::LParen, _)) = tokens.peek() {
                tokens.next();
                let args =
                    parse_comma_separated(tokens, parse_expression, &Token::RParen, *pos)?;
                return Ok(Expr::Call { callee: name.clone(),
                                       args,
                                       pos: *pos, });
            }
            Ok(Expr::Variable { name: name.clone(),
                                pos:  *pos, })
        },

        Some((Token::LParen, pos)) => {
            let expr = parse_expression(tokens)?;
            expect_token(tokens, &Token::RParen, "closing ')'", *pos)?;
            Ok(expr)
        },

        Some((Token::Reserved(word), pos)) => {
            Err(ParseError::ReservedKeyword { word: word.clone(),
                                              pos:  *pos, })
        },

        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { message: format!("Expected an expression, found {tok:?}"),
                                              pos:     *pos, })
        },

        None => Err(ParseError::UnexpectedEndOfInput { pos: fallback }),
    }
}
