use logos::Logos;

use crate::{ast::Position, error::ParseError};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14`, `.5` or `2.1e-10`.
    /// The numeric value is decoded during lexing; the language carries all
    /// numbers as double-precision floats.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens, delimited by matching `'` or `"`.
    ///
    /// A backslash keeps the following byte from terminating the literal;
    /// both bytes are preserved verbatim, no escape interpretation is
    /// performed. Newlines inside strings are legal.
    #[regex(r#""([^"\\]|\\.|\\\n)*""#, parse_string)]
    #[regex(r#"'([^'\\]|\\.|\\\n)*'"#, parse_string)]
    Str(String),
    /// Boolean literal tokens: `true` or `false`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `null`
    #[token("null")]
    Null,
    /// `let`
    #[token("let")]
    Let,
    /// `var`
    #[token("var")]
    Var,
    /// `const`
    #[token("const")]
    Const,
    /// `function`
    #[token("function")]
    Function,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// Keywords that are reserved but have no grammar in this interpreter.
    /// The parser rejects them with a clear message.
    #[token("for", reserved_word)]
    #[token("break", reserved_word)]
    #[token("continue", reserved_word)]
    #[token("import", reserved_word)]
    #[token("matrix", reserved_word)]
    #[token("vector", reserved_word)]
    #[token("int", reserved_word)]
    #[token("float", reserved_word)]
    #[token("string", reserved_word)]
    #[token("bool", reserved_word)]
    #[token("void", reserved_word)]
    #[token("class", reserved_word)]
    #[token("extends", reserved_word)]
    #[token("super", reserved_word)]
    #[token("this", reserved_word)]
    #[token("static", reserved_word)]
    #[token("switch", reserved_word)]
    #[token("case", reserved_word)]
    #[token("default", reserved_word)]
    #[token("export", reserved_word)]
    Reserved(String),
    /// Identifier tokens; variable or function names such as `x` or `add`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,
    /// `/* Multi line comments. */`
    ///
    /// The second pattern consumes an unclosed comment to end of input, so
    /// a missing `*/` is tolerated silently.
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\**", logos::skip)]
    MultiLineComment,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Equals,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,

    /// Spaces, tabs and line breaks.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,
}

/// Parses a numeric literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The decoded value if the slice is a valid number.
/// - `None`: If the slice does not parse (the token is then rejected).
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Extracts the contents of a string literal, dropping the delimiters.
///
/// The bytes between the quotes are kept verbatim, including any backslash
/// and the byte it escaped.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// Parses a boolean literal from the current token slice.
///
/// # Returns
/// - `Some(true)` if the slice is `"true"`.
/// - `Some(false)` if the slice is `"false"`.
/// - `None` otherwise.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Yields the text of a reserved keyword so errors can name it.
fn reserved_word(lex: &logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

/// Maps byte offsets in a source buffer to line/column positions.
///
/// The index is built once per tokenization pass and queried per token, so
/// a token's position always refers to its first byte, including tokens
/// that span several lines (strings, block comments).
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds the index by recording the byte offset of every line start.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset into a 1-based line/column position.
    ///
    /// # Example
    /// ```
    /// use dmscript::interpreter::lexer::LineIndex;
    ///
    /// let index = LineIndex::new("ab\ncd");
    ///
    /// assert_eq!(index.position(4).line, 2);
    /// assert_eq!(index.position(4).column, 2);
    /// ```
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Position { line,
                   column: offset - line_start + 1, }
    }
}

/// Tokenizes a complete source string.
///
/// Produces the token stream paired with each token's starting position,
/// or the first lexical error. Whitespace and comments are skipped; the
/// end of input is represented by the end of the vector.
///
/// # Errors
/// Returns a [`ParseError`] when the source contains an unterminated
/// string literal or a byte that does not begin any token.
///
/// # Example
/// ```
/// use dmscript::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x = 42;").unwrap();
///
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0].0, Token::Let);
/// assert_eq!(tokens[3].0, Token::Number(42.0));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Position)>, ParseError> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        let pos = index.position(lexer.span().start);
        match token {
            Ok(tok) => tokens.push((tok, pos)),
            Err(()) => {
                let slice = lexer.slice();
                if slice.starts_with('"') || slice.starts_with('\'') {
                    return Err(ParseError::UnterminatedString { pos });
                }
                return Err(ParseError::InvalidCharacter { character: slice.chars()
                                                                          .next()
                                                                          .unwrap_or('\0'),
                                                          pos });
            },
        }
    }

    Ok(tokens)
}
