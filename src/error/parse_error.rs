use crate::ast::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Encountered a byte that does not begin any token.
    InvalidCharacter {
        /// The rejected character.
        character: char,
        /// The source position where the error occurred.
        pos:       Position,
    },
    /// A string literal was opened but never closed.
    UnterminatedString {
        /// The position of the opening quote.
        pos: Position,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// What was expected and what was found instead.
        message: String,
        /// The source position where the error occurred.
        pos:     Position,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// The position of the last consumed token.
        pos: Position,
    },
    /// A keyword is reserved for future use and has no grammar yet.
    ReservedKeyword {
        /// The reserved word.
        word: String,
        /// The source position where the error occurred.
        pos:  Position,
    },
    /// A statement was not terminated by `;`.
    MissingSemicolon {
        /// The source position where the `;` was expected.
        pos: Position,
    },
}

impl ParseError {
    /// Gets the source position from `self`.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::InvalidCharacter { pos, .. }
            | Self::UnterminatedString { pos }
            | Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos }
            | Self::ReservedKeyword { pos, .. }
            | Self::MissingSemicolon { pos } => *pos,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCharacter { character, pos } => {
                write!(f, "Error at {pos}: Unexpected character '{character}'.")
            },

            Self::UnterminatedString { pos } => {
                write!(f, "Error at {pos}: Unterminated string literal.")
            },

            Self::UnexpectedToken { message, pos } => write!(f, "Error at {pos}: {message}."),

            Self::UnexpectedEndOfInput { pos } => {
                write!(f, "Error at {pos}: Unexpected end of input.")
            },

            Self::ReservedKeyword { word, pos } => write!(f,
                                                          "Error at {pos}: '{word}' is reserved and not supported by this interpreter."),

            Self::MissingSemicolon { pos } => {
                write!(f, "Error at {pos}: Expected ';' after statement.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
