use crate::ast::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source position where the error occurred.
        pos:  Position,
    },
    /// Called a name that is not bound to a function value.
    NotAFunction {
        /// The name that was called.
        name: String,
        /// The source position where the error occurred.
        pos:  Position,
    },
    /// An operator or operation received a value of the wrong type.
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source position where the error occurred.
        pos:     Position,
    },
    /// The wrong number of arguments was supplied to a function.
    ArityMismatch {
        /// The name of the function.
        name:     String,
        /// The number of parameters the function declares.
        expected: usize,
        /// The number of arguments that were supplied.
        found:    usize,
        /// The source position of the call.
        pos:      Position,
    },
    /// `/` or `%` with a zero divisor.
    DivisionByZero {
        /// The source position where the error occurred.
        pos: Position,
    },
    /// An `assert(..)` call received a falsy value.
    AssertionFailed {
        /// The source position of the call.
        pos: Position,
    },
}

impl RuntimeError {
    /// Gets the source position from `self`.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UndefinedVariable { pos, .. }
            | Self::NotAFunction { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::ArityMismatch { pos, .. }
            | Self::DivisionByZero { pos }
            | Self::AssertionFailed { pos } => *pos,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, pos } => {
                write!(f, "Runtime error at {pos}: Undefined variable '{name}'.")
            },

            Self::NotAFunction { name, pos } => {
                write!(f, "Runtime error at {pos}: '{name}' is not a function.")
            },

            Self::TypeMismatch { details, pos } => {
                write!(f, "Runtime error at {pos}: Type mismatch: {details}.")
            },

            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  pos, } => write!(f,
                                                   "Runtime error at {pos}: Function '{name}' expects {expected} argument(s), but got {found}."),

            Self::DivisionByZero { pos } => {
                write!(f, "Runtime error at {pos}: Division by zero.")
            },

            Self::AssertionFailed { pos } => {
                write!(f, "Runtime error at {pos}: Assertion failed.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
