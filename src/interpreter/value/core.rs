use std::rc::Rc;

use crate::{
    ast::{Position, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::matrix::Matrix,
    },
};

/// The kind of a runtime value, without its payload.
///
/// Used for diagnostics (`type_of`), for type-mismatch messages, and as
/// the element type of matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The `null` value.
    Null,
    /// A boolean.
    Boolean,
    /// A 64-bit signed integer.
    Integer,
    /// A double-precision float.
    Float,
    /// An owned byte string.
    String,
    /// An ordered sequence of values.
    Array,
    /// A dense numeric matrix.
    Matrix,
    /// A callable function.
    Function,
}

impl ValueKind {
    /// The kind's name as it is shown to users.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Matrix => "matrix",
            Self::Function => "function",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Signature of a native (host-implemented) function.
///
/// Natives receive the evaluation context, the already-evaluated argument
/// values, and the position of the call for error reporting.
pub type NativeFn = fn(&mut Context, &[Value], Position) -> EvalResult<Value>;

/// Describes a callable function value.
///
/// `Scripted` functions share their parameter list and body with the
/// declaration node, so the value stays valid after the program tree that
/// declared it has been dropped.
#[derive(Debug, Clone)]
pub enum Function {
    /// A host-implemented primitive.
    Native {
        /// Name the function is registered under.
        name:  &'static str,
        /// Exact number of arguments the handler expects.
        arity: usize,
        /// The handler invoked on call.
        func:  NativeFn,
    },
    /// A function declared in source code.
    Scripted {
        /// The declared name.
        name:   String,
        /// Parameter names, shared with the declaration node.
        params: Rc<Vec<String>>,
        /// The body statement, shared with the declaration node.
        body:   Rc<Statement>,
    },
}

impl Function {
    /// The function's name as shown in diagnostics and display output.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Native { name, .. } => name,
            Self::Scripted { name, .. } => name,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native { name: a, .. }, Self::Native { name: b, .. }) => a == b,
            (Self::Scripted { body: a, .. }, Self::Scripted { body: b, .. }) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Represents a runtime value in the interpreter.
///
/// Only `Null`, `Boolean`, the numeric variants and `String` can be
/// written as literals; `Array` and `Matrix` exist so the value model can
/// carry results produced by host primitives, and `Function` is created by
/// function declarations and the native table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value, `null`.
    Null,
    /// A boolean value (`true` or `false`).
    Boolean(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double-precision float. All numeric literals evaluate to this
    /// variant.
    Float(f64),
    /// An owned string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Self>),
    /// A dense numeric matrix.
    Matrix(Matrix),
    /// A callable function.
    Function(Function),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Matrix(_) => ValueKind::Matrix,
            Self::Function(_) => ValueKind::Function,
        }
    }

    /// Coerces the value to a boolean by truthiness.
    ///
    /// `false`, `null`, numeric zero and the empty string are falsy;
    /// everything else is truthy. This rule governs `if`/`while`
    /// conditions and the logical operators.
    ///
    /// # Example
    /// ```
    /// use dmscript::interpreter::value::core::Value;
    ///
    /// assert!(Value::Float(1.0).truthy());
    /// assert!(!Value::Float(0.0).truthy());
    /// assert!(!Value::String(String::new()).truthy());
    /// assert!(!Value::Null.truthy());
    /// ```
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(n) => *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Matrix(_) | Self::Function(_) => true,
        }
    }

    /// Converts the value to an `f64` for arithmetic, or reports a type
    /// mismatch.
    ///
    /// Accepts the numeric variants and booleans (coerced to 0/1), the
    /// same coercion the arithmetic operators apply.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeMismatch` for any other variant.
    pub fn as_number(&self, pos: Position) -> EvalResult<f64> {
        match self {
            Self::Float(n) => Ok(*n),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(n) => Ok(*n as f64),
            Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => {
                Err(RuntimeError::TypeMismatch { details: format!("expected a number, found {}",
                                                                  self.kind()),
                                                 pos })
            },
        }
    }

    /// Converts the value to a `bool`, or reports a type mismatch.
    ///
    /// Unlike [`Value::truthy`] this is strict: only `Boolean` values are
    /// accepted. Used by the logical-not operator.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeMismatch` for non-boolean variants.
    pub fn as_bool(&self, pos: Position) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => {
                Err(RuntimeError::TypeMismatch { details: format!("expected a boolean, found {}",
                                                                  self.kind()),
                                                 pos })
            },
        }
    }

    /// Returns `true` if the value is one of the numeric variants.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Structural equality with the language's rules.
    ///
    /// Numbers compare numerically across the two numeric variants;
    /// strings and booleans compare by content; `null` equals `null`;
    /// values of different classes are unequal, so `1 == true` is false.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) => *a as f64 == *b,
            (Self::Float(a), Self::Integer(b)) => *a == *b as f64,
            _ if self.kind() == other.kind() => self == other,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:.6}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => write!(f, "[array of {}]", items.len()),
            Self::Matrix(m) => write!(f, "{m}"),
            Self::Function(function) => write!(f, "[function {}]", function.name()),
        }
    }
}
