use std::io::Write;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{NativeFn, Value},
    },
};

/// Defines the native functions by generating the registration table.
///
/// Each entry provides a string name, an exact arity, and the handler
/// implementing the function. The table is walked once at context
/// creation to populate the global scope.
macro_rules! native_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Registration metadata for one native function.
        pub(crate) struct NativeDef {
            pub name:  &'static str,
            pub arity: usize,
            pub func:  NativeFn,
        }
        pub(crate) static NATIVE_TABLE: &[NativeDef] = &[
            $(
                NativeDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

native_functions! {
    "print"   => { arity: 1, func: print },
    "assert"  => { arity: 1, func: assert_value },
    "type_of" => { arity: 1, func: type_of },
    "len"     => { arity: 1, func: len },
    "str"     => { arity: 1, func: to_text },
}

/// `print(v)` — writes the display form of `v` plus a newline to the
/// context output and yields `null`.
fn print(context: &mut Context, args: &[Value], _pos: Position) -> EvalResult<Value> {
    let _ = writeln!(context.output(), "{}", args[0]);
    Ok(Value::Null)
}

/// `assert(v)` — yields `null` when `v` is truthy, fails otherwise.
fn assert_value(_context: &mut Context, args: &[Value], pos: Position) -> EvalResult<Value> {
    if args[0].truthy() {
        Ok(Value::Null)
    } else {
        Err(RuntimeError::AssertionFailed { pos })
    }
}

/// `type_of(v)` — the value's kind name as a string.
fn type_of(_context: &mut Context, args: &[Value], _pos: Position) -> EvalResult<Value> {
    Ok(Value::String(args[0].kind().name().to_string()))
}

/// `len(v)` — the length of a string (in bytes) or array as a number.
#[allow(clippy::cast_precision_loss)]
fn len(_context: &mut Context, args: &[Value], pos: Position) -> EvalResult<Value> {
    match &args[0] {
        Value::String(s) => Ok(Value::Float(s.len() as f64)),
        Value::Array(items) => Ok(Value::Float(items.len() as f64)),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("len expects a string or array, found {}",
                                                              other.kind()),
                                             pos })
        },
    }
}

/// `str(v)` — the display form of `v` as a string.
fn to_text(_context: &mut Context, args: &[Value], _pos: Position) -> EvalResult<Value> {
    Ok(Value::String(args[0].to_string()))
}
