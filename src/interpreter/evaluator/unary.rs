use crate::{
    ast::{Position, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operator applied to a value.
    ///
    /// `-` requires one of the numeric variants (booleans are not
    /// numbers here); `!` is strict and requires a boolean.
    ///
    /// # Errors
    /// `TypeMismatch` when the operand has the wrong type.
    ///
    /// # Example
    /// ```
    /// use dmscript::{
    ///     ast::{Position, UnaryOperator},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_unary(UnaryOperator::Negate,
    ///                                  &Value::Float(5.0),
    ///                                  Position::default());
    ///
    /// assert_eq!(result.unwrap(), Value::Float(-5.0));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, pos: Position) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => Ok(Value::Integer(-n)),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => {
                    Err(RuntimeError::TypeMismatch { details: format!("cannot negate {}",
                                                                      other.kind()),
                                                     pos })
                },
            },

            UnaryOperator::Not => Ok(Value::Boolean(!value.as_bool(pos)?)),
        }
    }
}
