use crate::{
    ast::{BinaryOperator, Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// The short-circuit operators take a separate path because they must
    /// decide whether to evaluate the right operand at all; everything
    /// else evaluates both operands first and dispatches on the operator.
    pub(crate) fn eval_binary_expr(&mut self,
                                   op: BinaryOperator,
                                   left: &Expr,
                                   right: &Expr,
                                   pos: Position)
                                   -> EvalResult<Value> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_logical(op, left, right);
        }

        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        Self::eval_binary(op, &lhs, &rhs, pos)
    }

    /// Evaluates `&&` or `||` with short-circuiting.
    ///
    /// The left operand is evaluated and coerced to boolean by
    /// truthiness. When it alone determines the result, the right operand
    /// is never evaluated. The result is always a `Boolean`.
    fn eval_logical(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let lhs = self.eval_expr(left)?.truthy();

        match op {
            BinaryOperator::And if !lhs => Ok(Value::Boolean(false)),
            BinaryOperator::Or if lhs => Ok(Value::Boolean(true)),
            _ => Ok(Value::Boolean(self.eval_expr(right)?.truthy())),
        }
    }

    /// Evaluates a binary operation between two already-computed values.
    ///
    /// - Arithmetic requires numbers (booleans coerce to 0/1) and
    ///   produces `Float`; `/` and `%` with a zero right operand raise
    ///   `DivisionByZero`, and `%` is the IEEE remainder.
    /// - Equality is structural; values of different classes are unequal.
    /// - Relational operators require two numbers and produce `Boolean`.
    /// - The logical operators here see both operands already evaluated
    ///   (the expression path above short-circuits before reaching this).
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `pos`: Source position for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Errors
    /// `TypeMismatch` for unsupported operand types and `DivisionByZero`
    /// for `/` or `%` by zero.
    ///
    /// # Example
    /// ```
    /// use dmscript::{
    ///     ast::{BinaryOperator, Position},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add,
    ///                                   &Value::Float(3.0),
    ///                                   &Value::Float(4.0),
    ///                                   Position::default());
    ///
    /// assert_eq!(result.unwrap(), Value::Float(7.0));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       pos: Position)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod => {
                let lhs = left.as_number(pos)?;
                let rhs = right.as_number(pos)?;

                let result = match op {
                    Add => lhs + rhs,
                    Sub => lhs - rhs,
                    Mul => lhs * rhs,
                    Div | Mod => {
                        if rhs == 0.0 {
                            return Err(RuntimeError::DivisionByZero { pos });
                        }
                        if matches!(op, Div) { lhs / rhs } else { lhs % rhs }
                    },
                    _ => unreachable!("arithmetic operator"),
                };
                Ok(Value::Float(result))
            },

            Equal => Ok(Value::Boolean(left.structural_eq(right))),
            NotEqual => Ok(Value::Boolean(!left.structural_eq(right))),

            Less | Greater | LessEqual | GreaterEqual => {
                if !left.is_numeric() || !right.is_numeric() {
                    return Err(RuntimeError::TypeMismatch { details: format!("cannot compare {} and {} with '{op}'",
                                                                             left.kind(),
                                                                             right.kind()),
                                                            pos });
                }
                let lhs = left.as_number(pos)?;
                let rhs = right.as_number(pos)?;

                let result = match op {
                    Less => lhs < rhs,
                    Greater => lhs > rhs,
                    LessEqual => lhs <= rhs,
                    GreaterEqual => lhs >= rhs,
                    _ => unreachable!("relational operator"),
                };
                Ok(Value::Boolean(result))
            },

            // Operand-level fallback; expression evaluation short-circuits
            // before both sides exist.
            And => Ok(Value::Boolean(left.truthy() && right.truthy())),
            Or => Ok(Value::Boolean(left.truthy() || right.truthy())),
        }
    }
}
