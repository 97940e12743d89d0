use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Function, Value},
    },
};

impl Context {
    /// Evaluates a function call.
    ///
    /// The callee is looked up by name in the scope chain and must be a
    /// function value. Arity is checked before any argument is evaluated;
    /// arguments are then evaluated left to right in the caller's scope.
    ///
    /// Scripted functions run their body in a fresh activation scope
    /// pushed on the caller's stack, with parameters bound by value. A
    /// `Return` signal from anywhere inside the body is consumed here and
    /// becomes the call's value; falling off the end yields the body's
    /// last value. The activation scope is popped on every exit path.
    ///
    /// # Parameters
    /// - `callee`: Name of the function being called.
    /// - `args`: Argument expressions in source order.
    /// - `pos`: Position of the call for error reporting.
    ///
    /// # Returns
    /// The call's result value.
    ///
    /// # Errors
    /// - `UndefinedVariable` when no binding exists for the name.
    /// - `NotAFunction` when the binding is not a function value.
    /// - `ArityMismatch` when the argument count differs from the
    ///   parameter count.
    /// - Any error raised while evaluating arguments or the body.
    pub(crate) fn eval_call(&mut self,
                            callee: &str,
                            args: &[Expr],
                            pos: Position)
                            -> EvalResult<Value> {
        let Some(value) = self.get_variable(callee) else {
            return Err(RuntimeError::UndefinedVariable { name: callee.to_string(),
                                                         pos });
        };
        let Value::Function(function) = value.clone() else {
            return Err(RuntimeError::NotAFunction { name: callee.to_string(),
                                                    pos });
        };

        match function {
            Function::Native { name, arity, func } => {
                if args.len() != arity {
                    return Err(RuntimeError::ArityMismatch { name: name.to_string(),
                                                             expected: arity,
                                                             found: args.len(),
                                                             pos });
                }

                let mut arg_vals = Vec::with_capacity(args.len());
                for arg in args {
                    arg_vals.push(self.eval_expr(arg)?);
                }

                func(self, &arg_vals, pos)
            },

            Function::Scripted { name, params, body } => {
                if args.len() != params.len() {
                    return Err(RuntimeError::ArityMismatch { name,
                                                             expected: params.len(),
                                                             found: args.len(),
                                                             pos });
                }

                let mut arg_vals = Vec::with_capacity(args.len());
                for arg in args {
                    arg_vals.push(self.eval_expr(arg)?);
                }

                self.push_scope();
                for (param, value) in params.iter().zip(arg_vals) {
                    self.define_local(param, value);
                }
                let result = self.eval_statement(&body);
                self.pop_scope();

                Ok(result?.into_value())
            },
        }
    }
}
