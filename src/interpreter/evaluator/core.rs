use std::{
    collections::HashMap,
    io::{self, Write},
    rc::Rc,
};

use log::debug;

use crate::{
    ast::{Expr, LiteralValue, Position, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::native::NATIVE_TABLE,
        value::core::{Function, Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The out-of-band control-flow result of a statement.
///
/// `return` is not a value: it is a signal that unwinds evaluation out of
/// the current function activation. Blocks and loops propagate the signal
/// unchanged; a function call consumes it and converts it back into a
/// plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// The statement completed and produced this value.
    Normal(Value),
    /// A `return` statement is unwinding with this value.
    Return(Value),
}

impl Flow {
    /// Unwraps the carried value, discarding the control-flow distinction.
    ///
    /// Used at the boundaries that consume a `Return`: function calls and
    /// the top of the program.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(value) | Self::Return(value) => value,
        }
    }
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the stack of lexical scopes
/// (the first entry is the global scope, pre-populated with the native
/// functions) and the output stream that result echoes and `print` write
/// to.
///
/// ## Usage
///
/// A `Context` is created once and reused across evaluations, so variables
/// and functions defined by one program remain visible to the next — the
/// behavior an interactive prompt needs.
pub struct Context {
    /// Innermost scope last. The first entry is the global scope and is
    /// never popped.
    pub scope_stack: Vec<HashMap<String, Value>>,
    output:          Box<dyn Write>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a new evaluation context whose global scope contains the
    /// native functions and whose output is standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates a context that writes result echoes and `print` output to
    /// the given writer. Used by the test suite to capture output.
    #[must_use]
    pub fn with_output(output: Box<dyn Write>) -> Self {
        let mut globals = HashMap::new();
        for def in NATIVE_TABLE {
            globals.insert(def.name.to_string(),
                           Value::Function(Function::Native { name:  def.name,
                                                              arity: def.arity,
                                                              func:  def.func, }));
        }
        debug!("registered {} native function(s)", NATIVE_TABLE.len());

        Self { scope_stack: vec![globals],
               output }
    }

    /// The stream that result echoes and the `print` native write to.
    pub(crate) fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Writes the `=> value` echo for one evaluated top-level statement.
    ///
    /// Plain assignments and declarations stay silent; function
    /// declarations echo their name in quotes; any other statement echoes
    /// its value unless the value is `null`.
    pub(crate) fn echo_result(&mut self, statement: &Statement, value: &Value) {
        match statement {
            Statement::Assignment { .. } => {},
            Statement::Function(def) => {
                let _ = writeln!(self.output, "=> \"{}\"", def.name);
            },
            _ => {
                if !matches!(value, Value::Null) {
                    let _ = writeln!(self.output, "=> {value}");
                }
            },
        }
    }

    /// Evaluates a single statement.
    ///
    /// Every statement yields a [`Flow`]: the produced value, or a
    /// `Return` signal travelling outward. Statements may modify the
    /// context (declarations, assignments, function declarations).
    ///
    /// # Parameters
    /// - `statement`: Statement to evaluate.
    ///
    /// # Returns
    /// The statement's control-flow result.
    ///
    /// # Errors
    /// Any [`RuntimeError`] raised while evaluating the statement or the
    /// expressions inside it.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Expression { expr, .. } => Ok(Flow::Normal(self.eval_expr(expr)?)),

            Statement::Assignment { name,
                                    value,
                                    is_declaration,
                                    pos, } => {
                let value = self.eval_expr(value)?;
                if *is_declaration {
                    self.define_local(name, value.clone());
                } else {
                    if self.get_variable(name).is_none() {
                        return Err(RuntimeError::UndefinedVariable { name: name.clone(),
                                                                     pos:  *pos, });
                    }
                    self.assign_nearest(name, value.clone());
                }
                Ok(Flow::Normal(value))
            },

            Statement::Function(def) => {
                let function = Function::Scripted { name:   def.name.clone(),
                                                    params: Rc::clone(&def.params),
                                                    body:   Rc::clone(&def.body), };
                self.define_local(&def.name, Value::Function(function));
                Ok(Flow::Normal(Value::String(def.name.clone())))
            },

            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            },

            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval_expr(condition)?.truthy() {
                    self.eval_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval_statement(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            },

            Statement::While { condition, body, .. } => {
                let mut last = Value::Null;
                while self.eval_expr(condition)?.truthy() {
                    match self.eval_statement(body)? {
                        Flow::Normal(value) => last = value,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal(last))
            },

            Statement::Block { statements, .. } => {
                self.push_scope();
                let result = self.eval_statements(statements);
                self.pop_scope();
                result
            },
        }
    }

    /// Evaluates a sequence of statements in the current scope.
    ///
    /// The sequence's value is the last statement's value, or `Null` when
    /// it is empty. A `Return` signal stops the sequence and propagates.
    ///
    /// # Errors
    /// The first [`RuntimeError`] raised by a statement.
    pub fn eval_statements(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        let mut last = Value::Null;

        for statement in statements {
            match self.eval_statement(statement)? {
                Flow::Normal(value) => last = value,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }

        Ok(Flow::Normal(last))
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The
    /// evaluator dispatches on the expression variant: literals,
    /// variables, unary and binary operations, and function calls.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The computed [`Value`].
    ///
    /// # Errors
    /// Any [`RuntimeError`] raised by the expression.
    ///
    /// # Example
    /// ```
    /// use dmscript::{
    ///     ast::{Expr, LiteralValue, Position},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut context = Context::new();
    /// let expr = Expr::Literal { value: LiteralValue::Number(10.0),
    ///                            pos:   Position::default(), };
    ///
    /// assert_eq!(context.eval_expr(&expr).unwrap(), Value::Float(10.0));
    /// ```
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Self::eval_literal(value)),
            Expr::Variable { name, pos } => self.eval_variable(name, *pos),
            Expr::Unary { op, operand, pos } => {
                let value = self.eval_expr(operand)?;
                Self::eval_unary(*op, &value, *pos)
            },
            Expr::Binary { op, left, right, pos } => self.eval_binary_expr(*op, left, right, *pos),
            Expr::Call { callee, args, pos } => self.eval_call(callee, args, *pos),
        }
    }

    /// Converts a literal node into its runtime value.
    ///
    /// Number literals become `Float`; literals never produce errors.
    #[must_use]
    pub fn eval_literal(literal: &LiteralValue) -> Value {
        match literal {
            LiteralValue::Number(n) => Value::Float(*n),
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Boolean(b) => Value::Boolean(*b),
            LiteralValue::Null => Value::Null,
        }
    }

    /// Looks up a variable in the scope chain.
    ///
    /// # Errors
    /// Returns `RuntimeError::UndefinedVariable` carrying the name when no
    /// scope binds it.
    pub fn eval_variable(&self, name: &str, pos: Position) -> EvalResult<Value> {
        self.get_variable(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             pos })
    }

    /// Pushes a new local scope.
    ///
    /// A fresh empty scope is added on top of the scope stack. Used for
    /// blocks and function activations.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Removes the innermost local scope, releasing every value bound in
    /// it. Called when leaving a block or function activation on any exit
    /// path.
    pub fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Retrieves a variable from the current scope stack.
    ///
    /// Lookup begins at the innermost scope and proceeds outward toward
    /// the global scope. Returns `None` if the variable is not defined in
    /// any active scope.
    ///
    /// # Example
    /// ```
    /// use dmscript::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    /// context.define_local("x", Value::Float(5.0));
    ///
    /// assert_eq!(context.get_variable("x"), Some(&Value::Float(5.0)));
    /// assert_eq!(context.get_variable("y"), None);
    /// ```
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        for scope in self.scope_stack.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        None
    }

    /// Defines a variable in the current (innermost) scope.
    ///
    /// An existing binding with the same name in that scope is replaced
    /// and its previous value released. Parent scopes are never touched,
    /// so declarations shadow outer bindings for the lifetime of the
    /// scope.
    ///
    /// # Panics
    /// Panics if no scope exists, which indicates an internal error.
    pub fn define_local(&mut self, name: &str, value: Value) {
        self.scope_stack
            .last_mut()
            .expect("at least the global scope")
            .insert(name.to_string(), value);
    }

    /// Assigns a value to the nearest scope containing the variable.
    ///
    /// Search proceeds from the innermost scope outward, so assignment
    /// mutates the binding a lookup would find. Callers are expected to
    /// have checked that the binding exists; when it does not, the value
    /// lands in the innermost scope.
    ///
    /// # Example
    /// ```
    /// use dmscript::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    /// context.define_local("y", Value::Float(1.0));
    ///
    /// context.assign_nearest("y", Value::Float(5.0));
    ///
    /// assert_eq!(context.get_variable("y"), Some(&Value::Float(5.0)));
    /// ```
    pub fn assign_nearest(&mut self, name: &str, value: Value) {
        for scope in self.scope_stack.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
}
