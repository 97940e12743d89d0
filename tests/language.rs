use std::{cell::RefCell, fs, io::Write, rc::Rc};

use dmscript::{
    interpreter::{evaluator::core::Context, value::core::Value},
    run_program,
};

/// A writer that keeps its bytes reachable after the context takes
/// ownership of it, so tests can assert on the echoed output.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

type RunResult = Result<Option<Value>, Box<dyn std::error::Error>>;

fn eval(src: &str) -> RunResult {
    let mut context = Context::with_output(Box::new(SharedBuffer::default()));
    run_program(src, &mut context, false)
}

fn eval_value(src: &str) -> Value {
    eval(src).expect("script failed").expect("script produced no value")
}

fn assert_success(src: &str) {
    if let Err(e) = eval(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if eval(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn run_with_echo(src: &str) -> (RunResult, String) {
    let buffer = SharedBuffer::default();
    let mut context = Context::with_output(Box::new(buffer.clone()));
    let result = run_program(src, &mut context, true);
    (result, buffer.contents())
}

fn echoed(src: &str) -> String {
    let (result, output) = run_with_echo(src);
    result.expect("script failed");
    output
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(eval_value("1 + 2 * 3;"), Value::Float(7.0));
    assert_eq!(eval_value("(1 + 2) * 3;"), Value::Float(9.0));
    assert_eq!(eval_value("-2 * 3;"), Value::Float(-6.0));
    assert_eq!(eval_value("10 - 4 - 3;"), Value::Float(3.0));
    assert_eq!(eval_value("10 % 3;"), Value::Float(1.0));
    assert_eq!(eval_value("true + 1;"), Value::Float(2.0));
}

#[test]
fn number_literal_forms() {
    assert_eq!(eval_value("42;"), Value::Float(42.0));
    assert_eq!(eval_value(".5;"), Value::Float(0.5));
    assert_eq!(eval_value("2.5e2;"), Value::Float(250.0));
    assert_eq!(eval_value("1e3;"), Value::Float(1000.0));
    assert_eq!(eval_value("7;").to_string(), "7.000000");
}

#[test]
fn string_literals_pass_through() {
    assert_eq!(eval_value(r#""hello";"#), Value::String("hello".to_string()));
    assert_eq!(eval_value("'single';"), Value::String("single".to_string()));
    // A backslash keeps the next byte verbatim; no interpretation.
    assert_eq!(eval_value(r#"len("a\"b");"#), Value::Float(4.0));
    assert_eq!(eval_value(r#""over
two lines";"#),
               Value::String("over\ntwo lines".to_string()));
}

#[test]
fn comparisons_and_equality() {
    assert_success("assert(2 < 3);");
    assert_success("assert(3 > 2);");
    assert_success("assert(2 <= 2);");
    assert_success("assert(3 >= 3);");
    assert_success("assert(2 != 3);");
    assert_success("assert(2 == 2);");
    assert_success("assert(null == null);");
    assert_success("assert(\"a\" == \"a\");");
    // Values of different classes are never equal.
    assert_eq!(eval_value("1 == true;"), Value::Boolean(false));
    assert_eq!(eval_value("\"1\" == 1;"), Value::Boolean(false));
    assert_eq!(eval_value("null == false;"), Value::Boolean(false));
}

#[test]
fn relational_operators_require_numbers() {
    assert_failure("\"a\" < 1;");
    assert_failure("\"a\" < \"b\";");
    assert_failure("true < 1;");
    assert_failure("null >= null;");
}

#[test]
fn logical_not_is_strict() {
    assert_eq!(eval_value("!true;"), Value::Boolean(false));
    assert_eq!(eval_value("!!false;"), Value::Boolean(false));
    assert_failure("!1;");
    assert_failure("!\"x\";");
    assert_failure("-true;");
    assert_failure("-\"x\";");
}

#[test]
fn short_circuit_skips_right_operand() {
    assert_success("let hits = 0;
                    function touch() { hits = hits + 1; return true; }
                    false && touch();
                    assert(hits == 0);
                    true || touch();
                    assert(hits == 0);
                    true && touch();
                    assert(hits == 1);
                    false || touch();
                    assert(hits == 2);");
}

#[test]
fn logical_operators_return_booleans() {
    assert_eq!(eval_value("1 && 2;"), Value::Boolean(true));
    assert_eq!(eval_value("0 || \"\";"), Value::Boolean(false));
    assert_eq!(eval_value("null || \"text\";"), Value::Boolean(true));
}

#[test]
fn block_scoping_and_shadowing() {
    assert_success("let x = 1; { let x = 2; assert(x == 2); } assert(x == 1);");
    assert_eq!(eval_value("{ let x = 1; { let x = 2; x; } }"), Value::Float(2.0));
    // A `let` binding does not escape its block.
    assert_failure("{ let y = 1; } y;");
}

#[test]
fn assignment_mutates_enclosing_binding() {
    assert_success("let x = 1; { x = 2; } assert(x == 2);");
    assert_failure("undeclared = 1;");
}

#[test]
fn block_value_is_last_statement() {
    assert_eq!(eval_value("{ 1; 2; }"), Value::Float(2.0));
    assert_eq!(eval_value("{ }"), Value::Null);
}

#[test]
fn if_statements_and_dangling_else() {
    assert_eq!(eval_value("if (1 < 2) { \"yes\"; } else { \"no\"; }"),
               Value::String("yes".to_string()));
    assert_eq!(eval_value("if (false) { 1; }"), Value::Null);
    // The else binds to the nearest if.
    assert_eq!(eval_value("if (true) if (false) 1; else 2;"), Value::Float(2.0));
    assert_eq!(eval_value("if (false) if (true) 1; else 2;"), Value::Null);
}

#[test]
fn while_loops() {
    assert_eq!(eval_value("let i = 0; let s = 0;
                           while (i < 5) { s = s + i; i = i + 1; }
                           s;"),
               Value::Float(10.0));
    // A loop that never runs yields null.
    assert_eq!(eval_value("while (false) { 1; }"), Value::Null);
}

#[test]
fn functions_and_calls() {
    assert_success("function add(a, b) { return a + b; } assert(add(2, 5) == 7);");
    assert_success("function ping() { return \"pong\"; } assert(ping() == \"pong\");");
    // Parameters are bound by value.
    assert_success("let n = 1;
                    function bump(n) { n = n + 1; return n; }
                    assert(bump(n) == 2);
                    assert(n == 1);");
}

#[test]
fn recursion() {
    assert_success("function fib(n) {
                        if (n <= 1) { return n; }
                        return fib(n - 1) + fib(n - 2);
                    }
                    assert(fib(6) == 8);
                    assert(fib(10) == 55);");
}

#[test]
fn return_unwinds_nested_blocks_and_loops() {
    assert_success("function f() { { let a = 1; { return 42; } } return 0; }
                    assert(f() == 42);");
    assert_success("function g() {
                        let i = 0;
                        while (true) {
                            i = i + 1;
                            if (i == 3) { return i; }
                        }
                    }
                    assert(g() == 3);");
    assert_success("function h() { return; } assert(h() == null);");
}

#[test]
fn top_level_return_stops_the_program() {
    let mut context = Context::with_output(Box::new(SharedBuffer::default()));
    let result = run_program("return 5; assert(false);", &mut context, false).unwrap();
    assert_eq!(result, Some(Value::Float(5.0)));
}

#[test]
fn wrong_function_arity_is_error() {
    assert_failure("function f(x, y) { return x + y; } f(3);");
    assert_failure("function f(x) { return x; } f(1, 2);");
    assert_failure("len();");
}

#[test]
fn calling_a_non_function_is_error() {
    assert_failure("let g = 3; g(1);");
    assert_failure("missing();");
}

#[test]
fn unknown_variable_is_error() {
    assert_failure("assert(foo == 1);");
}

#[test]
fn division_by_zero_is_error() {
    assert_failure("1 / 0;");
    assert_failure("5 % 0;");
    let err = eval("1 / 0;").unwrap_err();
    assert!(err.to_string().contains("Division by zero"));
}

#[test]
fn syntax_errors_carry_positions() {
    let err = eval("  @").unwrap_err();
    assert_eq!(err.to_string(), "Error at line 1, column 3: Unexpected character '@'.");

    let err = eval("\"abc").unwrap_err();
    assert_eq!(err.to_string(), "Error at line 1, column 1: Unterminated string literal.");

    let err = eval("let x = ;").unwrap_err();
    assert!(err.to_string().starts_with("Error at line 1, column 9:"));
}

#[test]
fn missing_semicolon_is_error() {
    assert_failure("1 + 2");
    assert_failure("let x = 1");
    assert_failure("return 1");
}

#[test]
fn reserved_keywords_are_rejected() {
    assert_failure("for (;;) {}");
    assert_failure("break;");
    assert_failure("continue;");
    assert_failure("import x;");
    assert_failure("class A {}");
    let err = eval("import x;").unwrap_err();
    assert!(err.to_string().contains("'import' is reserved"));
}

#[test]
fn declaration_keywords() {
    assert_success("const c = 1; var v = 2; assert(c + v == 3);");
}

#[test]
fn comments_are_skipped() {
    assert_success("let x = 1; // trailing comment
                    /* a block
                       comment */
                    assert(x == 1);");
    // An unclosed block comment is consumed silently.
    assert_success("assert(true); /* never closed");
}

#[test]
fn native_functions() {
    assert_eq!(eval_value("type_of(\"x\");"), Value::String("string".to_string()));
    assert_eq!(eval_value("type_of(1);"), Value::String("float".to_string()));
    assert_eq!(eval_value("type_of(null);"), Value::String("null".to_string()));
    assert_eq!(eval_value("len(\"abcd\");"), Value::Float(4.0));
    assert_eq!(eval_value("str(5);"), Value::String("5.000000".to_string()));
    assert_eq!(eval_value("str(true);"), Value::String("true".to_string()));
    assert_failure("len(1);");
    assert_failure("assert(false);");
}

#[test]
fn print_writes_to_the_context_output() {
    assert_eq!(echoed("print(\"hi\");"), "hi\n");
    assert_eq!(echoed("print(1 + 1);"), "2.000000\n");
}

#[test]
fn definitions_persist_across_programs() {
    let mut context = Context::with_output(Box::new(SharedBuffer::default()));
    run_program("let x = 10;", &mut context, false).unwrap();
    assert_eq!(run_program("x * 2;", &mut context, false).unwrap(),
               Some(Value::Float(20.0)));

    // The function value keeps its body alive after the declaring
    // program tree is gone.
    run_program("function double(n) { return n * 2; }", &mut context, false).unwrap();
    assert_eq!(run_program("double(21);", &mut context, false).unwrap(),
               Some(Value::Float(42.0)));
}

#[test]
fn repeated_runs_are_identical() {
    let src = "let i = 0; let s = 0; while (i < 5) { s = s + i; i = i + 1; } s; print(s);";
    let first = echoed(src);
    let second = echoed(src);
    assert_eq!(first, second);
}

#[test]
fn empty_program_produces_nothing() {
    assert_eq!(eval("").unwrap(), None);
    assert_eq!(eval("   // just a comment").unwrap(), None);
}

#[test]
fn scenario_simple_addition() {
    assert_eq!(echoed("10 + 5;"), "=> 15.000000\n");
}

#[test]
fn scenario_grouped_arithmetic() {
    assert_eq!(echoed("2 * (10 + 3) / (5 - 2);"), "=> 8.666667\n");
}

#[test]
fn scenario_declaration_then_use() {
    assert_eq!(echoed("let x = 42; x * 2;"), "=> 84.000000\n");
}

#[test]
fn scenario_function_declaration_and_call() {
    assert_eq!(echoed("function add(a, b) { return a + b; } add(3, 7);"),
               "=> \"add\"\n=> 10.000000\n");
}

#[test]
fn scenario_while_loop_sum() {
    assert_eq!(echoed("let i = 0; let s = 0; while (i < 5) { s = s + i; i = i + 1; } s;"),
               "=> 5.000000\n=> 10.000000\n");
}

#[test]
fn scenario_if_else() {
    assert_eq!(echoed("if (1 < 2) { \"yes\"; } else { \"no\"; }"), "=> yes\n");
}

#[test]
fn scenario_fibonacci() {
    assert_eq!(echoed("function fib(n) { if (n <= 1) { return n; } return fib(n-1) + fib(n-2); } fib(6);"),
               "=> \"fib\"\n=> 8.000000\n");
}

#[test]
fn scenario_division_by_zero_produces_no_output() {
    let (result, output) = run_with_echo("1 / 0;");
    assert!(result.is_err());
    assert!(output.is_empty());
}

#[test]
fn example_script_runs() {
    let script = fs::read_to_string("tests/example.dms").expect("missing file");
    assert_success(&script);
}
