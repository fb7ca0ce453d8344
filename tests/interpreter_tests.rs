// Integration tests for the fallback interpreter

use pretty_assertions::assert_eq;
use sniprun::interpreter::{evaluate, Interpreter, InterpreterLimits};
use sniprun::runtime::{Environment, Value};
use sniprun::source::SourceUnit;
use sniprun::ExecutionTier;
use std::fs;

fn interpret(source: &str) -> String {
    let result = Interpreter::default().interpret(&SourceUnit::new(source));
    assert!(result.success, "Execution failed: {:?}", result);
    assert_eq!(result.tier, ExecutionTier::Interpreter);
    result.output
}

fn demo(name: &str) -> String {
    let path = format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(path).expect("Failed to read demo file")
}

#[test]
fn test_counted_for_binds_each_value() {
    let output = interpret("for(int i = 1; i <= 3; i++) { System.out.println(\"n:\" + i); }");
    assert_eq!(output, "n:1\nn:2\nn:3\n");
}

#[test]
fn test_loop_variable_is_unbound_after_the_loop() {
    let output = interpret("for (int i = 0; i < 2; i++) System.out.println(i);\nSystem.out.println(i);");
    assert_eq!(output, "0\n1\ni\n");
}

#[test]
fn test_nested_parentheses_in_print() {
    assert_eq!(interpret("System.out.println(\"a\" + (1+2));"), "a3\n");
    assert_eq!(interpret("System.out.println(((\"X\")));"), "X\n");
    assert_eq!(interpret("System.out.println(\"X\");"), "X\n");
}

#[test]
fn test_collections_demo() {
    let output = interpret(&demo("collections.java"));
    assert_eq!(
        output,
        "fruit: APPLE\nfruit: BANANA\nitems: 2\n{apple=3, banana=5}\naverage=4.0\n"
    );
}

#[test]
fn test_loops_demo() {
    let output = interpret(&demo("loops.java"));
    assert_eq!(
        output,
        "i=1 total=1\ni=2 total=3\ni=3 total=6\ni=4 total=10\ni=5 total=15\nT-3\nT-2\nT-1\nbig\n"
    );
}

#[test]
fn test_collection_declaration_ignores_initializer_contents() {
    let output = interpret(
        "List<Integer> xs = new ArrayList<>(java.util.Arrays.asList(1, 2));\nxs.add(7);\nSystem.out.println(xs);",
    );
    assert_eq!(output, "[7]\n");
}

#[test]
fn test_mutation_of_wrong_container_is_ignored() {
    let output = interpret(
        "Map<String, Integer> m = new HashMap<>();\nm.add(1);\nint n = 3;\nn.put(\"a\", 1);\nSystem.out.println(m);\nSystem.out.println(n);",
    );
    assert_eq!(output, "{}\n3\n");
}

#[test]
fn test_unsupported_statements_are_skipped() {
    let output = interpret(
        "int x = 1;\nif (x > 0) { System.out.println(\"never\"); }\ntry { x = 2; } catch (Exception e) { }\nSystem.out.println(x);",
    );
    assert_eq!(output, "1\n");
}

#[test]
fn test_braceless_if_is_skipped_like_a_braced_one() {
    let output = interpret("if (true) System.out.println(\"then\");\nif (true) { System.out.println(\"block\"); }\nSystem.out.println(\"after\");");
    assert_eq!(output, "after\n");
}

#[test]
fn test_int_arithmetic_wraps_at_32_bits() {
    let output = interpret(
        "int x = 2147483647;\nSystem.out.println(x + 1);\nint big = 65536 * 65536;\nSystem.out.println(big);\nx++;\nSystem.out.println(x);",
    );
    assert_eq!(output, "-2147483648\n0\n-2147483648\n");
}

#[test]
fn test_long_variables_keep_64_bits() {
    let output = interpret(
        "long total = 2147483647;\ntotal = total + 1;\nSystem.out.println(total);\nlong step = 1;\nstep = 3000000000L;\nSystem.out.println(step * 2);\nint n = 7;\nn += 2.9;\nSystem.out.println(n);",
    );
    assert_eq!(output, "2147483648\n6000000000\n9\n");
}

#[test]
fn test_full_class_with_helper_method() {
    let source = r#"
public class Test {
    static int helper() {
        return 42;
    }

    public static void main(String[] args) {
        String greeting = "hello";
        System.out.println(greeting.toUpperCase() + " " + greeting.length());
    }
}
"#;
    assert_eq!(interpret(source), "HELLO 5\n");
}

#[test]
fn test_loop_limit_keeps_earlier_output() {
    let mut interpreter = Interpreter::new(InterpreterLimits {
        max_loop_iterations: 2,
        ..InterpreterLimits::default()
    });
    let result = interpreter.interpret(&SourceUnit::new(
        "System.out.println(\"before\");\nfor (;;) { System.out.println(\"spin\"); }",
    ));
    assert!(!result.success);
    assert_eq!(result.output, "before\nspin\nspin\n");
    assert_eq!(result.diagnostics[0].source_line, Some(2));
}

#[test]
fn test_numeric_promotion() {
    let env = Environment::new();
    assert_eq!(evaluate("1 + 2", &env), Value::Int(3));
    assert_eq!(evaluate("1 + 2.0", &env), Value::Double(3.0));
    assert_eq!(evaluate("\"n=\" + (1+2)", &env), Value::text("n=3"));
    assert_eq!(evaluate("7 / 2", &env), Value::Int(3));
    assert_eq!(evaluate("-7 / 2", &env), Value::Int(-3));
    assert_eq!(evaluate("7 / 2.0", &env), Value::Double(3.5));
}

#[test]
fn test_concatenation_folds_left_to_right() {
    let env = Environment::new();
    assert_eq!(evaluate("\"a\" + \"b\" + \"c\"", &env), Value::text("abc"));
    assert_eq!(evaluate("\"x\" + 1 + 2", &env), Value::text("x12"));
    assert_eq!(evaluate("1 + 2 + \"x\"", &env), Value::text("3x"));
}

#[test]
fn test_division_by_zero_stays_unevaluated() {
    let env = Environment::new();
    assert_eq!(evaluate("10 / 0", &env), Value::text("10 / 0"));
    assert_eq!(evaluate("10 % 0", &env), Value::text("10 % 0"));
}

#[test]
fn test_member_call_allow_list() {
    let mut env = Environment::new();
    env.set("s", Value::text("Hi"));
    env.set("xs", Value::List(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(evaluate("s.toUpperCase()", &env), Value::text("HI"));
    assert_eq!(evaluate("s.toLowerCase()", &env), Value::text("hi"));
    assert_eq!(evaluate("s.length()", &env), Value::Int(2));
    assert_eq!(evaluate("xs.size()", &env), Value::Int(2));
    assert_eq!(evaluate("s.trim()", &env), Value::text("s.trim()"));
    assert_eq!(evaluate("unknown.size()", &env), Value::text("unknown.size()"));
}
