//! Tests for statement parsing and operator precedence.

use super::{parse_statements, parse_top_level};
use crate::compiler_frontend::ast::ast_nodes::{Expr, ExprKind, TopLevel};
use crate::compiler_frontend::compiler_errors::ErrorType;

fn expression(source: &str) -> Expr {
    match parse_top_level(source).expect("statement should parse") {
        TopLevel::Expression(expr) => expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = expression("2 + 3 * 4");
    assert_eq!(expr.to_string(), "(2 + (3 * 4))");
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(expression("1 - 2 - 3").to_string(), "((1 - 2) - 3)");
}

#[test]
fn assignment_is_right_associative_and_loosest() {
    assert_eq!(expression("a = b = 1 + 2").to_string(), "(a = (b = (1 + 2)))");
}

#[test]
fn comparisons_sit_between_assignment_and_arithmetic() {
    assert_eq!(expression("x < y + 1").to_string(), "(x < (y + 1))");
}

#[test]
fn calls_take_comma_separated_arguments() {
    let expr = expression("foo(1, x * 2, bar())");
    match expr.kind {
        ExprKind::Call { callee, arguments } => {
            assert_eq!(callee, "foo");
            assert_eq!(arguments.len(), 3);
            assert_eq!(arguments[2].to_string(), "bar()");
        }
        other => panic!("expected a call, got {other:?}"),
    }
}

#[test]
fn for_loop_with_and_without_step() {
    assert_eq!(
        expression("for i = 1, 3 in i").to_string(),
        "(for i = 1, 3 in i)"
    );
    assert_eq!(
        expression("for i = 10, 0, 0 - 2 in printd(i)").to_string(),
        "(for i = 10, 0, (0 - 2) in printd(i))"
    );
}

#[test]
fn var_in_with_optional_initializers() {
    assert_eq!(
        expression("var a = 1, b in a + b").to_string(),
        "(var a = 1, b in (a + b))"
    );
}

#[test]
fn if_then_else() {
    assert_eq!(
        expression("if x < 3 then 1 else 2").to_string(),
        "(if (x < 3) then 1 else 2)"
    );
}

#[test]
fn definitions_accept_space_or_comma_separated_parameters() {
    for source in ["def add(a b) a + b", "def add(a, b) a + b"] {
        match parse_top_level(source).expect("definition should parse") {
            TopLevel::Definition(def) => {
                assert_eq!(def.prototype.name, "add");
                assert_eq!(def.prototype.parameters, vec!["a", "b"]);
                assert_eq!(def.body.to_string(), "(a + b)");
            }
            other => panic!("expected a definition, got {other:?}"),
        }
    }
}

#[test]
fn extern_is_a_bare_prototype() {
    match parse_top_level("extern printd(x)").expect("extern should parse") {
        TopLevel::Extern(prototype) => {
            assert_eq!(prototype.name, "printd");
            assert_eq!(prototype.arity(), 1);
        }
        other => panic!("expected an extern, got {other:?}"),
    }
}

#[test]
fn statements_are_split_on_semicolons() {
    let statements = parse_statements("def f(x) x; ; f(2); 4");
    assert_eq!(statements.len(), 3);
    assert!(statements.iter().all(Result::is_ok));
}

#[test]
fn syntax_error_only_discards_its_own_statement() {
    let statements = parse_statements("1 +; 2 * 3;");
    assert_eq!(statements.len(), 2);

    let error = statements[0].as_ref().expect_err("'1 +' is incomplete");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert!(statements[1].is_ok());
}

#[test]
fn unknown_characters_end_an_expression() {
    // '/' is not an operator, so the statement is missing its ';'
    let error = parse_top_level("4 / 2").expect_err("'/' is not a binary operator");
    assert_eq!(error.error_type, ErrorType::Syntax);
}

#[test]
fn unclosed_call_reports_expected_comma() {
    let error = parse_top_level("foo(1 2)").expect_err("missing comma");
    assert!(error.msg.contains("Expected ','"));
}
