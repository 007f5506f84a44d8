//! End-to-end scenarios: source text in, final value or error kind out,
//! running the same statement-at-a-time loop the `stone` binary's driver
//! uses (§6/§8).

use stone_lang::error::{EvalErrorKind, StoneError};
use stone_lang::{environment::Environment, evaluator, grammar, lexer::Lexer, token::TokenStream};

fn run(source: &str) -> Result<String, StoneError> {
    let mut lexer = Lexer::new(source)?;
    let statement = grammar::build();
    let env = Environment::global();
    let mut last = "nil".to_string();

    while lexer.peek(0).kind != stone_lang::token::TokenKind::Eof {
        let node = statement.parse(&mut lexer)?;
        if node.is_empty_marker() {
            continue;
        }
        let value = evaluator::evaluate(&node, &env)?;
        last = value.as_string();
    }

    Ok(last)
}

fn run_err(source: &str) -> EvalErrorKind {
    match run(source) {
        Err(StoneError::Eval(err)) => err.kind,
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}

#[test]
fn arithmetic_respects_precedence() {
    assert_eq!(run("1 + 2 * 3").unwrap(), "7");
}

#[test]
fn a_bare_literal_statement_is_evaluated_not_dropped() {
    assert_eq!(run("42").unwrap(), "42");
    assert_eq!(run(r#""hello""#).unwrap(), "hello");
}

#[test]
fn a_bare_semicolon_is_dropped_without_affecting_the_result() {
    assert_eq!(run("1; ;; 2").unwrap(), "2");
}

#[test]
fn string_concatenation_coerces_the_other_operand() {
    assert_eq!(run(r#""foo" + 1"#).unwrap(), "foo1");
}

#[test]
fn while_loop_accumulates() {
    assert_eq!(
        run("x = 0; i = 1; while i < 5 { x = x + i; i = i + 1 }; x").unwrap(),
        "10"
    );
}

#[test]
fn if_else_picks_the_true_branch() {
    assert_eq!(run("if 0 == 0 { 1 } else { 2 }").unwrap(), "1");
}

#[test]
fn else_if_chain_evaluates_the_first_true_condition() {
    assert_eq!(
        run("x = 2; if x == 1 { 10 } else if x == 2 { 20 } else if x == 3 { 30 } else { 40 }")
            .unwrap(),
        "20"
    );
}

#[test]
fn else_if_chain_falls_through_to_the_final_else() {
    assert_eq!(
        run("x = 9; if x == 1 { 10 } else if x == 2 { 20 } else { 40 }").unwrap(),
        "40"
    );
}

#[test]
fn user_defined_function_call() {
    assert_eq!(run("def add(a, b) { a + b }; add(3, 4)").unwrap(), "7");
}

#[test]
fn closures_capture_their_defining_environment() {
    assert_eq!(
        run("def make(n) { def inc(x) { x + n }; inc }; make(10)(5)").unwrap(),
        "15"
    );
}

#[test]
fn calling_with_the_wrong_arity_is_an_arity_error() {
    assert_eq!(run_err("def f(x) { x }; f(1, 2)"), EvalErrorKind::ArityError);
}

#[test]
fn assigning_to_a_non_name_is_an_assign_target_error() {
    assert_eq!(run_err("1 + 2 = 3"), EvalErrorKind::AssignTargetError);
}

#[test]
fn referencing_an_unbound_name_is_an_undefined_name_error() {
    assert_eq!(run_err("missing + 1"), EvalErrorKind::UndefinedName);
}

#[test]
fn dividing_by_zero_is_reported() {
    assert_eq!(run_err("1 / 0"), EvalErrorKind::DivideByZero);
}

#[test]
fn a_parameter_shadows_a_same_named_outer_binding() {
    assert_eq!(
        run("x = 1; def f(x) { x = 99; x }; f(5); x").unwrap(),
        "1"
    );
}

#[test]
fn assignment_through_a_closure_mutates_the_captured_binding() {
    assert_eq!(
        run("def counter() { n = 0; def bump() { n = n + 1 }; bump(); bump(); n }; counter()")
            .unwrap(),
        "2"
    );
}

#[test]
fn recursion_through_a_named_binding() {
    assert_eq!(
        run(
            "def fact(n) { if n == 0 { 1 } else { n * fact(n - 1) } }; fact(5)"
        )
        .unwrap(),
        "120"
    );
}
