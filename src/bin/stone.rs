//! The `stone` command-line driver (§6): reads a script file, then loops
//! parsing and evaluating one top-level statement at a time, printing
//! `ast => result` for each, until EOF or an error.

use std::env;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;

use stone_lang::environment::Environment;
use stone_lang::evaluator;
use stone_lang::grammar;
use stone_lang::lexer::Lexer;
use stone_lang::native::register_native;
use stone_lang::token::{TokenKind, TokenStream};
use stone_lang::value::Value;

fn main() -> ExitCode {
    let mut args = env::args();
    let _program = args.next();
    let Some(path) = args.next() else {
        eprintln!("usage: stone <script.stn>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("stone: cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    if run(&source) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs one script to completion or to the first error. Returns whether the
/// whole script completed without error.
fn run(source: &str) -> bool {
    let mut lexer = match Lexer::new(source) {
        Ok(lexer) => lexer,
        Err(err) => {
            eprintln!("{err}");
            return false;
        }
    };

    let statement = grammar::build();
    let env = Environment::global();
    register_print(&env);

    while lexer.peek(0).kind != TokenKind::Eof {
        let node = match statement.parse(&mut lexer) {
            Ok(node) => node,
            Err(err) => {
                eprintln!("{err}");
                return false;
            }
        };

        if node.is_empty_marker() {
            continue;
        }

        match evaluator::evaluate(&node, &env) {
            Ok(value) => println!("{node} => {}", value.as_string()),
            Err(err) => {
                eprintln!("{err}");
                return false;
            }
        }
    }

    true
}

fn register_print(env: &Environment) {
    register_native(
        env,
        "print",
        vec!["value".to_string()],
        Rc::new(|activation: &Environment| {
            let value = activation.get("value").unwrap_or(Value::Nil);
            println!("{}", value.as_string());
            Ok(value)
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_short_program_without_error() {
        assert!(run("x = 1 + 2; print(x);"));
    }
}
