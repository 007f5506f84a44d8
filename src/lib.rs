//! Stone is a small dynamically-typed scripting language. This crate is a
//! tree-walking interpreter for it: a combinator-based parser builds an AST
//! from a token stream, and a visitor-style evaluator walks that AST against
//! a lexically-scoped environment, with first-class functions and closures.
//!
//! ```
//! use stone_lang::{environment::Environment, evaluator, grammar, lexer::Lexer};
//!
//! let mut lexer = Lexer::new("1 + 2 * 3").unwrap();
//! let rule = grammar::build();
//! let ast = rule.parse(&mut lexer).unwrap();
//! let env = Environment::global();
//! let value = evaluator::evaluate(&ast, &env).unwrap();
//! assert_eq!(value.as_string(), "7");
//! ```

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod lexer;
pub mod native;
pub mod production;
pub mod token;
pub mod value;
mod util;

pub use ast::Node;
pub use environment::Environment;
pub use error::{EvalError, ParseError, StoneError};
pub use token::{Token, TokenKind, TokenStream};
pub use value::{Function, Value};
