//! Concrete Stone grammar wiring: assembles the [crate::production] rules
//! into the full statement grammar. Recursive rules (`factor`/`expr`,
//! `block`/`statement`) are forward-declared via `Rule::group()` and filled
//! in once their dependents exist, the same pattern the reference library
//! uses for mutually recursive productions (`Concat::init` + `set_symbols`).

use std::rc::Rc;

use crate::production::{Associativity, OperatorDef, Rule, Tag};

const RESERVED: &[&str] = &["if", "else", "while", "def"];

static OPERATORS: &[OperatorDef] = &[
    OperatorDef::new("=", 1, Associativity::Right),
    OperatorDef::new("==", 2, Associativity::Left),
    OperatorDef::new(">", 2, Associativity::Left),
    OperatorDef::new("<", 2, Associativity::Left),
    OperatorDef::new("+", 3, Associativity::Left),
    OperatorDef::new("-", 3, Associativity::Left),
    OperatorDef::new("*", 4, Associativity::Left),
    OperatorDef::new("/", 4, Associativity::Left),
    OperatorDef::new("%", 4, Associativity::Left),
];

/// Builds the Stone grammar and returns its `statement` rule. The driver
/// calls `.parse()` on the returned rule once per loop iteration (§6); a
/// `program` is just `statement` repeated externally, as in the reference
/// driver.
pub fn build() -> Rc<Rule> {
    let name = Rule::group().identifier(RESERVED);

    let factor = Rule::group();
    let expr = Rule::group();
    let statement = Rule::group();

    let negative = Rule::tagged(Tag::NegativeExpr)
        .sep(&["-"])
        .ast(factor.clone());
    let parenthesized = Rule::group()
        .sep(&["("])
        .ast(expr.clone())
        .sep(&[")"]);
    let number_literal = Rule::group().number();
    let string_literal = Rule::group().string();

    let array_literal = Rule::tagged(Tag::ArrayLiteral)
        .sep(&["["])
        .option(expr.clone())
        .repeat(Rule::group().sep(&[","]).ast(expr.clone()))
        .sep(&["]"]);

    let arguments = Rule::tagged(Tag::Arguments)
        .sep(&["("])
        .option(expr.clone())
        .repeat(Rule::group().sep(&[","]).ast(expr.clone()))
        .sep(&[")"]);

    let primary = Rule::tagged(Tag::Primary)
        .ast(name.clone())
        .repeat(arguments.clone());

    factor.clone().or(vec![
        negative,
        parenthesized,
        number_literal,
        string_literal,
        array_literal.clone(),
        primary.clone(),
    ]);

    expr.clone().expression(factor.clone(), OPERATORS);

    let block = Rule::tagged(Tag::Block)
        .sep(&["{"])
        .repeat(statement.clone())
        .sep(&["}"]);

    // `if_stmnt` is forward-declared (like `factor`/`expr`/`statement`
    // above) because its own "else if" tail recurses back into itself: an
    // `else` is followed by either another full `if_stmnt` or a plain
    // `block`, and the tag-dispatch `build()` in `production` flattens a
    // recursive `else if` chain onto one `If` node's `pairs` rather than
    // nesting, matching the "N condition/then pairs" AST shape.
    let if_stmnt = Rule::tagged(Tag::If);
    let else_clause = Rule::group()
        .sep(&["else"])
        .or(vec![if_stmnt.clone(), block.clone()]);
    if_stmnt
        .clone()
        .sep(&["if"])
        .ast(expr.clone())
        .ast(block.clone())
        .option(else_clause);

    let while_stmnt = Rule::tagged(Tag::While)
        .sep(&["while"])
        .ast(expr.clone())
        .ast(block.clone());

    let parameter_list = Rule::tagged(Tag::ParameterList)
        .sep(&["("])
        .option(name.clone())
        .repeat(Rule::group().sep(&[","]).ast(name.clone()))
        .sep(&[")"]);

    let def_stmnt = Rule::tagged(Tag::DefStmnt)
        .sep(&["def"])
        .ast(name.clone())
        .ast(parameter_list)
        .ast(block);

    let null_stmt = Rule::group().sep(&[";"]);

    statement
        .clone()
        .or(vec![if_stmnt, while_stmnt, def_stmnt, null_stmt, expr]);

    statement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> crate::ast::Node {
        let rule = build();
        let mut lexer = Lexer::new(src).unwrap();
        rule.parse(&mut lexer).unwrap()
    }

    #[test]
    fn parses_arithmetic_with_precedence() {
        let node = parse("1 + 2 * 3");
        assert_eq!(node.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn parses_assignment_as_lowest_precedence() {
        let node = parse("x = 1 + 2");
        assert_eq!(node.to_string(), "(x = (1 + 2))");
    }

    #[test]
    fn parses_if_else() {
        let node = parse("if 1 { 2 } else { 3 }");
        assert_eq!(node.to_string(), "(if 1 (2) (3))");
    }

    #[test]
    fn parses_bare_if_with_no_else() {
        let node = parse("if 1 { 2 }");
        assert_eq!(node.to_string(), "(if 1 (2))");
    }

    #[test]
    fn flattens_an_else_if_chain_onto_one_if_node() {
        let node = parse("if 1 { 2 } else if 3 { 4 } else { 5 }");
        assert_eq!(node.to_string(), "(if 1 (2) 3 (4) (5))");
        match node {
            crate::ast::Node::If { pairs, else_block } => {
                assert_eq!(pairs.len(), 2);
                assert!(else_block.is_some());
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_while_loop() {
        let node = parse("while x { y }");
        assert_eq!(node.to_string(), "(while x (y))");
    }

    #[test]
    fn parses_function_definition_and_call() {
        let node = parse("def add(a, b) { a + b }");
        assert_eq!(node.to_string(), "(def add (a b) ((a + b)))");
    }

    #[test]
    fn parses_call_chain() {
        let node = parse("make(10)(5)");
        assert_eq!(node.to_string(), "make(10)(5)");
    }

    #[test]
    fn bare_semicolon_is_empty_statement() {
        let node = parse(";");
        assert!(node.is_empty_marker());
    }

    #[test]
    fn parses_array_literal() {
        let node = parse("[1, 2, 3]");
        assert_eq!(node.to_string(), "[1 2 3]");
    }

    #[test]
    fn parses_negative_and_parenthesized_expressions() {
        let node = parse("-(1 + 2)");
        assert_eq!(node.to_string(), "(- (1 + 2))");
    }
}
