//! Parser combinators: a [Rule] is a sequence of [Element]s, each of which
//! consumes tokens to produce zero or more child [Node]s. Named rules are
//! mutually recursive by construction — build the `Rc<Rule>` first, wire it
//! into sibling rules, then fill in its elements, the same forward-declare
//! pattern the reference library's `Concat::init`/`set_symbols` pair uses for
//! recursive productions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Node;
use crate::error::ParseError;
use crate::token::{Token, TokenStream};
use crate::util::Log;

const TRACE: Log = Log::None;

/// Selects which [Node] variant a rule's accumulated children become.
/// `NumberLiteral`/`StringLiteral`/`Name` leaves are built directly by their
/// terminal [Element] and never need a tag of their own — see
/// [Rule::group]'s transparent pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    NegativeExpr,
    Block,
    If,
    While,
    Primary,
    Arguments,
    ParameterList,
    DefStmnt,
    ArrayLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct OperatorDef {
    pub text: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
}

impl OperatorDef {
    pub const fn new(text: &'static str, precedence: u8, associativity: Associativity) -> Self {
        Self {
            text,
            precedence,
            associativity,
        }
    }
}

enum Element {
    Number,
    String,
    Identifier(&'static [&'static str]),
    Token(&'static [&'static str]),
    Sep(&'static [&'static str]),
    Sub(Rc<Rule>),
    Or(Vec<Rc<Rule>>),
    Repeat(Rc<Rule>),
    Optional(Rc<Rule>),
    Expression(Rc<Rule>, &'static [OperatorDef]),
}

impl Element {
    fn can_start(&self, stream: &dyn TokenStream) -> bool {
        match self {
            Element::Number => stream.peek(0).kind == crate::token::TokenKind::Number,
            Element::String => stream.peek(0).kind == crate::token::TokenKind::String,
            Element::Identifier(reserved) => is_name_token(stream.peek(0), reserved),
            Element::Token(literals) | Element::Sep(literals) => {
                let token = stream.peek(0);
                literals.iter().any(|lit| token.is_identifier_with(lit))
            }
            Element::Sub(rule) => rule.can_start(stream),
            Element::Or(subs) => subs.iter().any(|s| s.can_start(stream)),
            Element::Repeat(sub) | Element::Optional(sub) => sub.can_start(stream),
            Element::Expression(factor, _) => factor.can_start(stream),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Element::Number => "number",
            Element::String => "string",
            Element::Identifier(_) => "identifier",
            Element::Token(_) => "token",
            Element::Sep(_) => "sep",
            Element::Sub(_) => "ast",
            Element::Or(_) => "or",
            Element::Repeat(_) => "repeat",
            Element::Optional(_) => "option",
            Element::Expression(..) => "expression",
        }
    }
}

fn is_name_token(token: &Token, reserved: &[&str]) -> bool {
    token.kind == crate::token::TokenKind::Identifier
        && token
            .text
            .chars()
            .next()
            .map_or(false, |c| c.is_alphabetic() || c == '_')
        && !reserved.contains(&token.text.as_str())
}

/// A grammar production: an ordered sequence of [Element]s plus the [Tag]
/// used to build the final node once all elements have matched.
pub struct Rule {
    tag: Option<Tag>,
    elements: RefCell<Vec<Element>>,
}

impl Rule {
    /// A tagged rule: its accumulated children are built into the variant
    /// named by `tag`.
    pub fn tagged(tag: Tag) -> Rc<Self> {
        Rc::new(Self {
            tag: Some(tag),
            elements: RefCell::new(Vec::new()),
        })
    }

    /// An untagged ("group") rule: transparent pass-through, used for
    /// alternation wrappers, parenthesized grouping, and the null statement.
    pub fn group() -> Rc<Self> {
        Rc::new(Self {
            tag: None,
            elements: RefCell::new(Vec::new()),
        })
    }

    pub fn number(self: Rc<Self>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Number);
        self
    }

    pub fn string(self: Rc<Self>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::String);
        self
    }

    pub fn identifier(self: Rc<Self>, reserved: &'static [&'static str]) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Identifier(reserved));
        self
    }

    pub fn token(self: Rc<Self>, literals: &'static [&'static str]) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Token(literals));
        self
    }

    pub fn sep(self: Rc<Self>, literals: &'static [&'static str]) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Sep(literals));
        self
    }

    pub fn ast(self: Rc<Self>, sub: Rc<Rule>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Sub(sub));
        self
    }

    pub fn or(self: Rc<Self>, subs: Vec<Rc<Rule>>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Or(subs));
        self
    }

    pub fn repeat(self: Rc<Self>, sub: Rc<Rule>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Repeat(sub));
        self
    }

    pub fn option(self: Rc<Self>, sub: Rc<Rule>) -> Rc<Self> {
        self.elements.borrow_mut().push(Element::Optional(sub));
        self
    }

    pub fn expression(self: Rc<Self>, factor: Rc<Rule>, operators: &'static [OperatorDef]) -> Rc<Self> {
        self.elements
            .borrow_mut()
            .push(Element::Expression(factor, operators));
        self
    }

    /// Non-consuming predicate: true iff this rule could begin matching at
    /// the current position, examined via `peek(0)` only.
    pub fn can_start(&self, stream: &dyn TokenStream) -> bool {
        match self.elements.borrow().first() {
            Some(first) => first.can_start(stream),
            None => false,
        }
    }

    /// Consume tokens, accumulate children across all elements, then build
    /// one node via tag dispatch (or transparent pass-through for a `group`).
    pub fn parse(&self, stream: &mut dyn TokenStream) -> Result<Node, ParseError> {
        TRACE.trace_enter(self.tag_label());
        let mut children: Vec<Node> = Vec::new();

        let elements_len = self.elements.borrow().len();
        for index in 0..elements_len {
            self.parse_element(index, stream, &mut children)?;
        }

        let node = self.build(children);
        TRACE.trace_success(self.tag_label(), &[&node]);
        Ok(node)
    }

    fn parse_element(
        &self,
        index: usize,
        stream: &mut dyn TokenStream,
        children: &mut Vec<Node>,
    ) -> Result<(), ParseError> {
        // Elements are borrowed one at a time (rather than for the whole
        // loop) so a recursive `parse` on a `Sub`/`Or` sibling rule never
        // tries to re-borrow this rule's own `elements` cell.
        enum Action {
            Number,
            String,
            Identifier(&'static [&'static str]),
            Token(&'static [&'static str]),
            Sep(&'static [&'static str]),
            Sub(Rc<Rule>),
            Or(Vec<Rc<Rule>>),
            Repeat(Rc<Rule>),
            Optional(Rc<Rule>),
            Expression(Rc<Rule>, &'static [OperatorDef]),
        }

        let action = {
            let elements = self.elements.borrow();
            match &elements[index] {
                Element::Number => Action::Number,
                Element::String => Action::String,
                Element::Identifier(r) => Action::Identifier(r),
                Element::Token(l) => Action::Token(l),
                Element::Sep(l) => Action::Sep(l),
                Element::Sub(r) => Action::Sub(r.clone()),
                Element::Or(subs) => Action::Or(subs.clone()),
                Element::Repeat(r) => Action::Repeat(r.clone()),
                Element::Optional(r) => Action::Optional(r.clone()),
                Element::Expression(f, ops) => Action::Expression(f.clone(), ops),
            }
        };

        match action {
            Action::Number => {
                let token = expect(stream, |t| t.kind == crate::token::TokenKind::Number, "number")?;
                children.push(Node::NumberLiteral(token));
            }
            Action::String => {
                let token = expect(stream, |t| t.kind == crate::token::TokenKind::String, "string")?;
                children.push(Node::StringLiteral(token));
            }
            Action::Identifier(reserved) => {
                let token = expect(stream, |t| is_name_token(t, reserved), "identifier")?;
                children.push(Node::Name(token));
            }
            Action::Token(literals) => {
                let token = expect(
                    stream,
                    |t| literals.iter().any(|lit| t.is_identifier_with(lit)),
                    "token",
                )?;
                children.push(Node::TokenLeaf(token));
            }
            Action::Sep(literals) => {
                expect(
                    stream,
                    |t| literals.iter().any(|lit| t.is_identifier_with(lit)),
                    "separator",
                )?;
            }
            Action::Sub(sub) => children.push(sub.parse(stream)?),
            Action::Or(subs) => {
                let chosen = subs
                    .iter()
                    .find(|s| s.can_start(stream))
                    .ok_or_else(|| {
                        ParseError::new(
                            stream.peek(0).line,
                            format!("unexpected token '{}'", stream.peek(0)),
                        )
                    })?;
                children.push(chosen.parse(stream)?);
            }
            Action::Repeat(sub) => {
                while sub.can_start(stream) {
                    let node = sub.parse(stream)?;
                    if !node.is_empty_marker() {
                        children.push(node);
                    }
                }
            }
            Action::Optional(sub) => {
                if sub.can_start(stream) {
                    let node = sub.parse(stream)?;
                    if !node.is_empty_marker() {
                        children.push(node);
                    }
                }
            }
            Action::Expression(factor, operators) => {
                children.push(parse_expression(stream, &factor, operators, 0)?);
            }
        }
        Ok(())
    }

    fn tag_label(&self) -> &'static str {
        match self.tag {
            Some(Tag::NegativeExpr) => "NegativeExpr",
            Some(Tag::Block) => "Block",
            Some(Tag::If) => "If",
            Some(Tag::While) => "While",
            Some(Tag::Primary) => "Primary",
            Some(Tag::Arguments) => "Arguments",
            Some(Tag::ParameterList) => "ParameterList",
            Some(Tag::DefStmnt) => "DefStmnt",
            Some(Tag::ArrayLiteral) => "ArrayLiteral",
            None => "group",
        }
    }

    /// Factory dispatch: turn this rule's tag and accumulated children into
    /// one [Node]. An untagged (`group`) rule passes a single child straight
    /// through, or becomes the internal [Node::Empty] marker when it matched
    /// no children at all — by grammar design a `group` rule never collects
    /// more than one.
    fn build(&self, mut children: Vec<Node>) -> Node {
        match self.tag {
            None => match children.len() {
                0 => Node::Empty,
                1 => children.pop().unwrap(),
                _ => children.pop().unwrap(),
            },
            Some(Tag::NegativeExpr) => Node::NegativeExpr(Box::new(children.pop().unwrap())),
            Some(Tag::Block) => Node::Block(children),
            Some(Tag::If) => {
                // Children arrive in parse order: condition, then-block, and
                // an optional third child from the grammar's `else (if-rest
                // | block)` tail. `else if …` recurses back into this same
                // rule, so that third child is itself a `Node::If` when the
                // source wrote an `else if` — flatten its pairs/else onto
                // this node rather than nesting, per the single-node,
                // N-pairs AST shape.
                let mut iter = children.into_iter();
                let condition = iter.next().unwrap();
                let then_block = iter.next().unwrap();
                let mut pairs = vec![(condition, then_block)];
                let else_block = match iter.next() {
                    Some(Node::If {
                        pairs: nested_pairs,
                        else_block: nested_else,
                    }) => {
                        pairs.extend(nested_pairs);
                        nested_else
                    }
                    Some(plain_else) => Some(Box::new(plain_else)),
                    None => None,
                };
                Node::If { pairs, else_block }
            }
            Some(Tag::While) => {
                let body = Box::new(children.pop().unwrap());
                let condition = Box::new(children.pop().unwrap());
                Node::While { condition, body }
            }
            Some(Tag::Primary) => {
                let mut iter = children.into_iter();
                let head = Box::new(iter.next().unwrap());
                let postfixes = iter.collect();
                Node::Primary { head, postfixes }
            }
            Some(Tag::Arguments) => Node::Arguments(children),
            Some(Tag::ParameterList) => Node::ParameterList(children),
            Some(Tag::DefStmnt) => {
                let body = Rc::new(children.pop().unwrap());
                let parameters = Rc::new(children.pop().unwrap());
                let name = Box::new(children.pop().unwrap());
                Node::DefStmnt {
                    name,
                    parameters,
                    body,
                }
            }
            Some(Tag::ArrayLiteral) => Node::ArrayLiteral(children),
        }
    }
}

fn expect(
    stream: &mut dyn TokenStream,
    predicate: impl Fn(&Token) -> bool,
    expected: &str,
) -> Result<Token, ParseError> {
    let token = stream.peek(0);
    if predicate(token) {
        Ok(stream.read())
    } else {
        Err(ParseError::new(
            token.line,
            format!("expected {expected}, found '{token}'"),
        ))
    }
}

/// Operator-precedence climbing for [Element::Expression]: parses one
/// `factor`, then folds trailing binary operators according to `operators`'
/// precedence/associativity table. `min_precedence` is the threshold an
/// operator must meet to be folded at this recursion level.
fn parse_expression(
    stream: &mut dyn TokenStream,
    factor: &Rc<Rule>,
    operators: &'static [OperatorDef],
    min_precedence: u8,
) -> Result<Node, ParseError> {
    let mut left = factor.parse(stream)?;

    loop {
        let peeked = stream.peek(0).clone();
        let operator = operators
            .iter()
            .find(|op| peeked.is_identifier_with(op.text));
        let operator = match operator {
            Some(op) if op.precedence >= min_precedence => *op,
            _ => break,
        };

        let operator_token = stream.read();
        let next_min = match operator.associativity {
            Associativity::Left => operator.precedence + 1,
            Associativity::Right => operator.precedence,
        };
        let right = parse_expression(stream, factor, operators, next_min)?;
        left = Node::BinaryExpr {
            left: Box::new(left),
            operator: operator_token,
            right: Box::new(right),
        };
    }

    Ok(left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn stream(src: &str) -> Lexer {
        Lexer::new(src).unwrap()
    }

    #[test]
    fn number_rule_builds_literal() {
        let rule = Rule::group().number();
        let mut s = stream("42");
        let node = rule.parse(&mut s).unwrap();
        assert!(matches!(node, Node::NumberLiteral(t) if t.numeric_value == 42));
    }

    #[test]
    fn sep_only_rule_yields_empty_marker() {
        let rule = Rule::group().sep(&[";"]);
        let mut s = stream(";");
        let node = rule.parse(&mut s).unwrap();
        assert!(node.is_empty_marker());
    }

    #[test]
    fn token_produces_a_leaf_but_sep_does_not() {
        let token_rule = Rule::group().token(&[";"]);
        let mut s = stream(";");
        let node = token_rule.parse(&mut s).unwrap();
        assert!(matches!(node, Node::TokenLeaf(t) if t.text == ";"));

        let sep_rule = Rule::group().sep(&[";"]);
        let mut s = stream(";");
        let node = sep_rule.parse(&mut s).unwrap();
        assert!(node.is_empty_marker());
    }

    #[test]
    fn or_picks_first_matching_alternative() {
        let number = Rule::group().number();
        let string = Rule::group().string();
        let choice = Rule::group().or(vec![number, string]);
        let mut s = stream(r#""hi""#);
        let node = choice.parse(&mut s).unwrap();
        assert!(matches!(node, Node::StringLiteral(_)));
    }

    #[test]
    fn repeat_drops_empty_markers() {
        let statement = Rule::group().or(vec![
            Rule::group().number(),
            Rule::group().sep(&[";"]),
        ]);
        let block = Rule::tagged(Tag::Block).repeat(statement);
        let mut s = stream("1;2;;3");
        let node = block.parse(&mut s).unwrap();
        match node {
            Node::Block(children) => assert_eq!(children.len(), 3),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn expression_respects_precedence() {
        let number = Rule::group().number();
        static OPERATORS: &[OperatorDef] = &[
            OperatorDef::new("+", 1, Associativity::Left),
            OperatorDef::new("*", 2, Associativity::Left),
        ];
        let expr = Rule::group().expression(number, OPERATORS);
        let mut s = stream("1 + 2 * 3");
        let node = expr.parse(&mut s).unwrap();
        assert_eq!(node.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn expression_assignment_is_right_associative() {
        let number = Rule::group().number();
        let name = Rule::group().identifier(&[]);
        let primary = Rule::group().or(vec![name, number]);
        static OPERATORS: &[OperatorDef] = &[OperatorDef::new("=", 0, Associativity::Right)];
        let expr = Rule::group().expression(primary, OPERATORS);
        let mut s = stream("a = b = 1");
        let node = expr.parse(&mut s).unwrap();
        assert_eq!(node.to_string(), "(a = (b = 1))");
    }
}
