//! The tagged AST the parser combinators build and the evaluator walks.
//! Mirrors the reference library's `ASTNode<TNode>` (see `ast_node.rs` in the
//! teacher crate) but specialized to Stone's concrete node shapes instead of
//! being generic over an arbitrary token/node type — this core has exactly
//! one language to describe.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::token::Token;

/// One AST node. Each variant's shape is an invariant enforced by the parser
/// (see spec §3); the evaluator trusts it rather than re-validating arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    NumberLiteral(Token),
    StringLiteral(Token),
    Name(Token),
    NegativeExpr(Box<Node>),
    /// `[left, operator-leaf, right]`, flattened for evaluator convenience
    /// into explicit fields rather than a 3-element `Vec`.
    BinaryExpr {
        left: Box<Node>,
        operator: Token,
        right: Box<Node>,
    },
    Block(Vec<Node>),
    /// `N` condition/then-block pairs, evaluated in order, plus an optional
    /// trailing else. `else if` chains collapse into additional pairs on the
    /// same node rather than nesting (spec §3/§4.4).
    If {
        pairs: Vec<(Node, Node)>,
        else_block: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    Primary {
        head: Box<Node>,
        postfixes: Vec<Node>,
    },
    Arguments(Vec<Node>),
    ParameterList(Vec<Node>),
    DefStmnt {
        name: Box<Node>,
        parameters: Rc<Node>,
        body: Rc<Node>,
    },
    ArrayLiteral(Vec<Node>),
    /// A generic leaf produced by `.token(literals…)` (spec §4.2): the
    /// matched token, kept as a child rather than discarded the way `.sep()`
    /// discards its match.
    TokenLeaf(Token),
    /// Internal marker for an untagged rule that accumulated zero children
    /// (spec §3/§4.2). Never reaches the evaluator through the standard
    /// driver loop; see [crate::evaluator].
    Empty,
}

impl Node {
    /// The first non-empty location among this node's children, depth-first,
    /// bottoming out at a leaf's token line (spec §6).
    pub fn location(&self) -> Option<usize> {
        match self {
            Node::NumberLiteral(t) | Node::StringLiteral(t) | Node::Name(t) | Node::TokenLeaf(t) => {
                Some(t.line)
            }
            Node::NegativeExpr(child) => child.location(),
            Node::BinaryExpr { left, operator, right } => left
                .location()
                .or(Some(operator.line))
                .or_else(|| right.location()),
            Node::Block(children) => children.iter().find_map(Node::location),
            Node::If { pairs, .. } => pairs.first().and_then(|(condition, _)| condition.location()),
            Node::While { condition, .. } => condition.location(),
            Node::Primary { head, .. } => head.location(),
            Node::Arguments(children) | Node::ParameterList(children) | Node::ArrayLiteral(children) => {
                children.iter().find_map(Node::location)
            }
            Node::DefStmnt { name, .. } => name.location(),
            Node::Empty => None,
        }
    }

    /// Number of direct children, used by the driver to decide whether a
    /// top-level parse produced a real statement or a swallowed `;`.
    pub fn child_count(&self) -> usize {
        match self {
            Node::NumberLiteral(_)
            | Node::StringLiteral(_)
            | Node::Name(_)
            | Node::TokenLeaf(_)
            | Node::Empty => 0,
            Node::NegativeExpr(_) => 1,
            Node::BinaryExpr { .. } => 3,
            Node::Block(children)
            | Node::Arguments(children)
            | Node::ParameterList(children)
            | Node::ArrayLiteral(children) => children.len(),
            Node::If { pairs, else_block } => {
                pairs.len() * 2 + if else_block.is_some() { 1 } else { 0 }
            }
            Node::While { .. } => 2,
            Node::Primary { postfixes, .. } => 1 + postfixes.len(),
            Node::DefStmnt { .. } => 3,
        }
    }

    pub fn is_empty_marker(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Render this node and its tree of `ptree`-navigable children for
    /// interactive debugging, in the style of the reference library's
    /// `ASTNode::print`.
    pub fn print_tree(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

/// Stable S-expression rendering (spec §6, property 1): `( child1 child2 … )`,
/// leaves render as their token text.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::NumberLiteral(t) | Node::StringLiteral(t) | Node::Name(t) | Node::TokenLeaf(t) => {
                write!(f, "{}", t.text)
            }
            Node::NegativeExpr(operand) => write!(f, "(- {operand})"),
            Node::BinaryExpr { left, operator, right } => {
                write!(f, "({left} {} {right})", operator.text)
            }
            Node::Block(children) => write_seq(f, children),
            Node::If { pairs, else_block } => {
                write!(f, "(if")?;
                for (condition, then_block) in pairs {
                    write!(f, " {condition} {then_block}")?;
                }
                if let Some(else_block) = else_block {
                    write!(f, " {else_block}")?;
                }
                write!(f, ")")
            }
            Node::While { condition, body } => write!(f, "(while {condition} {body})"),
            Node::Primary { head, postfixes } => {
                write!(f, "{head}")?;
                for postfix in postfixes {
                    write!(f, "{postfix}")?;
                }
                Ok(())
            }
            Node::Arguments(children) => write_seq(f, children),
            Node::ParameterList(children) => write_seq(f, children),
            Node::DefStmnt {
                name,
                parameters,
                body,
            } => write!(f, "(def {name} {parameters} {body})"),
            Node::ArrayLiteral(children) => {
                write!(f, "[")?;
                write_joined(f, children)?;
                write!(f, "]")
            }
            Node::Empty => write!(f, "()"),
        }
    }
}

fn write_seq(f: &mut Formatter<'_>, children: &[Node]) -> fmt::Result {
    write!(f, "(")?;
    write_joined(f, children)?;
    write!(f, ")")
}

fn write_joined(f: &mut Formatter<'_>, children: &[Node]) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index != 0 {
            write!(f, " ")?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}

impl ptree::TreeItem for Node {
    type Child = Node;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        let label = match self {
            Node::NumberLiteral(_) => "NumberLiteral",
            Node::StringLiteral(_) => "StringLiteral",
            Node::Name(_) => "Name",
            Node::TokenLeaf(_) => "TokenLeaf",
            Node::NegativeExpr(_) => "NegativeExpr",
            Node::BinaryExpr { .. } => "BinaryExpr",
            Node::Block(_) => "Block",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::Primary { .. } => "Primary",
            Node::Arguments(_) => "Arguments",
            Node::ParameterList(_) => "ParameterList",
            Node::DefStmnt { .. } => "DefStmnt",
            Node::ArrayLiteral(_) => "ArrayLiteral",
            Node::Empty => "Empty",
        };
        write!(f, "{label} # {self}")
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        let owned: Vec<Node> = match self {
            Node::NegativeExpr(child) => vec![(**child).clone()],
            Node::BinaryExpr { left, right, .. } => vec![(**left).clone(), (**right).clone()],
            Node::Block(children)
            | Node::Arguments(children)
            | Node::ParameterList(children)
            | Node::ArrayLiteral(children) => children.clone(),
            Node::If { pairs, else_block } => {
                let mut v = Vec::with_capacity(pairs.len() * 2 + 1);
                for (condition, then_block) in pairs {
                    v.push(condition.clone());
                    v.push(then_block.clone());
                }
                if let Some(else_block) = else_block {
                    v.push((**else_block).clone());
                }
                v
            }
            Node::While { condition, body } => vec![(**condition).clone(), (**body).clone()],
            Node::Primary { head, postfixes } => {
                let mut v = vec![(**head).clone()];
                v.extend(postfixes.iter().cloned());
                v
            }
            Node::DefStmnt {
                name,
                parameters,
                body,
            } => vec![(**name).clone(), (**parameters).clone(), (**body).clone()],
            Node::NumberLiteral(_)
            | Node::StringLiteral(_)
            | Node::Name(_)
            | Node::TokenLeaf(_)
            | Node::Empty => vec![],
        };
        std::borrow::Cow::from(owned)
    }
}
