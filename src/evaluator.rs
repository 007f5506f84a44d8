//! Visitor over the AST, threading an explicit [Environment] instead of the
//! reference implementation's mutable "current result" field — `evaluate`
//! simply returns the [Value] it computes.

use std::rc::Rc;

use crate::ast::Node;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::{Function, Value};

pub fn evaluate(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    match node {
        Node::NumberLiteral(token) => Ok(Value::Integer(token.numeric_value)),
        Node::StringLiteral(token) => Ok(Value::String(token.text.clone())),
        Node::Name(token) => env
            .get(&token.text)
            .ok_or_else(|| EvalError::undefined_name(token.line, &token.text)),
        Node::NegativeExpr(operand) => {
            let value = evaluate(operand, env)?;
            match value {
                Value::Integer(n) => Ok(Value::Integer(-n)),
                _ => Err(EvalError::type_error(
                    operand.location().unwrap_or(0),
                    "bad type for -",
                )),
            }
        }
        Node::BinaryExpr { left, operator, right } => evaluate_binary(left, operator, right, env),
        Node::Block(children) => {
            let mut result = Value::Nil;
            for child in children {
                result = evaluate(child, env)?;
            }
            Ok(result)
        }
        Node::If { pairs, else_block } => {
            for (condition, then_block) in pairs {
                if evaluate(condition, env)?.as_bool() {
                    return evaluate(then_block, env);
                }
            }
            match else_block {
                Some(else_block) => evaluate(else_block, env),
                None => Ok(Value::Nil),
            }
        }
        Node::TokenLeaf(_) => Ok(Value::Nil),
        Node::While { condition, body } => {
            let mut result = Value::Nil;
            while evaluate(condition, env)?.as_bool() {
                result = evaluate(body, env)?;
            }
            Ok(result)
        }
        Node::Primary { head, postfixes } => {
            let mut current = evaluate(head, env)?;
            for postfix in postfixes {
                match postfix {
                    Node::Arguments(arguments) => {
                        current = call(&current, arguments, env, postfix.location())?;
                    }
                    other => {
                        return Err(EvalError::type_error(
                            other.location().unwrap_or(0),
                            "unsupported call-chain postfix",
                        ))
                    }
                }
            }
            Ok(current)
        }
        Node::DefStmnt { name, parameters, body } => {
            let function_name = match name.as_ref() {
                Node::Name(token) => token.text.clone(),
                _ => unreachable!("DefStmnt name child is always a Name"),
            };
            let function = Value::Function(Rc::new(Function::UserDefined {
                parameters: parameters.clone(),
                body: body.clone(),
                defining_env: env.clone(),
            }));
            env.put_new(function_name.clone(), function);
            Ok(Value::String(function_name))
        }
        Node::ArrayLiteral(elements) => {
            for element in elements {
                evaluate(element, env)?;
            }
            Ok(Value::Nil)
        }
        Node::Arguments(_) | Node::ParameterList(_) => Ok(Value::Nil),
        Node::Empty => Ok(Value::Nil),
    }
}

fn evaluate_binary(
    left: &Node,
    operator: &crate::token::Token,
    right: &Node,
    env: &Environment,
) -> Result<Value, EvalError> {
    let op = operator.text.as_str();

    if op == "=" {
        let right_value = evaluate(right, env)?;
        match left {
            Node::Name(token) => {
                env.put(&token.text, right_value.clone());
                Ok(right_value)
            }
            _ => Err(EvalError::assign_target(
                left.location().unwrap_or(operator.line),
            )),
        }
    } else {
        let left_value = evaluate(left, env)?;
        let right_value = evaluate(right, env)?;
        apply_operator(op, left_value, right_value, operator.line)
    }
}

fn apply_operator(op: &str, left: Value, right: Value, line: usize) -> Result<Value, EvalError> {
    if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
        let a = *a;
        let b = *b;
        return match op {
            "+" => Ok(Value::Integer(a + b)),
            "-" => Ok(Value::Integer(a - b)),
            "*" => Ok(Value::Integer(a * b)),
            "/" => {
                if b == 0 {
                    Err(EvalError::divide_by_zero(line, "/"))
                } else {
                    Ok(Value::Integer(a / b))
                }
            }
            "%" => {
                if b == 0 {
                    Err(EvalError::divide_by_zero(line, "%"))
                } else {
                    Ok(Value::Integer(a % b))
                }
            }
            "==" => Ok(Value::Integer((a == b) as i64)),
            ">" => Ok(Value::Integer((a > b) as i64)),
            "<" => Ok(Value::Integer((a < b) as i64)),
            _ => Err(EvalError::bad_operator(line, op)),
        };
    }

    if op == "+" {
        return Ok(Value::String(left.as_string() + &right.as_string()));
    }
    if op == "==" {
        return Ok(Value::Integer((left == right) as i64));
    }

    match op {
        "-" | "*" | "/" | "%" | ">" | "<" => {
            Err(EvalError::type_error(line, format!("bad type for {op}")))
        }
        _ => Err(EvalError::bad_operator(line, op)),
    }
}

fn call(
    callee: &Value,
    arguments: &[Node],
    caller_env: &Environment,
    location: Option<usize>,
) -> Result<Value, EvalError> {
    let function = match callee {
        Value::Function(f) => f.clone(),
        other => {
            return Err(EvalError::type_error(
                location.unwrap_or(0),
                format!("cannot call {}", other.as_string()),
            ))
        }
    };

    let line = location.unwrap_or(0);
    if arguments.len() != function.arity() {
        return Err(EvalError::arity(line, function.arity(), arguments.len()));
    }

    match function.as_ref() {
        Function::UserDefined {
            parameters,
            body,
            defining_env,
        } => {
            let activation = defining_env.child();
            let names = match parameters.as_ref() {
                Node::ParameterList(names) => names,
                _ => unreachable!("UserDefined parameters are always a ParameterList"),
            };
            for (name_node, argument) in names.iter().zip(arguments) {
                let name = match name_node {
                    Node::Name(token) => token.text.clone(),
                    _ => unreachable!("ParameterList children are always Name nodes"),
                };
                let value = evaluate(argument, caller_env)?;
                activation.put_new(name, value);
            }
            evaluate(body, &activation)
        }
        Function::Native { parameters, body, .. } => {
            let activation = caller_env.child();
            for (name, argument) in parameters.iter().zip(arguments) {
                let value = evaluate(argument, caller_env)?;
                activation.put_new(name.clone(), value);
            }
            body(&activation)
        }
    }
}
