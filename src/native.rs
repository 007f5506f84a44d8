//! Native function registration hook (the §6 external interface other
//! embedders, and the bundled `stone` binary's `print`, use to extend the
//! language without writing AST).

use crate::environment::Environment;
use crate::value::{Function, NativeBody, Value};
use std::rc::Rc;

/// Build a `Function::Native` from `body` and bind it in `env` under `name`
/// via `put_new`, following the standard call protocol in
/// [crate::evaluator]: arguments are evaluated by the caller, bound into a
/// fresh activation by parameter name, then `body` is invoked with that
/// activation instead of walking an AST.
pub fn register_native(
    env: &Environment,
    name: &str,
    parameters: Vec<String>,
    body: NativeBody,
) {
    let function = Value::Function(Rc::new(Function::Native {
        name: name.to_string(),
        parameters,
        body,
    }));
    env.put_new(name, function);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_native_is_callable_by_name() {
        let env = Environment::global();
        register_native(
            &env,
            "double",
            vec!["x".to_string()],
            Rc::new(|activation: &Environment| {
                let x = activation.get("x").unwrap();
                match x {
                    Value::Integer(n) => Ok(Value::Integer(n * 2)),
                    _ => unreachable!(),
                }
            }),
        );
        assert!(matches!(env.get("double"), Some(Value::Function(_))));
    }
}
