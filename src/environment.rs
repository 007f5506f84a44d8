//! Lexically-scoped environment: a chain of frames, each a name → value map.
//! Closures share a captured frame chain cheaply via `Rc<RefCell<_>>`, the
//! same sharing discipline the reference library uses for its production
//! graph (`Rc`-shared, interior-mutability-for-forward-declaration).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

/// A reference-counted handle to one frame in the scope chain. Cloning an
/// `Environment` shares the same frame (and therefore the same bindings);
/// this is how a closure captures its defining scope.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    /// The outermost (global) environment, with no parent.
    pub fn global() -> Self {
        Self(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    /// A fresh child frame, e.g. a function-call activation.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Insert into the innermost frame, shadowing any outer binding of the
    /// same name.
    pub fn put_new(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Write to the frame where `name` is already bound, searching
    /// innermost-outward; if unbound anywhere on the chain, insert into the
    /// global (outermost) frame.
    pub fn put(&self, name: &str, value: Value) {
        if self.assign_existing(name, value.clone()) {
            return;
        }
        self.global_frame().put_new(name, value);
    }

    fn assign_existing(&self, name: &str, value: Value) -> bool {
        let mut frame = self.0.borrow_mut();
        if frame.bindings.contains_key(name) {
            frame.bindings.insert(name.to_string(), value);
            return true;
        }
        match &frame.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(frame);
                parent.assign_existing(name, value)
            }
            None => false,
        }
    }

    fn global_frame(&self) -> Environment {
        let parent = self.0.borrow().parent.clone();
        match parent {
            Some(parent) => parent.global_frame(),
            None => self.clone(),
        }
    }

    /// Search innermost-outward for `name`, returning a clone of the bound
    /// value if present.
    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.0.borrow();
        if let Some(value) = frame.bindings.get(name) {
            return Some(value.clone());
        }
        frame.parent.as_ref().and_then(|parent| parent.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_new_shadows_in_inner_scope() {
        let global = Environment::global();
        global.put_new("x", Value::Integer(10));
        let inner = global.child();
        inner.put_new("x", Value::Integer(1));
        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
        assert_eq!(global.get("x"), Some(Value::Integer(10)));
    }

    #[test]
    fn put_updates_nearest_enclosing_binding() {
        let global = Environment::global();
        global.put_new("x", Value::Integer(10));
        let inner = global.child();
        inner.put("x", Value::Integer(99));
        assert_eq!(global.get("x"), Some(Value::Integer(99)));
        assert_eq!(inner.get("x"), Some(Value::Integer(99)));
    }

    #[test]
    fn put_on_unbound_name_creates_global() {
        let global = Environment::global();
        let inner = global.child();
        inner.put("y", Value::Integer(5));
        assert_eq!(global.get("y"), Some(Value::Integer(5)));
    }

    #[test]
    fn get_searches_innermost_outward() {
        let global = Environment::global();
        global.put_new("x", Value::Integer(1));
        let inner = global.child();
        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
        assert_eq!(inner.get("missing"), None);
    }
}
