//! Variable scopes
//!
//! The environment is a chain of scopes: the global scope at the bottom and
//! one scope per active procedure call above it. Only the innermost scope is
//! ever consulted; there is no fallback to the scopes below it.

use crate::value::Value;
use tracing::debug;

#[derive(Debug, Clone)]
struct Var {
    name: Value,
    value: Value,
}

/// One frame of variable bindings.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    vars: Vec<Var>,
}

impl Scope {
    /// Finds `name`, creating it with an empty value on first use.
    pub fn lookup_or_create(&mut self, name: &[u8]) -> &mut Value {
        let idx = match self.vars.iter().position(|v| v.name.as_bytes() == name) {
            Some(idx) => idx,
            None => {
                self.vars.push(Var { name: Value::from_bytes(name), value: Value::new() });
                self.vars.len() - 1
            }
        };
        &mut self.vars[idx].value
    }

    /// Replaces the value of `name`; the old value is dropped.
    pub fn assign(&mut self, name: &[u8], value: Value) {
        *self.lookup_or_create(name) = value;
    }

    pub fn get(&self, name: &[u8]) -> Option<&Value> {
        self.vars.iter().find(|v| v.name.as_bytes() == name).map(|v| &v.value)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// The scope chain. There is always at least the global scope.
#[derive(Debug, Clone)]
pub struct Env {
    scopes: Vec<Scope>,
}

impl Default for Env {
    fn default() -> Self {
        Env { scopes: vec![Scope::default()] }
    }
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost scope.
    pub fn current(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Reads `name` from the innermost scope.
    pub fn get(&self, name: &[u8]) -> Option<&Value> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Pushes a fresh scope on top of the current one.
    pub fn enter(&mut self) {
        self.scopes.push(Scope::default());
        debug!(depth = self.scopes.len(), "enter scope");
    }

    /// Drops the innermost scope and all of its variables, making its parent
    /// current again. The global scope is never dropped.
    pub fn leave(&mut self) -> &mut Scope {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        debug!(depth = self.scopes.len(), "leave scope");
        self.current()
    }

    /// Number of live scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
