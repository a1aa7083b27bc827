//! Command registry
//!
//! Maps command names to handlers. Registration never replaces an entry: the
//! newest registration of a name shadows the older ones, and lookup returns
//! the most recent match.

use crate::eval::{Flow, Interp};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Signature of a command implementation.
///
/// `args` is the full argument list, with the command name as element 0.
/// `data` is the value captured at registration time, if any. Handlers report
/// their result through [`Interp::set_result`] / [`Interp::fail`].
pub type Handler = Rc<dyn Fn(&mut Interp, &[Value], Option<&Value>) -> Flow>;

/// A registered command.
#[derive(Clone)]
pub struct Command {
    pub name: Value,
    /// Exact length of the argument list (name included), or `0` for any.
    pub arity: usize,
    pub handler: Handler,
    pub data: Option<Rc<Value>>,
}

impl Command {
    /// Whether an argument list of `len` elements fits the declared arity.
    pub fn accepts(&self, len: usize) -> bool {
        self.arity == 0 || self.arity == len
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Most recent registration of `name` (case-sensitive).
    pub fn lookup(&self, name: &[u8]) -> Option<&Command> {
        self.commands.iter().rev().find(|c| c.name.as_bytes() == name)
    }

    /// Registered names, most recent first, without shadowed duplicates.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for cmd in self.commands.iter().rev() {
            let name = cmd.name.to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
