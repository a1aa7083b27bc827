//! Evaluator for tinytcl
//!
//! The evaluator drives the tokenizer over a script, substitutes every word,
//! assembles the words of each command and dispatches the command through
//! the registry. Every step answers with a [`Flow`] signal; anything other
//! than [`Flow::Ok`] stops the current script and travels up the call stack
//! until a construct that consumes it (`while` consumes `Break`/`Again`, a
//! procedure call consumes every signal, `Error` included) or the host.
//!
//! The value produced by the last step lives in the interpreter
//! ([`Interp::result`]) and is replaced, never unset, by every step.
//!
//! # Builtin commands
//!
//! Commands are plain functions registered by name (see [`Interp::register`]):
//!
//! 1. **Primitives** (`control.rs`): `set`, `subst`, `proc`, `if`, `while`,
//!    `return`, `break`, `continue` and the `#` comment.
//! 2. **Native modules** linked in by [`Interp::new`]: integer math
//!    (`math.rs`) and channel I/O (`io.rs`). They only use the public
//!    registration contract, like any host command would.

mod control;
mod io;
mod math;

pub use io::OutputBuffer;

use crate::env::Env;
use crate::lexer::{scan, Token, TokenKind, Tokenizer};
use crate::registry::{Command, Handler, Registry};
use crate::value::Value;
use std::io::Write;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Longest `$name` reference accepted, counting the `$`.
pub const MAX_VAR_LENGTH: usize = 256;

/// Deepest procedure nesting accepted before the call fails.
pub const MAX_CALL_DEPTH: usize = 200;

/// Control-flow signal returned by every evaluation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Ok,
    Error,
    Return,
    Break,
    Again,
}

impl Flow {
    /// Script keyword that raises this signal.
    pub fn keyword(self) -> &'static str {
        match self {
            Flow::Ok => "ok",
            Flow::Error => "error",
            Flow::Return => "return",
            Flow::Break => "break",
            Flow::Again => "continue",
        }
    }
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("syntax error")]
    Syntax,
    #[error("invalid command name \"{0}\"")]
    UnknownCommand(String),
    #[error("arity mismatch: \"{name}\" expects {expected} arguments, got {got}")]
    ArityMismatch { name: String, expected: usize, got: usize },
    #[error("variable name too long ({0} bytes)")]
    VarNameTooLong(usize),
    #[error("wrong # args: should be \"{0}\"")]
    WrongArgs(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0} not found")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("too many nested procedure calls (limit {0})")]
    TooDeep(usize),
    #[error("interrupted")]
    Interrupted,
    #[error("invoked \"{}\" outside of a loop", .0.keyword())]
    Escaped(Flow),
    #[error("{0}")]
    Custom(String),
}

/// Interpreter state: the scope chain, the command registry and the last
/// result.
///
/// One instance is driven by one thread of control at a time. Dropping it
/// releases every scope, command, captured procedure and open channel.
pub struct Interp {
    pub(crate) env: Env,
    commands: Registry,
    result: Value,
    last_error: Option<EvalError>,
    channels: io::Channels,
    interrupted: Arc<AtomicBool>,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// An interpreter with the primitives and the bundled math and I/O
    /// commands.
    pub fn new() -> Self {
        let mut interp = Self::bare();
        math::register(&mut interp);
        io::register(&mut interp);
        interp
    }

    /// An interpreter with only the control-flow and substitution
    /// primitives.
    pub fn bare() -> Self {
        let mut interp = Interp {
            env: Env::new(),
            commands: Registry::new(),
            result: Value::new(),
            last_error: None,
            channels: io::Channels::default(),
            interrupted: Arc::new(AtomicBool::new(false)),
        };
        control::register(&mut interp);
        interp
    }

    /// Registers a command. `arity` is the exact length of the argument list
    /// including the command name, or `0` to accept any length.
    pub fn register<F>(&mut self, name: impl Into<Value>, arity: usize, handler: F)
    where
        F: Fn(&mut Interp, &[Value], Option<&Value>) -> Flow + 'static,
    {
        self.add_command(name.into(), arity, Rc::new(handler), None);
    }

    /// Registers a command that receives `data` on every call.
    pub fn register_with<F>(&mut self, name: impl Into<Value>, arity: usize, handler: F, data: Value)
    where
        F: Fn(&mut Interp, &[Value], Option<&Value>) -> Flow + 'static,
    {
        self.add_command(name.into(), arity, Rc::new(handler), Some(Rc::new(data)));
    }

    fn add_command(
        &mut self,
        name: Value,
        arity: usize,
        handler: Handler,
        data: Option<Rc<Value>>,
    ) {
        trace!(command = %name, arity, "register");
        self.commands.register(Command { name, arity, handler, data });
    }

    /// Evaluates `src` as a script.
    ///
    /// A `break` or `continue` that no loop consumed comes back as
    /// [`Flow::Break`] / [`Flow::Again`]; hosts should treat that as a usage
    /// error (see [`Interp::run`]).
    pub fn eval(&mut self, src: impl AsRef<[u8]>) -> Flow {
        self.eval_script(src.as_ref())
    }

    /// Evaluates `src` and folds the flow signal into a `Result`.
    pub fn run(&mut self, src: impl AsRef<[u8]>) -> Result<Value, EvalError> {
        self.last_error = None;
        match self.eval_script(src.as_ref()) {
            Flow::Ok | Flow::Return => Ok(self.result.clone()),
            Flow::Error => Err(self
                .last_error
                .take()
                .unwrap_or_else(|| EvalError::Custom(self.result.to_string()))),
            flow => Err(EvalError::Escaped(flow)),
        }
    }

    pub(crate) fn eval_script(&mut self, src: &[u8]) -> Flow {
        let mut words: Vec<Value> = Vec::new();
        let mut cur: Option<Value> = None;

        for tok in Tokenizer::new(src) {
            match tok {
                Token::Error => return self.fail(EvalError::Syntax),
                Token::Word(text) | Token::Part(text) => {
                    let flow = self.subst(text);
                    if flow != Flow::Ok {
                        return flow;
                    }
                    let piece = self.take_result();
                    let word = match cur.take() {
                        Some(mut word) => {
                            word.append(piece);
                            word
                        }
                        None => piece,
                    };
                    if matches!(tok, Token::Word(_)) {
                        words.push(word);
                    } else {
                        cur = Some(word);
                    }
                }
                Token::Command => {
                    if words.is_empty() {
                        self.set_result(Flow::Ok, Value::new());
                        continue;
                    }
                    let flow = self.dispatch(&words);
                    words.clear();
                    if flow != Flow::Ok {
                        return flow;
                    }
                }
            }
        }
        Flow::Ok
    }

    /// Runs one command. Element 0 of `words` names it.
    pub fn dispatch(&mut self, words: &[Value]) -> Flow {
        let Some(name) = words.first() else {
            return self.set_result(Flow::Ok, Value::new());
        };
        if self.interrupted.load(Ordering::Relaxed) {
            return self.fail(EvalError::Interrupted);
        }
        let Some(cmd) = self.commands.lookup(name) else {
            return self.fail(EvalError::UnknownCommand(name.to_string()));
        };
        if !cmd.accepts(words.len()) {
            let err = EvalError::ArityMismatch {
                name: name.to_string(),
                expected: cmd.arity,
                got: words.len(),
            };
            return self.fail(err);
        }
        let handler = Rc::clone(&cmd.handler);
        let data = cmd.data.clone();
        trace!(command = %name, args = words.len(), "dispatch");
        handler(self, words, data.as_deref())
    }

    /// Substitutes a single word or word fragment.
    ///
    /// - `{text}` yields `text` verbatim;
    /// - `$name` yields the variable (evaluated as `set name`);
    /// - `[script]` yields the result of evaluating `script`, with its flow;
    /// - anything else is literal.
    pub fn subst(&mut self, span: &[u8]) -> Flow {
        match span.first() {
            None => self.set_result(Flow::Ok, Value::new()),
            Some(b'{') => {
                if span.len() < 2 {
                    return self.fail(EvalError::Syntax);
                }
                self.set_result(Flow::Ok, Value::from_bytes(&span[1..span.len() - 1]))
            }
            Some(b'$') => {
                if span.len() >= MAX_VAR_LENGTH {
                    return self.fail(EvalError::VarNameTooLong(span.len() - 1));
                }
                let mut cmd = b"set ".to_vec();
                cmd.extend_from_slice(&span[1..]);
                self.eval_script(&cmd)
            }
            Some(b'[') => {
                let inner = span.get(1..span.len() - 1).unwrap_or_default();
                trace!(script = %String::from_utf8_lossy(inner), "command substitution");
                self.eval_script(inner)
            }
            Some(_) => self.set_result(Flow::Ok, Value::from_bytes(span)),
        }
    }

    /// Substitutes every `$name` and `[script]` inside `text`, keeping all
    /// other bytes (whitespace, braces, quotes) as they are.
    pub fn subst_text(&mut self, text: &[u8]) -> Flow {
        let mut out = Value::new();
        let mut rest = text;
        while let Some(&c) = rest.first() {
            let consumed = match c {
                b'$' | b'[' => {
                    let step = scan(rest, true);
                    if step.kind == TokenKind::Error {
                        return self.fail(EvalError::Syntax);
                    }
                    let flow = self.subst(&rest[step.from..step.to]);
                    if flow != Flow::Ok {
                        return flow;
                    }
                    out.append(self.take_result());
                    step.to
                }
                _ => {
                    let n = rest
                        .iter()
                        .position(|&c| c == b'$' || c == b'[')
                        .unwrap_or(rest.len());
                    out.push_bytes(&rest[..n]);
                    n
                }
            };
            rest = &rest[consumed..];
        }
        self.set_result(Flow::Ok, out)
    }

    /// Evaluates a loop or branch condition. A condition made of a single word
    /// is substituted (`1`, `$flag`, `[cmd]`) unless it names a command;
    /// anything else runs as a script. The outcome is left in the result.
    pub(crate) fn eval_condition(&mut self, cond: &[u8]) -> Flow {
        let mut words = Tokenizer::new(cond).filter(|tok| *tok != Token::Command);
        match (words.next(), words.next()) {
            (Some(Token::Word(word)), None) if self.commands.lookup(word).is_none() => {
                self.subst(word)
            }
            _ => self.eval_script(cond),
        }
    }

    /// The last produced result.
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Moves the last result out, leaving an empty one behind.
    pub fn take_result(&mut self) -> Value {
        std::mem::take(&mut self.result)
    }

    /// Replaces the result and passes `flow` through.
    pub fn set_result(&mut self, flow: Flow, value: Value) -> Flow {
        if flow == Flow::Error {
            self.last_error = Some(EvalError::Custom(value.to_string()));
        }
        self.result = value;
        flow
    }

    /// Raises `err`: the result becomes its message.
    pub fn fail(&mut self, err: EvalError) -> Flow {
        debug!(error = %err, "evaluation failed");
        self.result = Value::from(err.to_string());
        self.last_error = Some(err);
        Flow::Error
    }

    /// The error behind the most recent [`Flow::Error`], if it is still known.
    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    /// Assigns a variable in the current scope.
    pub fn set_var(&mut self, name: &str, value: impl Into<Value>) {
        self.env.current().assign(name.as_bytes(), value.into());
    }

    /// Reads a variable of the current scope without creating it.
    pub fn var(&self, name: &str) -> Option<Value> {
        self.env.get(name.as_bytes()).cloned()
    }

    /// Number of live scopes (1 outside of any procedure call).
    pub fn depth(&self) -> usize {
        self.env.depth()
    }

    /// Registered command names, most recent first.
    pub fn command_names(&self) -> Vec<String> {
        self.commands.names()
    }

    /// Redirects the `stdout` channel.
    pub fn set_output(&mut self, out: impl Write + 'static) {
        self.channels.set_stdout(Box::new(out));
    }

    /// Flag that, while set, makes every dispatched command fail with
    /// [`EvalError::Interrupted`]. Safe to set from another thread; the host
    /// clears it before running the next script.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }
}
