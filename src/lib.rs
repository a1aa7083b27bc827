//! tinytcl - a minimal embeddable Tcl interpreter
//!
//! # Overview
//!
//! tinytcl evaluates scripts in a small Tcl dialect. Everything is a string:
//! words, lists, numbers and procedure bodies are all byte strings, and the
//! meaning of a word depends only on the command that receives it.
//!
//! # Core Concepts
//!
//! ## Commands and Words
//!
//! ```text
//! # A script is a sequence of commands separated by newlines or `;`
//! set x 5; set y 10
//!
//! # Words are separated by whitespace; the first word names the command
//! puts hello
//! ```
//!
//! ## Substitution
//!
//! ```text
//! set y $x                 # variable
//! set y [+ $x 1]           # command result
//! set y "x is $x"          # quoted words substitute inside
//! set y {x is $x}          # braced words are taken verbatim
//! ```
//!
//! ## Procedures and Control Flow
//!
//! ```text
//! proc square {n} {* $n $n}
//! set i 0
//! while {< $i 3} {set i [+ $i 1]}
//! if {== $i 3} {puts done} {puts never}
//! ```
//!
//! # Embedding
//!
//! ```rust
//! use tinytcl::{Flow, Interp, Value};
//!
//! let mut interp = Interp::new();
//! interp.register("double", 2, |interp, args, _| {
//!     let n = args[1].int() * 2;
//!     interp.set_result(Flow::Ok, Value::from(n))
//! });
//! let result = interp.run("double [+ 1 2]").unwrap();
//! assert_eq!(result, "6");
//! ```

pub mod env;
pub mod eval;
pub mod lexer;
pub mod list;
pub mod registry;
pub mod value;

// Re-export commonly used items
pub use eval::{EvalError, Flow, Interp, OutputBuffer, MAX_CALL_DEPTH, MAX_VAR_LENGTH};
pub use lexer::{needs_more_input, Token, Tokenizer};
pub use registry::{Command, Registry};
pub use value::Value;

/// Convenience function to evaluate a script in a fresh interpreter
pub fn eval(input: &str) -> Result<Value, EvalError> {
    Interp::new().run(input)
}
