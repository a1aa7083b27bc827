use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Editor, Helper, Result as RlResult};
use std::borrow::Cow;
use std::env;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tinytcl::{needs_more_input, Interp};
use tracing::warn;

use crate::cli::{print_help, VERSION};
use crate::rcfile::{history_path, load_tinytclrc};
use crate::terminal::{describe_error, execute_line};

const PROMPT: &str = "tcl> ";

// ============================================
// TclHelper: rustyline helper with command completion
// ============================================

/// Helper struct for rustyline: completes and hints command names, and
/// keeps reading lines while a brace, bracket or quote is open
struct TclHelper {
    commands: Vec<String>,
}

impl TclHelper {
    /// Command names starting with `prefix`, sorted
    fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Byte offset where the word under the cursor starts. Words begin after
/// whitespace, a command separator or an opening bracket.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(|c: char| c.is_whitespace() || c == '[' || c == ';')
        .map(|i| i + 1)
        .unwrap_or(0)
}

impl Helper for TclHelper {}

impl Completer for TclHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(line, pos);
        let prefix = &line[start..pos];

        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }

        let pairs: Vec<Pair> = self
            .candidates(prefix)
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();

        Ok((start, pairs))
    }
}

impl Hinter for TclHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let prefix = &line[word_start(line, pos)..pos];
        if prefix.is_empty() {
            return None;
        }
        // Only hint an unambiguous completion
        match self.candidates(prefix).as_slice() {
            [only] if only.len() > prefix.len() => Some(only[prefix.len()..].to_string()),
            _ => None,
        }
    }
}

impl Highlighter for TclHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize) -> bool {
        false
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim the completion hint
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }
}

impl Validator for TclHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> RlResult<ValidationResult> {
        if needs_more_input(ctx.input().as_bytes()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

// ============================================
// REPL main loop
// ============================================

/// Run the interactive REPL
pub(crate) fn run_repl() -> RlResult<()> {
    let mut rl = Editor::new()?;

    let mut interp = Interp::new();
    load_tinytclrc(&mut interp);

    rl.set_helper(Some(TclHelper {
        commands: interp.command_names(),
    }));

    // Ctrl-C while a script runs stops it at the next command. While
    // rustyline owns the terminal, Ctrl-C arrives as ReadlineError::Interrupted.
    let interrupted = interp.interrupt_handle();
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    if env::var("TINYTCL_BANNER").is_ok() {
        println!("tinytcl {} - minimal Tcl interpreter", VERSION);
        println!("  Type 'exit' or Ctrl-D to quit, '.help' for usage");
    }

    loop {
        // Procedures defined by the previous line become completable
        if let Some(helper) = rl.helper_mut() {
            helper.commands = interp.command_names();
        }

        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "exit" => break,
                    ".help" | ".h" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                interrupted.store(false, Ordering::SeqCst);
                if let Err(e) = execute_line(&mut interp, &line, true) {
                    eprintln!("{}", describe_error(&e));
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - abandon the current line
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}
