use crate::terminal::{describe_error, execute_line};
use std::env;
use std::fs;
use std::path::PathBuf;
use tinytcl::{needs_more_input, Interp};

/// Get home directory
pub(crate) fn dirs_home() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// The rc file: `$TINYTCLRC`, else `~/.tinytclrc`
fn rc_path() -> Option<PathBuf> {
    env::var_os("TINYTCLRC")
        .map(PathBuf::from)
        .or_else(|| dirs_home().map(|h| h.join(".tinytclrc")))
}

/// REPL history file (~/.tinytcl_history)
pub(crate) fn history_path() -> Option<PathBuf> {
    dirs_home().map(|h| h.join(".tinytcl_history"))
}

/// Load and execute the rc file if it exists
pub(crate) fn load_tinytclrc(interp: &mut Interp) {
    let Some(path) = rc_path() else {
        return;
    };

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return,
    };

    load_rc_content(interp, &content, &path.display().to_string());
}

/// Run rc content one complete command group at a time, so a failing group
/// only skips itself
fn load_rc_content(interp: &mut Interp, content: &str, source: &str) {
    let mut buffer = String::new();
    let mut start_line = 1;

    for (line_num, line) in content.lines().enumerate() {
        if buffer.is_empty() {
            start_line = line_num + 1;
        }
        buffer.push_str(line);
        buffer.push('\n');

        // Keep joining lines while a brace, bracket or quote is open
        if needs_more_input(buffer.as_bytes()) {
            continue;
        }

        run_group(interp, &buffer, source, start_line);
        buffer.clear();
    }

    if !buffer.trim().is_empty() {
        run_group(interp, &buffer, source, start_line);
    }
}

fn run_group(interp: &mut Interp, code: &str, source: &str, line: usize) {
    if let Err(e) = execute_line(interp, code, false) {
        eprintln!("Warning: {} line {}: {}", source, line, describe_error(&e));
    }
}
