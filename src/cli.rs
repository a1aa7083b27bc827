use crate::terminal::{describe_error, execute_line};
use std::fs;
use std::process::ExitCode;
use tinytcl::Interp;

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) script: Option<String>,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) trace: bool,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--trace" => {
                cli.trace = true;
            }
            "-c" => {
                // Everything after -c is the script
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                    break;
                }
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            path => {
                // Assume it's a script file if not a flag
                if !path.starts_with('-') {
                    cli.script = Some(path.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"tinytcl {} - a minimal Tcl interpreter

USAGE:
    tinytcl                 Start interactive REPL
    tinytcl -c <script>     Evaluate a script given on the command line
    tinytcl <file.tcl>      Evaluate a script file
    tinytcl --trace         Log every dispatched command to stderr
    tinytcl --help          Show this help message
    tinytcl --version       Show version

STARTUP:
    ~/.tinytclrc            Sourced on REPL startup (if exists)
    TINYTCLRC=path          Use another rc file
    TINYTCL_BANNER=1        Show startup banner (quiet by default)
    TINYTCL_LOG=filter      Log filter, e.g. tinytcl=debug (or RUST_LOG)

SYNTAX:
    cmd arg arg             Words separated by spaces
    cmd; cmd                Commands separated by newlines or ;
    $name                   Variable substitution
    [cmd ...]               Command substitution
    "text $x [cmd]"         Quoted word, substitutes inside
    {{text}}                Braced word, taken verbatim

COMMANDS:
    set name ?value?        Read or assign a variable
    subst text              Substitute variables and commands in text
    proc name {{args}} {{body}} Define a procedure
    if cond body ?cond body ...? ?else?
    while cond body         Loop while cond is non-zero
    return ?value?          Leave the current procedure
    break / continue        Leave / restart the current loop
    + - * /                 Integer math: + 1 2
    > >= < <= == !=         Comparisons, yield 1 or 0
    puts ?-nonewline? ?channel? text
    open path ?r|w|a?       Open a file, yields a channel
    read channel            Read the rest of a channel
    close channel           Close a channel

REPL:
    exit / Ctrl-D           Leave
    Ctrl-C                  Abandon the current line, or interrupt a script
"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("tinytcl {}", VERSION);
}

/// Evaluate a one-shot script from the command line
pub(crate) fn execute_command(cmd: &str) -> ExitCode {
    let mut interp = Interp::new();

    match execute_line(&mut interp, cmd, true) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// Evaluate a script file as a single script
pub(crate) fn execute_script(path: &str) -> ExitCode {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error reading {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interp::new();

    match execute_line(&mut interp, &content, true) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", path, describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tinytcl").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn dash_c_takes_the_rest() {
        let cli = parse_args(&args(&["--trace", "-c", "puts", "hi"]));
        assert!(cli.trace);
        assert_eq!(cli.command.as_deref(), Some("puts hi"));
        assert_eq!(cli.script, None);
    }

    #[test]
    fn bare_argument_is_a_script() {
        let cli = parse_args(&args(&["run.tcl"]));
        assert_eq!(cli.script.as_deref(), Some("run.tcl"));
    }

    #[test]
    fn flags() {
        assert!(parse_args(&args(&["-h"])).help);
        assert!(parse_args(&args(&["--version"])).version);
        assert_eq!(parse_args(&args(&[])), CliArgs::default());
    }
}
