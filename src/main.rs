//! tinytcl - a minimal Tcl interpreter
//!
//! Usage:
//!   tinytcl              Start interactive REPL
//!   tinytcl -c "cmd"     Evaluate a script given on the command line
//!   tinytcl script.tcl   Evaluate a script file

mod cli;
mod rcfile;
mod repl;
mod terminal;

use cli::{execute_command, execute_script, parse_args, print_help, print_version};
use std::env;
use std::process::ExitCode;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing to stderr.
///
/// Enable with `TINYTCL_LOG=tinytcl=debug` (falls back to `RUST_LOG`), or
/// force `tinytcl=trace` with `--trace`.
fn init_tracing(trace: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if trace {
            EnvFilter::new("tinytcl=trace")
        } else if let Ok(directives) = env::var("TINYTCL_LOG") {
            EnvFilter::new(directives)
        } else if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.trace);

    if let Some(cmd) = cli.command {
        return execute_command(&cmd);
    }

    if let Some(script) = cli.script {
        return execute_script(&script);
    }

    match repl::run_repl() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("REPL error: {}", e);
            ExitCode::FAILURE
        }
    }
}
