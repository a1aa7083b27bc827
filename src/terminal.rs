use tinytcl::{EvalError, Interp};

/// Execute a chunk of tcl code, printing a non-empty result
pub(crate) fn execute_line(interp: &mut Interp, input: &str, print_output: bool) -> Result<(), EvalError> {
    let result = interp.run(input)?;
    if print_output && !result.is_empty() {
        println!("{}", result);
    }
    Ok(())
}

/// Format an error the way the REPL and the one-shot modes report it
pub(crate) fn describe_error(err: &EvalError) -> String {
    match err {
        EvalError::Escaped(_) => format!("usage error: {}", err),
        _ => format!("error: {}", err),
    }
}
