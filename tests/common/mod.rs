//! Common test utilities for tinytcl integration tests

pub use tinytcl::{list, EvalError, Flow, Interp, OutputBuffer, Value};

/// Helper to evaluate a script in a fresh interpreter and return its result
pub fn eval(input: &str) -> Result<String, String> {
    let mut interp = Interp::new();
    interp.run(input).map(|v| v.to_string()).map_err(|e| e.to_string())
}

/// Helper to evaluate a script and return everything it printed to stdout
#[allow(dead_code)]
pub fn eval_output(input: &str) -> Result<String, String> {
    let mut interp = Interp::new();
    let out = OutputBuffer::new();
    interp.set_output(out.clone());
    interp.run(input).map_err(|e| e.to_string())?;
    Ok(out.contents())
}

/// Helper to evaluate a script and return the raw flow signal with the result
#[allow(dead_code)]
pub fn eval_flow(input: &str) -> (Flow, String) {
    let mut interp = Interp::new();
    let flow = interp.eval(input);
    (flow, interp.result().to_string())
}
