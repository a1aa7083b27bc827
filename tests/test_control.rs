//! Integration tests for procedures and control flow

#[path = "common/mod.rs"]
mod common;
#[allow(unused_imports)]
use common::{eval, eval_flow, EvalError, Flow, Interp, Value};

#[test]
fn test_recursive_factorial() {
    let script = "proc fact {n} {if {<= $n 1} {return 1}; return [* $n [fact [- $n 1]]]}; fact 5";
    assert_eq!(eval(script).unwrap(), "120");
}

#[test]
fn test_fibonacci_loop() {
    let script = "set a 0; set b 1; set i 0
while {< $i 10} {
    set t [+ $a $b]; set a $b; set b $t
    set i [+ $i 1]
}
set a";
    assert_eq!(eval(script).unwrap(), "55");
}

#[test]
fn test_proc_redefinition_shadows() {
    assert_eq!(eval("proc f {} {return one}; proc f {} {return two}; f").unwrap(), "two");
}

#[test]
fn test_proc_arguments_are_local() {
    let mut interp = Interp::new();
    interp.run("set n outer; proc f {n} {set n inner}").unwrap();
    assert_eq!(interp.run("f x").unwrap(), "inner");
    assert_eq!(interp.var("n").map(|v| v.to_string()).as_deref(), Some("outer"));
}

#[test]
fn test_return_inside_loop_leaves_proc() {
    let script = "proc find {} {set i 0; while {< $i 10} {if {== $i 4} {return $i}; set i [+ $i 1]}; return none}; find";
    assert_eq!(eval(script).unwrap(), "4");
}

#[test]
fn test_break_inside_proc_stays_inside() {
    // A stray break ends the procedure body without leaving the caller's loop
    let script = "proc f {} {break; return unreachable}; set n 0; while {< $n 3} {f; set n [+ $n 1]}; set n";
    assert_eq!(eval(script).unwrap(), "3");
}

#[test]
fn test_nested_loops() {
    let script = "set total 0; set i 0
while {< $i 3} {
    set j 0
    while {< $j 3} {
        if {== $j 2} {break}
        set total [+ $total 1]
        set j [+ $j 1]
    }
    set i [+ $i 1]
}
set total";
    assert_eq!(eval(script).unwrap(), "6");
}

#[test]
fn test_condition_from_variable_and_command() {
    assert_eq!(eval("set flag 1; if $flag {set r yes} {set r no}").unwrap(), "yes");
    assert_eq!(eval("if [== 1 2] {set r yes} {set r no}").unwrap(), "no");
}

#[test]
fn test_flow_signals_at_top_level() {
    assert_eq!(eval_flow("break").0, Flow::Break);
    assert_eq!(eval_flow("continue").0, Flow::Again);
    assert_eq!(eval_flow("return 7"), (Flow::Return, "7".to_string()));
    assert_eq!(eval_flow("set x 1; nope").0, Flow::Error);
}

#[test]
fn test_error_aborts_script() {
    let mut interp = Interp::new();
    assert!(interp.run("set a 1; nope; set a 2").is_err());
    assert_eq!(interp.var("a").map(|v| v.to_string()).as_deref(), Some("1"));
}

#[test]
fn test_error_in_loop_body_propagates() {
    let err = eval("set i 0; while {< $i 3} {set i [+ $i 1]; / 1 0}").unwrap_err();
    assert_eq!(err, "division by zero");
}

#[test]
fn test_wrong_arity_of_primitives() {
    assert!(eval("while {1}").unwrap_err().starts_with("arity mismatch"));
    assert!(eval("proc f {}").unwrap_err().starts_with("arity mismatch"));
    assert!(eval("set").unwrap_err().contains("wrong # args"));
    assert!(eval("break now").unwrap_err().starts_with("arity mismatch"));
}

#[test]
fn test_deep_recursion_is_caught() {
    let mut interp = Interp::new();
    interp.run("proc down {n} {down [+ $n 1]}").unwrap();
    let result = interp.run("down 0").unwrap();
    assert!(result.to_string().starts_with("too many nested procedure calls"));
    assert_eq!(interp.depth(), 1);
}

#[test]
fn test_failing_proc_does_not_stop_caller() {
    let mut interp = Interp::new();
    interp.run("proc f {} {nosuch}").unwrap();
    assert_eq!(interp.eval("f; set after 1"), Flow::Ok);
    assert_eq!(interp.var("after"), Some(Value::from("1")));
}

#[test]
fn test_proc_call_yields_error_message() {
    let result = eval("proc half {n} {/ $n 0}; half 4").unwrap();
    assert_eq!(result, "division by zero");
}

#[test]
fn test_command_as_condition() {
    let mut interp = Interp::new();
    interp.run("proc yes {} {return 1}").unwrap();
    assert_eq!(interp.run("if {yes} {set r taken} {set r skipped}").unwrap(), "taken");

    interp.run("set k 0; proc never {} {return 0}").unwrap();
    interp.run("while {never} {set k [+ $k 1]}").unwrap();
    assert_eq!(interp.var("k"), Some(Value::from("0")));

    interp.run("proc more {} {== 1 1}").unwrap();
    interp.run("while {more} {set k [+ $k 1]; if {== $k 3} {break}}").unwrap();
    assert_eq!(interp.var("k"), Some(Value::from("3")));
}
