//! Integration tests for substitution, quoting, lists and host embedding

#[path = "common/mod.rs"]
mod common;
#[allow(unused_imports)]
use common::{eval, eval_output, list, EvalError, Flow, Interp, Value};

#[test]
fn test_variable_substitution() {
    assert_eq!(eval("set x 5; set y $x").unwrap(), "5");
    assert_eq!(eval("set x 5; set y pre${x}post").unwrap(), "pre5post");
    assert_eq!(eval("set x 5; set y a$x").unwrap(), "a5");
}

#[test]
fn test_subst_command() {
    assert_eq!(eval("set x 5; subst {a $x b}").unwrap(), "a 5 b");
    assert_eq!(eval("subst {sum [+ 1 2] {kept}}").unwrap(), "sum 3 {kept}");
    assert_eq!(eval("subst {no substitutions}").unwrap(), "no substitutions");
}

#[test]
fn test_quoted_word_keeps_spacing() {
    assert_eq!(eval("set x \"  two  spaces  \"").unwrap(), "  two  spaces  ");
    assert_eq!(eval("set x \"a;b\"").unwrap(), "a;b");
}

#[test]
fn test_nested_braces_are_verbatim() {
    assert_eq!(eval("set x {a {b c} [d]}").unwrap(), "a {b c} [d]");
}

#[test]
fn test_nested_command_substitution() {
    assert_eq!(eval("+ [+ [+ 1 1] 1] [* 2 [- 5 3]]").unwrap(), "7");
}

#[test]
fn test_variable_names_with_substitution() {
    // The name after $ is itself scanned as a word
    assert_eq!(eval("set ab 9; set n b; set y [set a$n]").unwrap(), "9");
}

#[test]
fn test_syntax_errors() {
    for script in ["set x {abc", "set x [abc", "set x \"abc", "set x abc}", "]", "set x $", "puts \"a\"b"] {
        assert_eq!(eval(script).unwrap_err(), "syntax error", "script: {script:?}");
    }
}

#[test]
fn test_empty_scripts() {
    assert_eq!(eval("").unwrap(), "");
    assert_eq!(eval("\n\n;;").unwrap(), "");
    assert_eq!(eval("   ").unwrap(), "");
}

#[test]
fn test_math_module() {
    assert_eq!(eval("/ -7 2").unwrap(), "-3");
    assert_eq!(eval("* 3 {4}").unwrap(), "12");
    assert_eq!(eval("> 10 9").unwrap(), "1");
    assert_eq!(eval("+ 12abc 1").unwrap(), "13");
}

#[test]
fn test_list_helpers() {
    let mut l = list::new();
    list::append(&mut l, b"a");
    list::append(&mut l, b"b c");
    list::append(&mut l, b"");
    assert_eq!(l, "a {b c} {}");
    assert_eq!(list::length(&l), 3);
    assert_eq!(list::at(&l, 1), Some(Value::from("b c")));
    assert_eq!(list::at(&l, 2), Some(Value::new()));
    assert_eq!(list::at(&l, 3), None);
}

#[test]
fn test_proc_definition_is_a_list() {
    // Parameters and body go through the list codec unchanged
    let mut interp = Interp::new();
    interp.run("proc greet {who greeting} {return \"$greeting $who\"}").unwrap();
    assert_eq!(interp.run("greet world hello").unwrap(), "hello world");
}

#[test]
fn test_host_command_with_data() {
    let mut interp = Interp::new();
    interp.register_with(
        "prefix",
        2,
        |interp, args, data| {
            let mut out = data.cloned().unwrap_or_default();
            out.push_bytes(&args[1]);
            interp.set_result(Flow::Ok, out)
        },
        Value::from(">> "),
    );
    assert_eq!(interp.run("prefix [+ 1 1]").unwrap(), ">> 2");
}

#[test]
fn test_host_can_read_and_write_variables() {
    let mut interp = Interp::new();
    interp.set_var("name", "tcl");
    assert_eq!(interp.run("set greeting \"hi $name\"").unwrap(), "hi tcl");
    assert_eq!(interp.var("greeting"), Some(Value::from("hi tcl")));
}

#[test]
fn test_last_error_is_typed() {
    let mut interp = Interp::new();
    assert_eq!(interp.eval("frobnicate"), Flow::Error);
    assert!(matches!(interp.last_error(), Some(EvalError::UnknownCommand(name)) if name == "frobnicate"));
    assert_eq!(*interp.result(), "invalid command name \"frobnicate\"");
}

#[test]
fn test_puts_output() {
    assert_eq!(eval_output("puts hello; puts \"a b\"").unwrap(), "hello\na b\n");
    assert_eq!(eval_output("puts -nonewline x; puts stdout y").unwrap(), "xy\n");
    assert!(eval_output("puts").unwrap_err().contains("wrong # args"));
}

#[test]
fn test_value_numbers() {
    assert_eq!(Value::from("  42abc").int(), 42);
    assert_eq!(Value::from("2.5").num(), 2.5);
    assert_eq!(Value::from("x").num(), 0.0);
    assert_eq!(Value::from(-3i64), "-3");
}

#[test]
fn test_convenience_eval() {
    assert_eq!(tinytcl::eval("+ 40 2").unwrap(), "42");
    assert!(matches!(tinytcl::eval("break"), Err(EvalError::Escaped(Flow::Break))));
}
