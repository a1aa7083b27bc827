//! Integer math and comparison commands: `+ - * / > >= < <= == !=`.
//!
//! Operands are read with [`Value::int`], so anything non-numeric counts as
//! zero. Comparisons produce `1` or `0`.

use super::{EvalError, Flow, Interp};
use crate::value::Value;

const OPERATORS: [&str; 10] = ["+", "-", "*", "/", ">", ">=", "<", "<=", "==", "!="];

pub(super) fn register(interp: &mut Interp) {
    for op in OPERATORS {
        interp.register(op, 3, Interp::cmd_math);
    }
}

impl Interp {
    fn cmd_math(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let [op, a, b] = args else {
            return self.fail(EvalError::WrongArgs("op a b"));
        };
        let (a, b) = (a.int(), b.int());
        let n = match op.as_bytes() {
            b"+" => a.wrapping_add(b),
            b"-" => a.wrapping_sub(b),
            b"*" => a.wrapping_mul(b),
            b"/" => match a.checked_div(b) {
                Some(n) => n,
                None if b == 0 => return self.fail(EvalError::DivisionByZero),
                None => a.wrapping_div(b),
            },
            b">" => i64::from(a > b),
            b">=" => i64::from(a >= b),
            b"<" => i64::from(a < b),
            b"<=" => i64::from(a <= b),
            b"==" => i64::from(a == b),
            b"!=" => i64::from(a != b),
            _ => return self.fail(EvalError::UnknownCommand(op.to_string())),
        };
        self.set_result(Flow::Ok, Value::from(n))
    }
}
