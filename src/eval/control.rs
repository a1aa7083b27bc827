use super::{EvalError, Flow, Interp, MAX_CALL_DEPTH};
use crate::list;
use crate::value::Value;
use tracing::debug;

pub(super) fn register(interp: &mut Interp) {
    interp.register("set", 0, Interp::cmd_set);
    interp.register("subst", 2, Interp::cmd_subst);
    interp.register("proc", 4, Interp::cmd_proc);
    interp.register("if", 0, Interp::cmd_if);
    interp.register("while", 3, Interp::cmd_while);
    interp.register("return", 0, Interp::cmd_flow);
    interp.register("break", 1, Interp::cmd_flow);
    interp.register("continue", 1, Interp::cmd_flow);
    interp.register("#", 0, Interp::cmd_comment);
}

impl Interp {
    /// set: `set name ?value?` - read (creating if needed) or assign a variable
    /// of the current scope
    fn cmd_set(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let value = match args {
            [_, name] => self.env.current().lookup_or_create(name).clone(),
            [_, name, value] => {
                self.env.current().assign(name, value.clone());
                value.clone()
            }
            _ => return self.fail(EvalError::WrongArgs("set varName ?newValue?")),
        };
        self.set_result(Flow::Ok, value)
    }

    /// subst: `subst text` - substitute variables and commands inside text
    fn cmd_subst(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        match args {
            [_, text] => self.subst_text(text),
            _ => self.fail(EvalError::WrongArgs("subst string")),
        }
    }

    /// proc: `proc name params body` - define a procedure
    ///
    /// The whole definition is captured, as a list, by the command.
    fn cmd_proc(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let [_, name, ..] = args else {
            return self.fail(EvalError::WrongArgs("proc name args body"));
        };
        debug!(name = %name, "define procedure");
        self.register_with(name.clone(), 0, Interp::call_proc, list::from_elements(args));
        self.set_result(Flow::Ok, Value::new())
    }

    /// Runs a procedure body in a fresh scope with the parameters bound by
    /// position. Missing arguments bind to the empty value.
    ///
    /// Whatever flow the body ends with, the call itself is `Ok` and the
    /// body's result (an error message included) is the call's result.
    fn call_proc(&mut self, args: &[Value], def: Option<&Value>) -> Flow {
        let Some(def) = def else {
            return self.fail(EvalError::Custom("procedure has no definition".into()));
        };
        if self.env.depth() > MAX_CALL_DEPTH {
            return self.fail(EvalError::TooDeep(MAX_CALL_DEPTH));
        }
        let params = list::at(def, 2).unwrap_or_default();
        let body = list::at(def, 3).unwrap_or_default();
        debug!(name = %args[0], depth = self.env.depth() + 1, "call procedure");

        self.env.enter();
        for (i, param) in list::parse(&params).iter().enumerate() {
            let value = args.get(i + 1).cloned().unwrap_or_default();
            self.env.current().assign(param, value);
        }
        let flow = self.eval_script(&body);
        self.env.leave();

        if flow == Flow::Error {
            debug!(name = %args[0], error = %self.result, "procedure failed");
            self.last_error = None;
        }
        Flow::Ok
    }

    /// if: `if cond body ?cond body ...? ?else-body?`
    ///
    /// The first condition whose value is greater than zero selects its body;
    /// a trailing unpaired argument is the else branch.
    fn cmd_if(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        if args.len() < 3 {
            return self.fail(EvalError::WrongArgs("if cond body ?cond body ...? ?else?"));
        }
        let mut i = 1;
        while i < args.len() {
            if i + 1 == args.len() {
                return self.eval_script(&args[i]);
            }
            let flow = self.eval_condition(&args[i]);
            if flow != Flow::Ok {
                return flow;
            }
            if self.result().num() > 0.0 {
                return self.eval_script(&args[i + 1]);
            }
            i += 2;
        }
        self.set_result(Flow::Ok, Value::new())
    }

    /// while: `while cond body` - loop while the condition is non-zero
    fn cmd_while(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let [_, cond, body] = args else {
            return self.fail(EvalError::WrongArgs("while cond body"));
        };
        loop {
            let flow = self.eval_condition(cond);
            if flow != Flow::Ok {
                return flow;
            }
            if self.result().num() == 0.0 {
                break;
            }
            match self.eval_script(body) {
                Flow::Ok | Flow::Again => {}
                Flow::Break => break,
                flow @ (Flow::Return | Flow::Error) => return flow,
            }
        }
        self.set_result(Flow::Ok, Value::new())
    }

    /// return / break / continue
    fn cmd_flow(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        match args {
            [kw, rest @ ..] if kw == "return" && rest.len() <= 1 => {
                let value = rest.first().cloned().unwrap_or_default();
                self.set_result(Flow::Return, value)
            }
            [kw] if kw == "break" => Flow::Break,
            [kw] if kw == "continue" => Flow::Again,
            _ => self.fail(EvalError::WrongArgs("return ?value?")),
        }
    }

    /// #: comment - the rest of the command is ignored
    fn cmd_comment(&mut self, _: &[Value], _: Option<&Value>) -> Flow {
        self.set_result(Flow::Ok, Value::new())
    }
}
