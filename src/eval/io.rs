//! Channel I/O commands: `puts`, `open`, `read`, `close`.
//!
//! Channels are named by plain strings: `stdin`, `stdout`, `stderr`, or a
//! `fileN` handle returned by `open`. The `stdout` channel writes to a sink
//! the host can replace (see [`Interp::set_output`]).

use super::{EvalError, Flow, Interp};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::rc::Rc;
use tracing::debug;

pub(super) fn register(interp: &mut Interp) {
    interp.register("puts", 0, Interp::cmd_puts);
    interp.register("open", 0, Interp::cmd_open);
    interp.register("read", 2, Interp::cmd_read);
    interp.register("close", 2, Interp::cmd_close);
}

/// Open channels of one interpreter.
pub(crate) struct Channels {
    stdout: Box<dyn Write>,
    files: HashMap<String, File>,
    next_id: usize,
}

impl Default for Channels {
    fn default() -> Self {
        Channels {
            stdout: Box::new(io::stdout()),
            files: HashMap::new(),
            next_id: 1,
        }
    }
}

impl Channels {
    pub(crate) fn set_stdout(&mut self, out: Box<dyn Write>) {
        self.stdout = out;
    }

    fn add(&mut self, file: File) -> String {
        let handle = format!("file{}", self.next_id);
        self.next_id += 1;
        self.files.insert(handle.clone(), file);
        handle
    }

    fn file(&mut self, name: &[u8]) -> Result<&mut File, EvalError> {
        let name = String::from_utf8_lossy(name);
        match self.files.get_mut(name.as_ref()) {
            Some(file) => Ok(file),
            None => Err(EvalError::NotFound(format!("channel \"{}\"", name))),
        }
    }

    fn write(&mut self, name: &[u8], text: &[u8], newline: bool) -> Result<(), EvalError> {
        match name {
            b"stdout" => write_text(self.stdout.as_mut(), text, newline)?,
            b"stderr" => write_text(&mut io::stderr(), text, newline)?,
            _ => write_text(self.file(name)?, text, newline)?,
        }
        Ok(())
    }

    fn read(&mut self, name: &[u8]) -> Result<Vec<u8>, EvalError> {
        let mut buf = Vec::new();
        match name {
            b"stdin" => io::stdin().read_to_end(&mut buf)?,
            _ => self.file(name)?.read_to_end(&mut buf)?,
        };
        Ok(buf)
    }

    fn close(&mut self, name: &[u8]) -> Result<(), EvalError> {
        if matches!(name, b"stdin" | b"stdout" | b"stderr") {
            return Ok(());
        }
        let key = String::from_utf8_lossy(name).into_owned();
        match self.files.remove(&key) {
            Some(_) => Ok(()),
            None => Err(EvalError::NotFound(format!("channel \"{}\"", key))),
        }
    }
}

fn write_text(out: &mut dyn Write, text: &[u8], newline: bool) -> io::Result<()> {
    out.write_all(text)?;
    if newline {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// In-memory sink for the `stdout` channel. Clones share one buffer, so a
/// host keeps a clone and reads back what scripts printed.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Empties the buffer, returning what it held.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Interp {
    /// puts: `puts ?-nonewline? ?channel? text`
    fn cmd_puts(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let (newline, rest) = match args {
            [_, flag, rest @ ..] if flag == "-nonewline" => (false, rest),
            [_, rest @ ..] => (true, rest),
            [] => (true, args),
        };
        let (channel, text): (&[u8], &Value) = match rest {
            [text] => (&b"stdout"[..], text),
            [channel, text] => (channel.as_bytes(), text),
            _ => return self.fail(EvalError::WrongArgs("puts ?-nonewline? ?channelId? string")),
        };
        match self.channels.write(channel, text, newline) {
            Ok(()) => self.set_result(Flow::Ok, Value::new()),
            Err(err) => self.fail(err),
        }
    }

    /// open: `open path ?r|w|a?` - yields a channel handle
    fn cmd_open(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let (path, mode): (&Value, &[u8]) = match args {
            [_, path] => (path, &b"r"[..]),
            [_, path, mode] => (path, mode.as_bytes()),
            _ => return self.fail(EvalError::WrongArgs("open fileName ?access?")),
        };
        let mut options = OpenOptions::new();
        match mode {
            b"r" => {
                options.read(true);
            }
            b"w" => {
                options.write(true).create(true).truncate(true);
            }
            b"a" => {
                options.append(true).create(true);
            }
            _ => return self.fail(EvalError::WrongArgs("open fileName ?r|w|a?")),
        }
        let path = path.to_string();
        match options.open(&path) {
            Ok(file) => {
                let handle = self.channels.add(file);
                debug!(%path, %handle, "open channel");
                self.set_result(Flow::Ok, Value::from(handle))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.fail(EvalError::NotFound(format!("file \"{}\"", path)))
            }
            Err(err) => self.fail(EvalError::Io(err)),
        }
    }

    /// read: `read channel` - the rest of the channel's contents
    fn cmd_read(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let [_, channel] = args else {
            return self.fail(EvalError::WrongArgs("read channelId"));
        };
        match self.channels.read(channel) {
            Ok(data) => self.set_result(Flow::Ok, Value::from(data)),
            Err(err) => self.fail(err),
        }
    }

    /// close: `close channel`
    fn cmd_close(&mut self, args: &[Value], _: Option<&Value>) -> Flow {
        let [_, channel] = args else {
            return self.fail(EvalError::WrongArgs("close channelId"));
        };
        match self.channels.close(channel) {
            Ok(()) => self.set_result(Flow::Ok, Value::new()),
            Err(err) => self.fail(err),
        }
    }
}
