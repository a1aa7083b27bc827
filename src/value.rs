//! Values for tinytcl
//!
//! Every value is an owned byte string. Scalars and lists share the same
//! representation: a list is a value whose bytes are a valid list encoding
//! (see [`crate::list`]). Numbers are parsed on demand and rendered back to
//! decimal text.

use nom::{
    character::complete::{i64 as integer, multispace0},
    number::complete::double,
    sequence::preceded,
    IResult,
};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// An owned script value.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Value(Vec<u8>);

impl Value {
    /// The empty value.
    pub fn new() -> Self {
        Value(Vec::new())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Value(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Appends raw bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    /// Appends `tail`, consuming it.
    pub fn append(&mut self, tail: Value) {
        if self.0.is_empty() {
            self.0 = tail.0;
        } else {
            self.0.extend_from_slice(&tail.0);
        }
    }

    /// Text view of the value; invalid UTF-8 is replaced.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Numeric reading of the value: the leading floating point number after
    /// optional whitespace, or `0` when there is none. `nan` and `inf`
    /// spellings (and overflow to infinity) read as `0`.
    pub fn num(&self) -> f64 {
        let parsed: IResult<&[u8], f64> = preceded(multispace0, double)(self.0.as_slice());
        parsed.map(|(_, n)| n).ok().filter(|n| n.is_finite()).unwrap_or(0.0)
    }

    /// Integer reading of the value: the leading decimal integer after
    /// optional whitespace, or `0` when there is none.
    pub fn int(&self) -> i64 {
        let parsed: IResult<&[u8], i64> = preceded(multispace0, integer)(self.0.as_slice());
        parsed.map(|(_, n)| n).unwrap_or(0)
    }
}

impl Deref for Value {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Value {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str_lossy())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value(n.to_string().into_bytes())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from(if b { "1" } else { "0" })
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_readings() {
        assert_eq!(Value::from("42").num(), 42.0);
        assert_eq!(Value::from("  -2.5xyz").num(), -2.5);
        assert_eq!(Value::from("abc").num(), 0.0);
        assert_eq!(Value::from("").num(), 0.0);
        assert_eq!(Value::from("nancy").num(), 0.0);
        assert_eq!(Value::from("inf").num(), 0.0);
        assert_eq!(Value::from("1e999").num(), 0.0);
        assert_eq!(Value::from("17 apples").int(), 17);
        assert_eq!(Value::from("3.9").int(), 3);
        assert_eq!(Value::from("-8").int(), -8);
        assert_eq!(Value::from("x1").int(), 0);
    }

    #[test]
    fn append_takes_ownership_of_tail() {
        let mut v = Value::from("ab");
        v.append(Value::from("cd"));
        assert_eq!(v, "abcd");
        let mut empty = Value::new();
        empty.append(Value::from("x"));
        assert_eq!(empty, "x");
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(-12i64), "-12");
        assert_eq!(Value::from(true), "1");
        assert_eq!(Value::from(vec![b'h', b'i']).to_string(), "hi");
        assert_eq!(format!("{:?}", Value::from("a b")), "\"a b\"");
    }
}
