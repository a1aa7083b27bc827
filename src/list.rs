//! List encoding
//!
//! A list is a value whose elements are separated by single spaces. An
//! element containing whitespace or characters the tokenizer treats as
//! special is wrapped in one layer of braces; the empty element is `{}`.
//! Decoding runs the list through the tokenizer as a single pseudo-command
//! and strips that one layer again. Nested braces are never re-escaped, so
//! only elements with balanced braces survive a round trip.

use crate::lexer::{is_space, is_special, Token, Tokenizer};
use crate::value::Value;

/// A new, empty list.
pub fn new() -> Value {
    Value::new()
}

/// Number of elements in `list`.
pub fn length(list: &[u8]) -> usize {
    Tokenizer::new(list)
        .take_while(|tok| *tok != Token::Error)
        .filter(|tok| matches!(tok, Token::Word(_)))
        .count()
}

/// A copy of the element at `index`, or `None` past the end.
pub fn at(list: &[u8], index: usize) -> Option<Value> {
    elements(list).nth(index)
}

/// All elements of `list`, in order.
pub fn parse(list: &[u8]) -> Vec<Value> {
    elements(list).collect()
}

/// Appends `tail` as one more element of `list`.
pub fn append(list: &mut Value, tail: &[u8]) {
    if !list.is_empty() {
        list.push_bytes(b" ");
    }
    if tail.is_empty() {
        list.push_bytes(b"{}");
    } else if needs_braces(tail) {
        list.push_bytes(b"{");
        list.push_bytes(tail);
        list.push_bytes(b"}");
    } else {
        list.push_bytes(tail);
    }
}

/// Encodes `items` as a list.
pub fn from_elements<I, T>(items: I) -> Value
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut list = new();
    for item in items {
        append(&mut list, item.as_ref());
    }
    list
}

fn needs_braces(element: &[u8]) -> bool {
    element.iter().any(|&c| is_space(c) || is_special(c, false))
}

/// Decoded elements. Parts are glued to the word that closes them without any
/// substitution; a lone braced word loses its outer braces.
fn elements(list: &[u8]) -> impl Iterator<Item = Value> + '_ {
    let mut pending: Option<Value> = None;
    Tokenizer::new(list)
        .take_while(|tok| *tok != Token::Error)
        .filter_map(move |tok| match tok {
            Token::Part(text) => {
                pending.get_or_insert_with(Value::new).push_bytes(text);
                None
            }
            Token::Word(text) => Some(match pending.take() {
                Some(mut element) => {
                    element.push_bytes(text);
                    element
                }
                None => strip_braces(text),
            }),
            Token::Command | Token::Error => None,
        })
}

fn strip_braces(word: &[u8]) -> Value {
    match word {
        [b'{', inner @ .., b'}'] => Value::from_bytes(inner),
        _ => Value::from_bytes(word),
    }
}
