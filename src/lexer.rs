//! Tokenization for tinytcl
//!
//! The tokenizer never allocates: every token is a byte range of the script
//! being scanned. Substitution happens later, in the evaluator.
//!
//! A scan step is a pure function of the remaining input and the quoting
//! flag ([`scan`]); [`Tokenizer`] threads that flag from one step to the next.

/// Kind of a single scan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A command separator (`;`, `\n`, `\r`) or the end of the buffer.
    Command,
    /// A complete, substitution-ready word.
    Word,
    /// A fragment that must be glued to whatever follows it.
    Part,
    /// Malformed input.
    Error,
}

/// Result of one scan step over a buffer.
///
/// `from..to` is the token text; `to` is also the number of bytes consumed,
/// so the next step starts at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    pub kind: TokenKind,
    pub from: usize,
    pub to: usize,
    /// Quoting state after this token.
    pub quoted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Command,
    Word(&'a [u8]),
    Part(&'a [u8]),
    Error,
}

/// Word-separating whitespace inside a command.
pub(crate) fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Command terminators.
pub(crate) fn is_end(c: u8) -> bool {
    c == b'\n' || c == b'\r' || c == b';'
}

/// Characters that stop a plain run of text. Braces and terminators only
/// count outside of a quoted span.
pub(crate) fn is_special(c: u8, quoted: bool) -> bool {
    matches!(c, b'$' | b'[' | b']' | b'"')
        || (!quoted && matches!(c, b'{' | b'}' | b';' | b'\r' | b'\n'))
}

/// Scans the next token from `s`.
pub fn scan(s: &[u8], quoted: bool) -> Scan {
    let mut start = 0;
    if !quoted {
        while start < s.len() && is_space(s[start]) {
            start += 1;
        }
    }
    let rest = &s[start..];
    let error = Scan { kind: TokenKind::Error, from: start, to: s.len(), quoted };

    let Some(&first) = rest.first() else {
        // A quote still open at the end of the buffer is unterminated.
        return if quoted {
            error
        } else {
            Scan { kind: TokenKind::Command, from: start, to: start, quoted }
        };
    };

    if !quoted && is_end(first) {
        return Scan { kind: TokenKind::Command, from: start, to: start + 1, quoted };
    }

    match first {
        b'$' => {
            if matches!(rest.get(1), None | Some(b' ' | b'\t' | b'"')) {
                return error;
            }
            // The reference itself is scanned unquoted; a complete word inside
            // an open quote still has more of the quoted text after it.
            let sub = scan(&rest[1..], false);
            let kind = match sub.kind {
                TokenKind::Word if quoted => TokenKind::Part,
                TokenKind::Word | TokenKind::Part => sub.kind,
                TokenKind::Command | TokenKind::Error => return error,
            };
            Scan { kind, from: start, to: start + 1 + sub.to, quoted }
        }
        b'[' | b'{' if first == b'[' || !quoted => match balanced_len(rest) {
            Some(len) => finish(s, start, start + len, quoted),
            None => error,
        },
        b'"' => {
            if !quoted {
                return Scan { kind: TokenKind::Part, from: start + 1, to: start + 1, quoted: true };
            }
            match rest.get(1) {
                None => {}
                Some(&c) if is_space(c) || is_end(c) => {}
                Some(_) => return error,
            }
            Scan { kind: TokenKind::Word, from: start + 1, to: start + 1, quoted: false }
        }
        b']' => error,
        b'}' if !quoted => error,
        _ => {
            let len = rest
                .iter()
                .position(|&c| (!quoted && is_space(c)) || is_special(c, quoted))
                .unwrap_or(rest.len());
            finish(s, start, start + len, quoted)
        }
    }
}

/// Length of the bracketed span opening at `s[0]`, counting only the matching
/// close character. `None` when the buffer ends first.
fn balanced_len(s: &[u8]) -> Option<usize> {
    let open = s[0];
    let close = if open == b'[' { b']' } else { b'}' };
    let mut depth = 0usize;
    for (i, &c) in s.iter().enumerate() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
    }
    None
}

fn finish(s: &[u8], from: usize, to: usize, quoted: bool) -> Scan {
    let kind = if quoted {
        TokenKind::Part
    } else {
        match s.get(to) {
            None => TokenKind::Word,
            Some(&c) if is_space(c) || is_end(c) => TokenKind::Word,
            Some(_) => TokenKind::Part,
        }
    };
    Scan { kind, from, to, quoted }
}

/// Iterates over the tokens of a buffer.
///
/// The end of the buffer yields one final [`Token::Command`]; an
/// [`Token::Error`] is always the last token produced.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    quoted: bool,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer { input, quoted: false, done: false }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let step = scan(self.input, self.quoted);
        let text = &self.input[step.from..step.to];
        self.quoted = step.quoted;
        let token = match step.kind {
            TokenKind::Command => {
                if step.from == step.to {
                    self.done = true;
                }
                Token::Command
            }
            TokenKind::Word => Token::Word(text),
            TokenKind::Part => Token::Part(text),
            TokenKind::Error => {
                self.done = true;
                Token::Error
            }
        };
        self.input = &self.input[step.to..];
        Some(token)
    }
}

/// Whether `src` fails to tokenize only because a quote, brace or bracket is
/// still open when the buffer ends. Interactive hosts use this to keep
/// reading lines.
pub fn needs_more_input(src: &[u8]) -> bool {
    let mut input = src;
    let mut quoted = false;
    loop {
        let step = scan(input, quoted);
        match step.kind {
            TokenKind::Error => return unterminated(&input[step.from..], quoted),
            TokenKind::Command if step.from == step.to => return false,
            _ => {}
        }
        quoted = step.quoted;
        input = &input[step.to..];
    }
}

fn unterminated(rest: &[u8], quoted: bool) -> bool {
    match rest.first() {
        None => quoted,
        Some(b'[') => balanced_len(rest).is_none(),
        Some(b'{') if !quoted => balanced_len(rest).is_none(),
        Some(b'$') if rest.len() > 1 => unterminated(&rest[1..], false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        Tokenizer::new(src.as_bytes()).collect()
    }

    #[test]
    fn splits_words_and_commands() {
        assert_eq!(
            tokens("set x 5; puts $x"),
            vec![
                Token::Word(b"set"),
                Token::Word(b"x"),
                Token::Word(b"5"),
                Token::Command,
                Token::Word(b"puts"),
                Token::Word(b"$x"),
                Token::Command,
            ]
        );
    }

    #[test]
    fn braces_and_brackets_are_single_words() {
        assert_eq!(
            tokens("if {< $a {b c}} [f [g]]"),
            vec![
                Token::Word(b"if"),
                Token::Word(b"{< $a {b c}}"),
                Token::Word(b"[f [g]]"),
                Token::Command,
            ]
        );
    }

    #[test]
    fn quoted_word_is_built_from_parts() {
        assert_eq!(
            tokens("\"a $x b\""),
            vec![
                Token::Part(b""),
                Token::Part(b"a "),
                Token::Part(b"$x"),
                Token::Part(b" b"),
                Token::Word(b""),
                Token::Command,
            ]
        );
    }

    #[test]
    fn adjacent_fragments_are_parts() {
        assert_eq!(
            tokens("a$x[b]"),
            vec![Token::Part(b"a"), Token::Part(b"$x"), Token::Word(b"[b]"), Token::Command]
        );
    }

    #[test]
    fn dollar_followed_by_space_or_quote_is_an_error() {
        assert_eq!(tokens("set $ x").last(), Some(&Token::Error));
        assert_eq!(tokens("\"$\"").last(), Some(&Token::Error));
        assert_eq!(tokens("x $").last(), Some(&Token::Error));
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert_eq!(tokens("set x {abc").last(), Some(&Token::Error));
        assert_eq!(tokens("set x [abc").last(), Some(&Token::Error));
        assert_eq!(tokens("set x abc}").last(), Some(&Token::Error));
        assert_eq!(tokens("]").last(), Some(&Token::Error));
        assert_eq!(tokens("\"abc").last(), Some(&Token::Error));
    }

    #[test]
    fn closing_quote_must_end_the_word() {
        assert_eq!(tokens("\"a\"b").last(), Some(&Token::Error));
        assert_eq!(tokens("\"a\";").last(), Some(&Token::Command));
    }

    #[test]
    fn braces_are_literal_inside_quotes() {
        assert_eq!(
            tokens("\"{a}\""),
            vec![Token::Part(b""), Token::Part(b"{a}"), Token::Word(b""), Token::Command]
        );
    }

    #[test]
    fn scan_reports_consumed_length() {
        let step = scan(b"  abc def", false);
        assert_eq!(step, Scan { kind: TokenKind::Word, from: 2, to: 5, quoted: false });
    }

    #[test]
    fn detects_incomplete_input() {
        assert!(needs_more_input(b"proc f {} {"));
        assert!(needs_more_input(b"set x [cmd"));
        assert!(needs_more_input(b"puts \"abc"));
        assert!(needs_more_input(b"puts ${abc"));
        assert!(!needs_more_input(b"puts {abc}"));
        assert!(!needs_more_input(b"puts abc}"));
        assert!(!needs_more_input(b""));
    }
}
