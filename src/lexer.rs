use crate::{ParseError, Pos, Tok};

/// Tokenizer over a single physical source line.
///
/// Works like a one-token lookahead stream: `peek` classifies the next token
/// and stashes it, `str` exposes its verbatim source text, and `eat`
/// consumes it. Whitespace between tokens is skipped and never reported.
#[derive(Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    line: usize,
    offset: usize,
    start: usize,
    end: usize,
    stash: Option<Tok>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            text,
            line,
            offset: 0,
            start: 0,
            end: 0,
            stash: None,
        }
    }

    pub fn err(&self, msg: &str) -> ParseError {
        let pos = self.pos();
        ParseError {
            line: pos.line,
            column: pos.column,
            excerpt: self.text.to_string(),
            message: msg.to_string(),
        }
    }

    /// Position of the most recently peeked token, counted in characters.
    pub fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.text[..self.start].chars().count() + 1,
        }
    }

    /// Verbatim text of the stashed token.
    pub fn str(&self) -> &'a str {
        &self.text[self.start..self.end]
    }

    pub fn eat(&mut self) {
        self.stash.take();
    }

    fn byte(&self, index: usize) -> Option<u8> {
        self.text.as_bytes().get(index).copied()
    }

    fn skip_while(&mut self, f: impl Fn(u8) -> bool) {
        while let Some(c) = self.byte(self.offset) {
            if !f(c) {
                break;
            }
            self.offset += 1;
        }
    }

    fn skip_ws(&mut self) {
        self.skip_while(|c| b" \t\r".contains(&c));
    }

    fn ident(&mut self) {
        self.skip_while(|c| c.is_ascii_alphanumeric() || c == b'_');
    }

    fn ok(&mut self, tok: Tok) -> Result<Tok, ParseError> {
        self.end = self.offset;
        self.stash = Some(tok);
        Ok(tok)
    }

    fn fail(&mut self, msg: &str) -> Result<Tok, ParseError> {
        self.end = self.offset;
        Err(self.err(msg))
    }

    pub fn peek(&mut self) -> Result<Tok, ParseError> {
        if let Some(tok) = self.stash {
            return Ok(tok);
        }
        self.skip_ws();
        self.start = self.offset;
        let Some(c) = self.byte(self.offset) else {
            return self.ok(Tok::EOL);
        };
        match c {
            b';' => {
                self.offset += 1;
                self.ok(Tok::SEMI)
            }
            // directive
            b'.' => {
                self.offset += 1;
                if !self
                    .byte(self.offset)
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_')
                {
                    return self.fail("expected directive name");
                }
                self.ident();
                self.ok(Tok::DIRECTIVE)
            }
            // numbers: the whole alphanumeric run must be valid digits
            b'$' | b'%' | b'0'..=b'9' => {
                let (tok, msg) = match c {
                    b'$' => {
                        self.offset += 1;
                        (Tok::HEX, "malformed hex literal")
                    }
                    b'%' => {
                        self.offset += 1;
                        (Tok::BIN, "malformed binary literal")
                    }
                    _ => (Tok::NUM, "malformed number"),
                };
                let from = self.offset;
                self.ident();
                let run = &self.text.as_bytes()[from..self.offset];
                let valid = match tok {
                    Tok::HEX => run.iter().all(u8::is_ascii_hexdigit),
                    Tok::BIN => run.iter().all(|c| b"01".contains(c)),
                    _ => run.iter().all(u8::is_ascii_digit),
                };
                if run.is_empty() || !valid {
                    return self.fail(msg);
                }
                self.ok(tok)
            }
            b'\'' => {
                self.offset += 1;
                let Some(ch) = self.text[self.offset..].chars().next() else {
                    return self.fail("malformed character literal");
                };
                self.offset += ch.len_utf8();
                if self.byte(self.offset) != Some(b'\'') {
                    return self.fail("malformed character literal");
                }
                self.offset += 1;
                self.ok(Tok::CHAR)
            }
            b'@' => {
                self.offset += 1;
                if !self
                    .byte(self.offset)
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_')
                {
                    return self.fail("malformed local label");
                }
                self.ident();
                self.ok(Tok::ID)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                self.ident();
                self.ok(Tok::ID)
            }
            b':' => {
                if self.byte(self.offset + 1) == Some(b'=') {
                    self.offset += 2;
                    return self.ok(Tok::ASSIGN);
                }
                self.skip_while(|c| c == b':');
                let colons = self.offset - self.start;
                let from = self.offset;
                self.skip_while(|c| b"+-".contains(&c));
                if self.offset > from {
                    return self.ok(Tok::REL);
                }
                if colons > 1 {
                    return self.fail("unexpected `::`");
                }
                self.ok(Tok::COLON)
            }
            b'#' | b'<' | b'>' | b'(' | b')' | b',' | b'=' | b'+' | b'-' | b'*' | b'/'
            | b'|' | b'^' | b'&' => {
                self.offset += 1;
                self.ok(Tok(c))
            }
            _ => {
                self.offset += self.text[self.offset..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.fail("unexpected character")
            }
        }
    }

    /// Consumes the raw remainder of the line up to a trailing comment.
    ///
    /// A stashed token is put back first, so the remainder starts at the
    /// stashed token. `;` inside string or character literals does not end
    /// the remainder. The result is trimmed.
    pub fn rest(&mut self) -> &'a str {
        if self.stash.take().is_some() {
            self.offset = self.start;
        }
        let bytes = self.text.as_bytes();
        let from = self.offset;
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b';' => break,
                b'"' => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != b'"' {
                        if bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                b'\'' if bytes.get(i + 2) == Some(&b'\'') => i += 2,
                _ => {}
            }
            i += 1;
        }
        let i = i.min(bytes.len());
        self.offset = i;
        self.start = i;
        self.end = i;
        self.text[from..i].trim()
    }

    /// Consumes a comment. Must be called with [`Tok::SEMI`] stashed; returns
    /// the text after the `;`, trimmed.
    pub fn comment(&mut self) -> &'a str {
        self.stash.take();
        let text = &self.text[self.end..];
        self.offset = self.text.len();
        self.start = self.offset;
        self.end = self.offset;
        text.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<(Tok, &str)> {
        let mut lexer = Lexer::new(text, 1);
        let mut out = Vec::new();
        loop {
            let tok = lexer.peek().unwrap();
            if tok == Tok::EOL {
                break;
            }
            out.push((tok, lexer.str()));
            lexer.eat();
        }
        out
    }

    #[test]
    fn classifies_tokens() {
        assert_eq!(
            toks("loop: lda #<($10+@tbl), x"),
            vec![
                (Tok::ID, "loop"),
                (Tok::COLON, ":"),
                (Tok::ID, "lda"),
                (Tok::HASH, "#"),
                (Tok::LT, "<"),
                (Tok::LPAREN, "("),
                (Tok::HEX, "$10"),
                (Tok::PLUS, "+"),
                (Tok::ID, "@tbl"),
                (Tok::RPAREN, ")"),
                (Tok::COMMA, ","),
                (Tok::ID, "x"),
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            toks("%0101 123 'a' ' ' * :++ :- ::+"),
            vec![
                (Tok::BIN, "%0101"),
                (Tok::NUM, "123"),
                (Tok::CHAR, "'a'"),
                (Tok::CHAR, "' '"),
                (Tok::STAR, "*"),
                (Tok::REL, ":++"),
                (Tok::REL, ":-"),
                (Tok::REL, "::+"),
            ]
        );
    }

    #[test]
    fn directives_and_assignment() {
        assert_eq!(
            toks(".SEGMENT FOO := 1 = 2"),
            vec![
                (Tok::DIRECTIVE, ".SEGMENT"),
                (Tok::ID, "FOO"),
                (Tok::ASSIGN, ":="),
                (Tok::NUM, "1"),
                (Tok::EQU, "="),
                (Tok::NUM, "2"),
            ]
        );
    }

    #[test]
    fn malformed_literals() {
        for (text, column, msg) in [
            ("lda $$10", 5, "malformed hex literal"),
            ("lda $", 5, "malformed hex literal"),
            ("lda $1G", 5, "malformed hex literal"),
            ("lda %012", 5, "malformed binary literal"),
            ("lda 12ab", 5, "malformed number"),
            ("lda 'ab'", 5, "malformed character literal"),
            ("lda @1", 5, "malformed local label"),
            ("lda \"x\"", 5, "unexpected character"),
            (". foo", 1, "expected directive name"),
            (".byte 'é', $$1", 12, "malformed hex literal"),
        ] {
            let mut lexer = Lexer::new(text, 4);
            let err = loop {
                match lexer.peek() {
                    Ok(Tok::EOL) => panic!("no error for {text}"),
                    Ok(_) => lexer.eat(),
                    Err(e) => break e,
                }
            };
            assert_eq!(err.message, msg, "{text}");
            assert_eq!(err.line, 4);
            assert_eq!(err.column, column, "{text}");
            assert_eq!(err.excerpt, text);
        }
    }

    #[test]
    fn rest_stops_at_unquoted_comment() {
        let mut lexer = Lexer::new(".byte \"a;b\", ';', 3 ; done", 1);
        assert_eq!(lexer.peek().unwrap(), Tok::DIRECTIVE);
        lexer.eat();
        assert_eq!(lexer.rest(), "\"a;b\", ';', 3");
        assert_eq!(lexer.peek().unwrap(), Tok::SEMI);
        assert_eq!(lexer.comment(), "done");
        assert_eq!(lexer.peek().unwrap(), Tok::EOL);
    }

    #[test]
    fn rest_rewinds_stashed_token() {
        let mut lexer = Lexer::new("FOO =   $10 | BAR  ", 1);
        lexer.peek().unwrap();
        lexer.eat();
        lexer.peek().unwrap();
        lexer.eat();
        assert_eq!(lexer.peek().unwrap(), Tok::HEX);
        assert_eq!(lexer.rest(), "$10 | BAR");
        assert_eq!(lexer.peek().unwrap(), Tok::EOL);
    }
}
