// src/parser.rs

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidSyntax(String),
}

impl ParseError {
    pub fn into_message(self) -> String {
        match self {
            ParseError::InvalidSyntax(msg) => msg,
        }
    }
}

/// Character scanner over a single path token.
pub struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Parses a run of ASCII digits as an index. Signs are rejected.
    pub fn parse_index(&mut self) -> Result<usize, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax(
                "index must be a non-negative integer".into(),
            ));
        }
        self.s[start..self.i]
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidSyntax("index too large".into()))
    }

    pub fn capture_until(&mut self, end: char) -> Result<&'a str, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == end {
                break;
            }
            self.i += c.len_utf8();
        }
        if self.peek_char() != Some(end) {
            return Err(ParseError::InvalidSyntax(format!("missing closing '{end}'")));
        }
        Ok(&self.s[start..self.i])
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
