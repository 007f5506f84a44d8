//! A concrete, regex-pattern-based lexer feeding the [TokenStream] interface
//! that the parser combinators in [crate::production] consume. This is
//! ambient plumbing around the core (spec §1 scopes the character-level
//! lexer out of the hard part) rather than a combinator-driven design itself,
//! but it follows the same pattern the reference library's `lexeme::Pattern`
//! utilities use: one compiled regex per token shape, tried in order.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::error::ParseError;
use crate::token::{Token, TokenKind, TokenStream};
use crate::util::Code;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t\r\n]+").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[^\n]*").unwrap());
static STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(?:[^"\\]|\\.)*""#).unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(==|[-+*/%=<>(){}\[\],;])").unwrap());

/// Pre-scans the entire source into a token vector (mirroring the reference
/// library's eager `ITokenization::tokenize`), then serves [TokenStream]
/// requests against that vector. Scripts handled by this interpreter are
/// small, so there is no benefit to lazy/incremental tokenization.
pub struct Lexer {
    tokens: Vec<Token>,
    position: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let code: Code = source.into();
        let mut tokens = Vec::new();
        let mut pointer = 0usize;
        let len = code.value.len();

        while pointer < len {
            let rest = &code.value[pointer..];

            if let Some(m) = WHITESPACE.find(rest) {
                pointer += m.end();
                continue;
            }
            if let Some(m) = COMMENT.find(rest) {
                pointer += m.end();
                continue;
            }

            let line = code.obtain_position(pointer).line;

            if let Some(m) = STRING.find(rest) {
                let raw = &rest[1..m.end() - 1];
                let text = unescape(raw);
                tokens.push(Token::string(line, text));
                pointer += m.end();
                continue;
            }
            if let Some(m) = NUMBER.find(rest) {
                let text = std::str::from_utf8(&rest[..m.end()]).unwrap();
                let value: i64 = text
                    .parse()
                    .map_err(|_| ParseError::new(line, format!("number literal overflow: {text}")))?;
                tokens.push(Token::number(line, text, value));
                pointer += m.end();
                continue;
            }
            if let Some(m) = IDENTIFIER.find(rest) {
                let text = std::str::from_utf8(&rest[..m.end()]).unwrap();
                tokens.push(Token::identifier(line, text));
                pointer += m.end();
                continue;
            }
            if let Some(m) = OPERATOR.find(rest) {
                let text = std::str::from_utf8(&rest[..m.end()]).unwrap();
                tokens.push(Token::identifier(line, text));
                pointer += m.end();
                continue;
            }

            let bad = rest[..1.min(rest.len())].to_vec();
            return Err(ParseError::new(
                line,
                format!(
                    "unrecognized character '{}'",
                    String::from_utf8_lossy(&bad)
                ),
            ));
        }

        let eof_line = code.obtain_position(len).line;
        tokens.push(Token::eof(eof_line));

        Ok(Self {
            tokens,
            position: 0,
        })
    }
}

fn unescape(raw: &[u8]) -> String {
    let s = std::str::from_utf8(raw).unwrap_or_default();
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl TokenStream for Lexer {
    fn peek(&self, k: usize) -> &Token {
        let index = (self.position + k).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn read(&mut self) -> Token {
        let index = self.position.min(self.tokens.len() - 1);
        let token = self.tokens[index].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_operators_as_identifier_kind() {
        let mut lexer = Lexer::new("x = 1 + 2").unwrap();
        assert_eq!(lexer.read().text, "x");
        let eq = lexer.read();
        assert_eq!(eq.kind, TokenKind::Identifier);
        assert_eq!(eq.text, "=");
        assert_eq!(lexer.read().numeric_value, 1);
        assert_eq!(lexer.read().text, "+");
        assert_eq!(lexer.read().numeric_value, 2);
        assert_eq!(lexer.read().kind, TokenKind::Eof);
    }

    #[test]
    fn recognizes_double_char_operator() {
        let mut lexer = Lexer::new("a == b").unwrap();
        lexer.read();
        let op = lexer.read();
        assert_eq!(op.text, "==");
    }

    #[test]
    fn unescapes_string_literals() {
        let mut lexer = Lexer::new(r#""a\nb""#).unwrap();
        let tok = lexer.read();
        assert_eq!(tok.text, "a\nb");
    }

    #[test]
    fn peek_past_eof_is_idempotent() {
        let lexer = Lexer::new("1").unwrap();
        assert_eq!(lexer.peek(0).numeric_value, 1);
        assert_eq!(lexer.peek(5).kind, TokenKind::Eof);
        assert_eq!(lexer.peek(5).kind, TokenKind::Eof);
    }

    #[test]
    fn skips_comments() {
        let mut lexer = Lexer::new("# comment\nx").unwrap();
        assert_eq!(lexer.read().text, "x");
    }

    #[test]
    fn tracks_line_numbers() {
        let mut lexer = Lexer::new("a\nb\nc").unwrap();
        assert_eq!(lexer.read().line, 1);
        assert_eq!(lexer.read().line, 2);
        assert_eq!(lexer.read().line, 3);
    }
}
