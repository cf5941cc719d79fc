//! Line tokenizer for Fluxo source.
//!
//! Tokenization never fails: an unterminated quote is emitted as a lone punctuation token and
//! scanning resumes after it, so the parser can still recognize constructs later on the line.

use serde::{Deserialize, Serialize};

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Identifier made of ASCII letters, digits, and `_`, not starting with a digit.
    Ident(String),
    /// Unsigned decimal literal, kept as written.
    Number(String),
    /// Quoted string literal with the quotes stripped.
    Str {
        /// Literal contents.
        value: String,
        /// Quote character used (`'` or `"`).
        quote: char,
    },
    /// Any other non-whitespace character.
    Punct(char),
}

/// One token with its byte span in the source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token category and payload.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Returns `true` when this token is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }

    /// Returns `true` when this token is the punctuation character `ch`.
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    /// Returns the identifier text, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Splits `source` into tokens, skipping whitespace.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        if is_ident_start(ch) {
            let mut end = start + ch.len_utf8();
            while let Some(&(idx, next)) = chars.peek() {
                if !is_ident_continue(next) {
                    break;
                }
                end = idx + next.len_utf8();
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Ident(source[start..end].to_string()),
                start,
                end,
            });
            continue;
        }

        if ch.is_ascii_digit() {
            let mut end = start + 1;
            let mut seen_dot = false;
            while let Some(&(idx, next)) = chars.peek() {
                let fractional_dot = next == '.'
                    && !seen_dot
                    && source[idx + 1..]
                        .chars()
                        .next()
                        .is_some_and(|after| after.is_ascii_digit());
                if !(next.is_ascii_digit() || fractional_dot) {
                    break;
                }
                seen_dot |= next == '.';
                end = idx + 1;
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Number(source[start..end].to_string()),
                start,
                end,
            });
            continue;
        }

        if ch == '"' || ch == '\'' {
            let body_start = start + 1;
            if let Some(offset) = source[body_start..].find(ch) {
                let body_end = body_start + offset;
                tokens.push(Token {
                    kind: TokenKind::Str {
                        value: source[body_start..body_end].to_string(),
                        quote: ch,
                    },
                    start,
                    end: body_end + 1,
                });
                while chars.peek().is_some_and(|&(idx, _)| idx <= body_end) {
                    chars.next();
                }
                continue;
            }
        }

        tokens.push(Token {
            kind: TokenKind::Punct(ch),
            start,
            end: start + ch.len_utf8(),
        });
    }

    tokens
}
