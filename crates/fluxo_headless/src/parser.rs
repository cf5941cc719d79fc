//! Fixed-grammar recursive-descent parser producing a [`FluxoProgram`].
//!
//! The grammar is scanned left to right. At each token the parser tries, in order, a print call,
//! a window binding, and a method call; text that starts none of them is skipped one token at a
//! time, so unrecognized input never produces an error.

use crate::lexer::{tokenize, Token, TokenKind};
use crate::{
    BindingKeyword, Expr, FluxoProgram, MethodCall, PrintCall, Statement, WindowBinding,
    PRINT_METHOD, PRINT_RECEIVER,
};

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
        }
    }

    fn parse_program(mut self) -> FluxoProgram {
        let mut statements = Vec::new();
        while self.pos < self.tokens.len() {
            let parsed = self
                .print_call(self.pos)
                .or_else(|| self.window_binding())
                .or_else(|| self.method_call());
            match parsed {
                Some((statement, next)) => {
                    statements.push(statement);
                    self.pos = next;
                }
                None => self.pos += 1,
            }
        }
        FluxoProgram { statements }
    }

    fn token(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    fn ident_at(&self, idx: usize) -> Option<&str> {
        self.token(idx).and_then(Token::ident)
    }

    fn punct_at(&self, idx: usize, ch: char) -> bool {
        self.token(idx).is_some_and(|token| token.is_punct(ch))
    }

    /// Finds the `)` closing the `(` at `open`, honoring nesting. String literals are single
    /// tokens, so parentheses inside them never count.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is_punct('(') {
                depth += 1;
            } else if token.is_punct(')') {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Raw source text strictly between the parentheses at `open` and `close`.
    fn inner_text(&self, open: usize, close: usize) -> &'src str {
        &self.source[self.tokens[open].end..self.tokens[close].start]
    }

    /// `RECEIVER . NAME : (` prefix shared by print and method calls. Returns the index of `(`.
    fn call_prefix(&self, at: usize) -> Option<(&str, &str, usize)> {
        let receiver = self.ident_at(at)?;
        if !self.punct_at(at + 1, '.') {
            return None;
        }
        let name = self.ident_at(at + 2)?;
        if !self.punct_at(at + 3, ':') || !self.punct_at(at + 4, '(') {
            return None;
        }
        Some((receiver, name, at + 4))
    }

    fn print_call(&self, at: usize) -> Option<(Statement, usize)> {
        let (receiver, name, open) = self.call_prefix(at)?;
        if receiver != PRINT_RECEIVER || name != PRINT_METHOD {
            return None;
        }
        let close = self.matching_close(open)?;
        let expr = Expr::classify(self.inner_text(open, close));
        Some((Statement::Print(PrintCall { expr }), close + 1))
    }

    fn window_binding(&self) -> Option<(Statement, usize)> {
        let at = self.pos;
        let keyword = match self.ident_at(at)? {
            "local" => BindingKeyword::Local,
            "var" => BindingKeyword::Var,
            _ => return None,
        };
        let name = self.ident_at(at + 1)?;
        if !self.punct_at(at + 2, '=')
            || !self.token(at + 3).is_some_and(|token| token.is_ident("window"))
            || !self.punct_at(at + 4, '(')
            || !self.punct_at(at + 6, ')')
        {
            return None;
        }
        let TokenKind::Str { value, .. } = &self.token(at + 5)?.kind else {
            return None;
        };
        if value.is_empty() {
            return None;
        }
        Some((
            Statement::Binding(WindowBinding {
                keyword,
                name: name.to_string(),
                window_id: value.clone(),
            }),
            at + 7,
        ))
    }

    fn method_call(&self) -> Option<(Statement, usize)> {
        let (receiver, method, open) = self.call_prefix(self.pos)?;
        let close = self.matching_close(open)?;
        // A print nested in the arguments must still be scanned as a print.
        if (open + 1..close).any(|idx| self.print_call(idx).is_some()) {
            return None;
        }
        let args = self
            .inner_text(open, close)
            .split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(str::to_string)
            .collect();
        Some((
            Statement::MethodCall(MethodCall {
                receiver: receiver.to_string(),
                method: method.to_string(),
                args,
            }),
            close + 1,
        ))
    }
}

/// Parses one line (or several newline-separated lines) of Fluxo source.
pub fn parse_program(source: &str) -> FluxoProgram {
    Parser::new(source).parse_program()
}
