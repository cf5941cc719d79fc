//! Headless parsing core for the Fluxo command language.
//!
//! Fluxo is the fixed-grammar language typed into the desktop terminal to script windows and
//! print values. This crate only turns source text into a typed [`FluxoProgram`]; evaluating it
//! against live window state is the desktop runtime's job.
//!
//! The grammar has three productions, recognized anywhere on a line:
//!
//! - `console.log:(EXPR)` prints a string literal, a number, or a bare identifier.
//! - `local NAME = window("ID")` (or `var`) binds a name to a window id.
//! - `NAME.METHOD:(ARGS)` calls a window method with comma-separated raw arguments.
//!
//! Anything else is skipped. Parsing never fails.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod lexer;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use parser::parse_program;

/// Receiver/method pair reserved for printing.
pub const PRINT_RECEIVER: &str = "console";
/// Method name reserved for printing on [`PRINT_RECEIVER`].
pub const PRINT_METHOD: &str = "log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
/// Printable expression inside `console.log:(...)`.
pub enum Expr {
    /// Quoted literal with the quotes removed.
    Str(String),
    /// Finite numeric literal.
    Number(f64),
    /// Any other text, echoed verbatim.
    Ident(String),
}

impl Expr {
    /// Classifies the raw text between a print call's parentheses.
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim();
        for quote in ['"', '\''] {
            if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
                return Self::Str(text[1..text.len() - 1].to_string());
            }
        }
        match parse_js_number(text) {
            Some(value) => Self::Number(value),
            None => Self::Ident(text.to_string()),
        }
    }

    /// Renders the expression as one output line.
    pub fn render(&self) -> String {
        match self {
            Self::Str(value) | Self::Ident(value) => value.clone(),
            Self::Number(value) => format_number(*value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Keyword introducing a window binding. Both behave identically.
pub enum BindingKeyword {
    /// `local NAME = ...`
    Local,
    /// `var NAME = ...`
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `console.log:(EXPR)`.
pub struct PrintCall {
    /// Expression to print.
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// `local NAME = window("ID")`.
pub struct WindowBinding {
    /// Keyword used.
    pub keyword: BindingKeyword,
    /// Variable name.
    pub name: String,
    /// Window id looked up at evaluation time.
    pub window_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// `NAME.METHOD:(ARGS)`.
pub struct MethodCall {
    /// Variable the method is called on.
    pub receiver: String,
    /// Method name.
    pub method: String,
    /// Trimmed, non-empty argument texts in order.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One recognized construct, in source order.
pub enum Statement {
    /// Print call.
    Print(PrintCall),
    /// Variable binding.
    Binding(WindowBinding),
    /// Window method call.
    MethodCall(MethodCall),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Parsed line of Fluxo source.
pub struct FluxoProgram {
    /// Recognized statements in left-to-right order.
    pub statements: Vec<Statement>,
}

impl FluxoProgram {
    /// Returns `true` when nothing on the line was recognized.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns `true` when the line contains at least one print call.
    pub fn has_print(&self) -> bool {
        self.prints().next().is_some()
    }

    /// Iterates print calls in order.
    pub fn prints(&self) -> impl Iterator<Item = &PrintCall> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Print(print) => Some(print),
            _ => None,
        })
    }

    /// Iterates window bindings in order.
    pub fn bindings(&self) -> impl Iterator<Item = &WindowBinding> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Binding(binding) => Some(binding),
            _ => None,
        })
    }

    /// Iterates method calls in order.
    pub fn method_calls(&self) -> impl Iterator<Item = &MethodCall> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::MethodCall(call) => Some(call),
            _ => None,
        })
    }
}

/// Parses text with JavaScript `Number()` rules, accepting only finite results.
///
/// Blank text is `0`, and unsigned `0x`/`0o`/`0b` literals are integers in that radix.
pub fn parse_js_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let digits = text
            .strip_prefix(prefix)
            .or_else(|| text.strip_prefix(&prefix.to_ascii_uppercase()));
        if let Some(digits) = digits {
            if digits.starts_with(['+', '-']) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|value| value as f64);
        }
    }
    let lowered = text.to_ascii_lowercase();
    if lowered.contains("inf") || lowered.contains("nan") {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a number the way the terminal prints it: integral values without a fraction, and
/// negative zero as `0`.
///
/// Magnitudes from `1e21` up or below `1e-6` switch to exponent form with an explicit exponent
/// sign, as in `1e+21` and `1.5e-7`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exponential = format!("{value:e}");
        return match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        };
    }
    format!("{value}")
}
