//! Shared shell command contracts used by the command parser, the desktop runtime, and the
//! terminal surface.
//!
//! This crate is runtime-agnostic. It defines serializable command metadata, execution requests,
//! and the shell error type without depending on window state or the virtual file system.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Acknowledgment printed when a line ran but produced no output of its own.
pub const COMMAND_EXECUTED_ACK: &str = "(command executed)";

/// Positional argument specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgSpec {
    /// Human-readable argument label.
    pub name: String,
    /// Short description.
    pub summary: String,
    /// Whether this argument is required.
    pub required: bool,
}

/// Example invocation rendered in help output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandExample {
    /// Example command line.
    pub command: String,
    /// Example explanation.
    pub summary: String,
}

/// Complete help metadata for a built-in command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpDoc {
    /// Summary sentence.
    pub summary: String,
    /// Usage string displayed in help output.
    pub usage: String,
    /// Example invocations.
    pub examples: Vec<CommandExample>,
}

/// Built-in command registration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Command word as typed.
    pub name: String,
    /// Positional argument metadata.
    pub args: Vec<CommandArgSpec>,
    /// Help metadata.
    pub help: HelpDoc,
}

/// Shell execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellRequest {
    /// Input line to parse and execute.
    pub line: String,
    /// Window the line was typed into, when known.
    pub source_window_id: Option<String>,
}

impl ShellRequest {
    /// Creates a request for `line` typed into `source_window_id`.
    pub fn new(line: impl Into<String>, source_window_id: Option<String>) -> Self {
        Self {
            line: line.into(),
            source_window_id,
        }
    }
}

/// Shell exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellExit {
    /// Numeric exit code.
    pub code: i32,
    /// Optional explanatory message.
    pub message: Option<String>,
}

impl ShellExit {
    /// Successful command completion.
    pub fn success() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    /// Exit status derived from a failed command.
    pub fn from_error(error: &ShellError) -> Self {
        Self {
            code: error.exit_code(),
            message: Some(error.message.clone()),
        }
    }
}

/// Structured shell error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellErrorCode {
    /// User input violated command usage.
    Usage,
    /// The referenced node or window was not found.
    NotFound,
    /// The target already exists.
    Conflict,
    /// Internal command or runtime failure.
    Internal,
}

/// Error returned when a line cannot be completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellError {
    /// Error category.
    pub code: ShellErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ShellError {
    /// Creates a new shell error.
    pub fn new(code: ShellErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Converts the error into a conventional exit code.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ShellErrorCode::Usage => 2,
            ShellErrorCode::NotFound => 3,
            ShellErrorCode::Conflict => 4,
            ShellErrorCode::Internal => 5,
        }
    }

    /// Line shown in the terminal transcript for this error.
    pub fn display_line(&self) -> String {
        format!("Error: {}", self.message)
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ShellError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn error_codes_map_to_exit_codes() {
        let conflict = ShellError::new(ShellErrorCode::Conflict, "docs: File exists");
        assert_eq!(conflict.exit_code(), 4);
        assert_eq!(conflict.display_line(), "Error: docs: File exists");
        assert_eq!(
            ShellExit::from_error(&conflict),
            ShellExit {
                code: 4,
                message: Some("docs: File exists".to_string()),
            }
        );
        assert_eq!(ShellExit::success().code, 0);
    }

    #[test]
    fn error_code_serializes_kebab_case() {
        let value = serde_json::to_value(ShellErrorCode::NotFound).expect("serialize");
        assert_eq!(value, serde_json::json!("not-found"));
    }
}
