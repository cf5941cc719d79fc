//! Command parser for the desktop terminal.
//!
//! A submitted line is classified exactly once: either it names one of the built-in commands, or
//! the whole trimmed line is handed on as Fluxo source. Built-ins are matched in a fixed priority
//! order (`help`, `clear`, `windows`, `apps`, `ls`, `cat`, `mkdir`, `touch`), and the matching is
//! deliberately literal: `cat` without a path, for example, is not a built-in and falls through to
//! Fluxo evaluation.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use system_shell_contract::{CommandArgSpec, CommandDescriptor, CommandExample, HelpDoc};

/// Path listed by `ls` when no argument is given.
pub const DEFAULT_LS_PATH: &str = "/";

/// Built-in command recognized by [`parse_command_line`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum BuiltinInvocation {
    /// `help`
    Help,
    /// `clear`
    Clear,
    /// `windows`
    Windows,
    /// `apps`
    Apps,
    /// `ls [path]`
    Ls {
        /// Path as typed, or [`DEFAULT_LS_PATH`].
        path: String,
    },
    /// `cat <path>`
    Cat {
        /// Path as typed.
        path: String,
    },
    /// `mkdir <name>`
    Mkdir {
        /// Folder name created under the root.
        name: String,
    },
    /// `touch <name>`
    Touch {
        /// File name created under the root.
        name: String,
    },
}

impl BuiltinInvocation {
    /// Command word of this invocation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Clear => "clear",
            Self::Windows => "windows",
            Self::Apps => "apps",
            Self::Ls { .. } => "ls",
            Self::Cat { .. } => "cat",
            Self::Mkdir { .. } => "mkdir",
            Self::Touch { .. } => "touch",
        }
    }
}

/// Classified input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum ParsedCommandLine {
    /// Blank input.
    Empty,
    /// A built-in command.
    Builtin(BuiltinInvocation),
    /// Anything else, passed to the Fluxo evaluator as trimmed source.
    Fluxo(String),
}

fn rest_after<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?.strip_prefix(' ')?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Classifies one line of terminal input.
pub fn parse_command_line(line: &str) -> ParsedCommandLine {
    let trimmed = line.trim();
    let builtin = match trimmed {
        "" => return ParsedCommandLine::Empty,
        "help" => Some(BuiltinInvocation::Help),
        "clear" => Some(BuiltinInvocation::Clear),
        "windows" => Some(BuiltinInvocation::Windows),
        "apps" => Some(BuiltinInvocation::Apps),
        "ls" => Some(BuiltinInvocation::Ls {
            path: DEFAULT_LS_PATH.to_string(),
        }),
        _ => None,
    };
    let builtin = builtin
        .or_else(|| {
            trimmed.strip_prefix("ls ").map(|rest| BuiltinInvocation::Ls {
                path: rest
                    .split_whitespace()
                    .next()
                    .unwrap_or(DEFAULT_LS_PATH)
                    .to_string(),
            })
        })
        .or_else(|| {
            rest_after(trimmed, "cat").map(|path| BuiltinInvocation::Cat {
                path: path.to_string(),
            })
        })
        .or_else(|| {
            rest_after(trimmed, "mkdir").map(|name| BuiltinInvocation::Mkdir {
                name: name.to_string(),
            })
        })
        .or_else(|| {
            rest_after(trimmed, "touch").map(|name| BuiltinInvocation::Touch {
                name: name.to_string(),
            })
        });

    match builtin {
        Some(invocation) => ParsedCommandLine::Builtin(invocation),
        None => ParsedCommandLine::Fluxo(trimmed.to_string()),
    }
}

/// Registry of built-in command descriptors, keyed by command word.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    order: Vec<String>,
    descriptors: BTreeMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    /// Registers or replaces a descriptor. Replacing keeps the original listing position.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        if !self.descriptors.contains_key(&descriptor.name) {
            self.order.push(descriptor.name.clone());
        }
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    /// Looks up a descriptor by command word.
    pub fn descriptor(&self, name: &str) -> Option<&CommandDescriptor> {
        self.descriptors.get(name)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<&CommandDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.descriptors.get(name))
            .collect()
    }

    /// Renders the `help` output.
    pub fn help_text(&self) -> String {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            self.descriptors()
                .into_iter()
                .map(|descriptor| format!("  {} - {}", descriptor.help.usage, descriptor.help.summary)),
        );
        lines.push(String::new());
        lines.push("Fluxo scripting:".to_string());
        lines.extend(
            FLUXO_HELP
                .iter()
                .map(|(usage, summary)| format!("  {usage} - {summary}")),
        );
        lines.join("\n")
    }
}

const FLUXO_HELP: &[(&str, &str)] = &[
    ("local <name> = window(\"<id>\")", "Bind a window to a variable"),
    ("console.log:(<message>)", "Print a message"),
    ("<name>.move:(<x>, <y>)", "Move window to position"),
    ("<name>.resize:(<width>, <height>)", "Resize window"),
    ("<name>.close:()", "Close window"),
    ("<name>.focus:()", "Focus window"),
];

fn descriptor(
    name: &str,
    usage: &str,
    summary: &str,
    args: &[(&str, &str, bool)],
) -> CommandDescriptor {
    CommandDescriptor {
        name: name.to_string(),
        args: args
            .iter()
            .map(|(arg, summary, required)| CommandArgSpec {
                name: (*arg).to_string(),
                summary: (*summary).to_string(),
                required: *required,
            })
            .collect(),
        help: HelpDoc {
            summary: summary.to_string(),
            usage: usage.to_string(),
            examples: vec![CommandExample {
                command: usage.replace(['<', '>', '[', ']'], ""),
                summary: summary.to_string(),
            }],
        },
    }
}

/// Returns the registry of all built-in commands in priority order.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::default();
    for descriptor in [
        descriptor("help", "help", "Show this help message", &[]),
        descriptor("clear", "clear", "Clear the terminal", &[]),
        descriptor("windows", "windows", "List all open windows", &[]),
        descriptor("apps", "apps", "List all installed apps", &[]),
        descriptor(
            "ls",
            "ls [path]",
            "List files and folders",
            &[("path", "folder or file to list", false)],
        ),
        descriptor(
            "cat",
            "cat <file>",
            "Display file contents",
            &[("file", "file path", true)],
        ),
        descriptor(
            "mkdir",
            "mkdir <name>",
            "Create a folder",
            &[("name", "folder name", true)],
        ),
        descriptor(
            "touch",
            "touch <name>",
            "Create a file",
            &[("name", "file name", true)],
        ),
    ] {
        registry.register(descriptor);
    }
    registry
}
