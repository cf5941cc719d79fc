//! Terminal command execution against the desktop runtime.
//!
//! A submitted line is classified by [`system_shell::parse_command_line`]; built-ins run directly
//! against the window registry, app catalog, or virtual file system, and everything else is
//! evaluated as Fluxo. User-input mistakes are reported as ordinary output lines. Only file
//! system mutations requested by `mkdir`/`touch` surface as [`ShellError`].

mod commands;

use system_shell::{parse_command_line, ParsedCommandLine};
use system_shell_contract::{ShellError, ShellRequest};

use crate::fluxo::evaluate_fluxo;
use crate::runtime_context::DesktopRuntime;

/// Executes one terminal line and returns the text to display.
///
/// # Errors
///
/// Returns a [`ShellError`] when a `mkdir` or `touch` mutation is rejected by the file system.
pub fn execute_request(
    runtime: &mut DesktopRuntime,
    request: &ShellRequest,
) -> Result<String, ShellError> {
    tracing::debug!(
        line = %request.line,
        source_window_id = request.source_window_id.as_deref().unwrap_or("-"),
        "executing terminal line"
    );
    match parse_command_line(&request.line) {
        ParsedCommandLine::Empty => Ok(String::new()),
        ParsedCommandLine::Builtin(invocation) => commands::run_builtin(runtime, invocation),
        ParsedCommandLine::Fluxo(source) => Ok(evaluate_fluxo(runtime, &source)),
    }
}
