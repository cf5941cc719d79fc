//! Fluxo evaluation against live desktop state.
//!
//! Evaluation runs in two passes over a parsed [`FluxoProgram`]. If the line has any print call,
//! only prints are evaluated. Otherwise every binding is resolved against the live window set
//! first, then method calls run left to right as reducer actions. Bindings last for one line.

use std::collections::HashMap;

use fluxo_headless::{format_number, parse_js_number, parse_program, FluxoProgram, MethodCall};
use system_shell_contract::COMMAND_EXECUTED_ACK;

use crate::model::WindowId;
use crate::reducer::DesktopAction;

/// What the evaluator needs from the desktop: live-window lookup and action dispatch.
pub trait FluxoHost {
    /// Returns `true` when `window_id` names a live window.
    fn is_live_window(&self, window_id: &WindowId) -> bool;

    /// Applies a window transition.
    fn dispatch_window_action(&mut self, action: DesktopAction);
}

/// Parses and evaluates one line of Fluxo source.
pub fn evaluate_fluxo<H: FluxoHost + ?Sized>(host: &mut H, source: &str) -> String {
    evaluate_program(host, &parse_program(source))
}

/// Evaluates an already parsed program.
pub fn evaluate_program<H: FluxoHost + ?Sized>(host: &mut H, program: &FluxoProgram) -> String {
    if program.has_print() {
        let lines: Vec<String> = program.prints().map(|print| print.expr.render()).collect();
        return lines.join("\n").trim().to_string();
    }

    let mut bindings: HashMap<&str, Option<WindowId>> = HashMap::new();
    for binding in program.bindings() {
        let window_id = WindowId::new(binding.window_id.as_str());
        let resolved = host.is_live_window(&window_id).then_some(window_id);
        if resolved.is_none() {
            tracing::debug!(name = %binding.name, window_id = %binding.window_id, "binding to unknown window");
        }
        bindings.insert(binding.name.as_str(), resolved);
    }

    let mut output = Vec::new();
    for call in program.method_calls() {
        let Some(Some(window_id)) = bindings.get(call.receiver.as_str()) else {
            output.push(format!(
                "Error: Window variable '{}' not found",
                call.receiver
            ));
            continue;
        };
        if let Some(line) = run_method(host, window_id, call) {
            output.push(line);
        }
    }

    let output = output.join("\n");
    let output = output.trim();
    if output.is_empty() {
        COMMAND_EXECUTED_ACK.to_string()
    } else {
        output.to_string()
    }
}

fn numeric_pair(args: &[String]) -> Option<(f64, f64)> {
    let first = parse_js_number(args.first()?)?;
    let second = parse_js_number(args.get(1)?)?;
    Some((first, second))
}

fn run_method<H: FluxoHost + ?Sized>(
    host: &mut H,
    window_id: &WindowId,
    call: &MethodCall,
) -> Option<String> {
    match call.method.as_str() {
        "move" => {
            let Some((x, y)) = numeric_pair(&call.args) else {
                tracing::debug!(%window_id, args = ?call.args, "move skipped: non-numeric arguments");
                return None;
            };
            host.dispatch_window_action(DesktopAction::MoveWindow {
                window_id: window_id.clone(),
                x,
                y,
            });
            Some(format!(
                "Moved window {window_id} to ({}, {})",
                format_number(x),
                format_number(y)
            ))
        }
        "resize" => {
            let Some((width, height)) = numeric_pair(&call.args) else {
                tracing::debug!(%window_id, args = ?call.args, "resize skipped: non-numeric arguments");
                return None;
            };
            host.dispatch_window_action(DesktopAction::ResizeWindow {
                window_id: window_id.clone(),
                width,
                height,
            });
            Some(format!(
                "Resized window {window_id} to {}x{}",
                format_number(width),
                format_number(height)
            ))
        }
        "close" => {
            host.dispatch_window_action(DesktopAction::CloseWindow {
                window_id: window_id.clone(),
            });
            Some(format!("Closed window {window_id}"))
        }
        "focus" => {
            host.dispatch_window_action(DesktopAction::FocusWindow {
                window_id: window_id.clone(),
            });
            Some(format!("Focused window {window_id}"))
        }
        other => Some(format!("Unknown method: {other}")),
    }
}
