//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.
//!
//! Every window transition in the system, whether it comes from a UI control, the taskbar, or a
//! Fluxo script, is expressed as a [`DesktopAction`] and applied by [`reduce_desktop`]. Actions
//! that reference an unknown window or app id are no-ops: they leave state untouched, log at
//! `debug`, and return no effects.

use serde_json::Value;

use crate::apps;
use crate::config::WindowDefaults;
use crate::model::{
    DesktopState, DragSession, InteractionState, NewApplication, OpenWindowRequest,
    PointerPosition, ResizeEdge, ResizeSession, SystemState, WindowId, WindowStatus,
};
use crate::window_manager::{
    allocate, clamp_resized_rect, clear_focus, find_window_mut, focus_window_internal, remove,
    resize_rect,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an app, or focus the existing one for single-instance apps.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id. Focus is cleared on every window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (restore and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Set a window's top-left position.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New left edge.
        x: f64,
        /// New top edge.
        y: f64,
    },
    /// Set a window's size. No minimum is enforced.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// Shallow-merge a JSON object into a window's data payload.
    SetWindowData {
        /// Window whose data is patched.
        window_id: WindowId,
        /// Object whose keys replace those in the current payload.
        patch: Value,
    },
    /// Toggle taskbar behavior for a window (restore, minimize, or focus).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize, clamped to the configured minimum size.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Register a new application and give it a desktop icon.
    InstallApp(NewApplication),
    /// Remove an application with its icons and windows.
    UninstallApp {
        /// Application to remove.
        app_id: String,
    },
    /// Set or clear the desktop background identifier.
    SetBackground {
        /// Background identifier.
        background: Option<String>,
    },
    /// Restore windows, icons, z counter, and background from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: SystemState,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Persist the current desktop snapshot.
    PersistLayout,
    /// Move input focus into the newly focused window.
    FocusWindowInput(WindowId),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    defaults: &WindowDefaults,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let Some(app) = state.app(&req.app_id).cloned() else {
                tracing::debug!(app_id = %req.app_id, "open ignored: unknown app");
                return effects;
            };
            if !app.can_multi_instance {
                let existing = state
                    .windows
                    .iter()
                    .find(|w| w.app_id == app.id && w.status != WindowStatus::Closed)
                    .map(|w| w.id.clone());
                if let Some(window_id) = existing {
                    tracing::debug!(app_id = %app.id, %window_id, "single-instance app already open");
                    return reduce_desktop(
                        state,
                        interaction,
                        defaults,
                        DesktopAction::FocusWindow { window_id },
                    );
                }
            }
            clear_focus(state);
            let now = platform_host::unix_time_ms_now();
            let window_id = allocate(state, defaults, &app, req.data, now);
            tracing::debug!(app_id = %app.id, %window_id, "opened window");
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            if remove(state, &window_id).is_none() {
                tracing::debug!(%window_id, "close ignored: unknown window");
                return effects;
            }
            clear_focus(state);
            end_sessions_for(interaction, &window_id);
            tracing::debug!(%window_id, "closed window");
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            if !focus_window_internal(state, &window_id) {
                tracing::debug!(%window_id, "focus ignored: unknown window");
                return effects;
            }
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let Some(window) = find_window_mut(state, &window_id) else {
                tracing::debug!(%window_id, "minimize ignored: unknown window");
                return effects;
            };
            window.status = WindowStatus::Minimized;
            window.focused = false;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            let Some(window) = find_window_mut(state, &window_id) else {
                tracing::debug!(%window_id, "move ignored: unknown window");
                return effects;
            };
            window.rect.x = x;
            window.rect.y = y;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ResizeWindow {
            window_id,
            width,
            height,
        } => {
            let Some(window) = find_window_mut(state, &window_id) else {
                tracing::debug!(%window_id, "resize ignored: unknown window");
                return effects;
            };
            window.rect.width = width;
            window.rect.height = height;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetWindowData { window_id, patch } => {
            let Value::Object(patch) = patch else {
                tracing::debug!(%window_id, "window data patch ignored: not an object");
                return effects;
            };
            let Some(window) = find_window_mut(state, &window_id) else {
                tracing::debug!(%window_id, "window data patch ignored: unknown window");
                return effects;
            };
            match &mut window.data {
                Value::Object(data) => data.extend(patch),
                data => *data = Value::Object(patch),
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let Some(window) = state.window(&window_id) else {
                tracing::debug!(%window_id, "taskbar toggle ignored: unknown window");
                return effects;
            };
            let next = if window.focused && !window.is_minimized() {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            return reduce_desktop(state, interaction, defaults, next);
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let Some(rect_start) = state.window(&window_id).map(|w| w.rect) else {
                tracing::debug!(%window_id, "drag ignored: unknown window");
                return effects;
            };
            effects = reduce_desktop(
                state,
                interaction,
                defaults,
                DesktopAction::FocusWindow {
                    window_id: window_id.clone(),
                },
            );
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let rect = session.rect_start.offset(dx, dy);
                if let Some(window) = find_window_mut(state, &session.window_id) {
                    window.rect = rect;
                }
            }
        }
        DesktopAction::EndMove => {
            if interaction.dragging.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let Some(rect_start) = state.window(&window_id).map(|w| w.rect) else {
                tracing::debug!(%window_id, "resize session ignored: unknown window");
                return effects;
            };
            effects = reduce_desktop(
                state,
                interaction,
                defaults,
                DesktopAction::FocusWindow {
                    window_id: window_id.clone(),
                },
            );
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let resized = resize_rect(session.rect_start, session.edge, dx, dy);
                let rect = clamp_resized_rect(
                    session.rect_start,
                    session.edge,
                    resized,
                    defaults.min_width,
                    defaults.min_height,
                );
                if let Some(window) = find_window_mut(state, &session.window_id) {
                    window.rect = rect;
                }
            }
        }
        DesktopAction::EndResize => {
            if interaction.resizing.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::InstallApp(new_app) => {
            apps::install_app(state, new_app);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::UninstallApp { app_id } => {
            if !apps::uninstall_app(state, &app_id) {
                tracing::debug!(%app_id, "uninstall ignored: unknown app");
                return effects;
            }
            let removed: Vec<WindowId> = state
                .windows
                .iter()
                .filter(|w| w.app_id == app_id)
                .map(|w| w.id.clone())
                .collect();
            let removed_focused = removed
                .iter()
                .any(|id| state.window(id).is_some_and(|w| w.focused));
            state.windows.retain(|w| w.app_id != app_id);
            for window_id in &removed {
                end_sessions_for(interaction, window_id);
            }
            if removed_focused {
                clear_focus(state);
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetBackground { background } => {
            if state.background != background {
                state.background = background;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            hydrate_snapshot(state, snapshot);
            *interaction = InteractionState::default();
        }
    }

    effects
}

fn end_sessions_for(interaction: &mut InteractionState, window_id: &WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|session| &session.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|session| &session.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

fn hydrate_snapshot(state: &mut DesktopState, snapshot: SystemState) {
    // Closed records still count toward the z floor.
    let max_z = snapshot.windows.iter().map(|w| w.z_index).max();
    let mut windows: Vec<_> = snapshot
        .windows
        .into_iter()
        .filter(|w| w.status != WindowStatus::Closed)
        .collect();

    let keep_focused = windows
        .iter()
        .filter(|w| w.focused && !w.is_minimized())
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
    for window in &mut windows {
        window.focused = keep_focused.as_ref() == Some(&window.id);
    }

    state.next_z_index = match max_z {
        Some(max_z) => snapshot.next_z_index.max(max_z.saturating_add(1)),
        None => snapshot.next_z_index,
    };
    let max_window_seq = windows
        .iter()
        .filter_map(|w| w.id.as_str().strip_prefix("win-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    state.next_window_id = state.next_window_id.max(max_window_seq.saturating_add(1));

    state.windows = windows;
    state.desktop_icons = snapshot.desktop_icons;
    state.background = snapshot.background;
    tracing::debug!(
        windows = state.windows.len(),
        next_z_index = state.next_z_index,
        "hydrated desktop snapshot"
    );
}
