//! Window registry primitives shared by the desktop reducer.
//!
//! The registry owns identity and stacking: window ids come from a counter and z-order values
//! come from a second counter that is only ever incremented, so a value handed out once is never
//! handed out again, even after the window that held it is closed.

use serde_json::{Map, Value};

use crate::config::WindowDefaults;
use crate::model::{
    Application, DesktopState, ResizeEdge, WindowId, WindowRecord, WindowRect, WindowStatus,
};

/// Returns the current z-order value and advances the counter.
pub fn next_z(state: &mut DesktopState) -> u64 {
    let z = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    z
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(format!("win-{}", state.next_window_id));
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

/// Cascaded default geometry for the next window, offset by the live window count.
pub fn cascade_rect(defaults: &WindowDefaults, live_windows: usize) -> WindowRect {
    let offset = live_windows as f64 * defaults.cascade_step;
    WindowRect {
        x: defaults.cascade_origin_x + offset,
        y: defaults.cascade_origin_y + offset,
        width: defaults.default_width,
        height: defaults.default_height,
    }
}

/// Creates a focused, open record for `app` and appends it to the live set.
///
/// Other windows keep their focus flags; callers that grant focus must clear them.
pub fn allocate(
    state: &mut DesktopState,
    defaults: &WindowDefaults,
    app: &Application,
    data: Option<Value>,
    start_time_unix_ms: u64,
) -> WindowId {
    let id = next_window_id(state);
    let rect = cascade_rect(defaults, state.windows.len());
    let z_index = next_z(state);
    let data = match data {
        Some(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };
    state.windows.push(WindowRecord {
        id: id.clone(),
        title: app.name.clone(),
        app_id: app.id.clone(),
        app_type: app.app_type,
        rect,
        status: WindowStatus::Open,
        z_index,
        start_time_unix_ms,
        focused: true,
        data,
    });
    id
}

/// Deletes a record from the live set, returning it when present.
pub fn remove(state: &mut DesktopState, window_id: &WindowId) -> Option<WindowRecord> {
    let index = state.windows.iter().position(|w| &w.id == window_id)?;
    Some(state.windows.remove(index))
}

/// Mutable lookup of a live window record.
pub fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Option<&'a mut WindowRecord> {
    state.windows.iter_mut().find(|w| &w.id == window_id)
}

/// Restores and raises `window_id` as the sole focused window.
///
/// Returns `false` (leaving state untouched) when the id is not live.
pub fn focus_window_internal(state: &mut DesktopState, window_id: &WindowId) -> bool {
    if state.window(window_id).is_none() {
        return false;
    }
    let z_index = next_z(state);
    for window in &mut state.windows {
        if &window.id == window_id {
            window.status = WindowStatus::Open;
            window.focused = true;
            window.z_index = z_index;
        } else {
            window.focused = false;
        }
    }
    true
}

/// Clears the focus flag on every window.
pub fn clear_focus(state: &mut DesktopState) {
    for window in &mut state.windows {
        window.focused = false;
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: f64, dy: f64) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            width: start.width + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            width: start.width - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            height: start.height + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            height: start.height - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            height: start.height - dy,
            width: start.width + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            width: start.width - dx,
            height: start.height - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            width: start.width + dx,
            height: start.height + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            width: start.width - dx,
            height: start.height + dy,
            ..start
        },
    }
}

/// Clamps an edge-resized rect to the minimum size, pinning the edge opposite the one dragged.
pub fn clamp_resized_rect(
    start: WindowRect,
    edge: ResizeEdge,
    resized: WindowRect,
    min_width: f64,
    min_height: f64,
) -> WindowRect {
    let clamped = resized.clamped_min(min_width, min_height);
    let moves_left = matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    );
    let moves_top = matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest
    );
    WindowRect {
        x: if moves_left {
            start.x + start.width - clamped.width
        } else {
            clamped.x
        },
        y: if moves_top {
            start.y + start.height - clamped.height
        } else {
            clamped.y
        },
        ..clamped
    }
}
