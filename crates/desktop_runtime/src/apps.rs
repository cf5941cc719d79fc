//! Application catalog and desktop icon placement.

use crate::model::{Application, DesktopIcon, DesktopState, NewApplication};

/// Horizontal position of every desktop icon column entry.
pub const ICON_COLUMN_X: f64 = 20.0;
/// Vertical position of the first boot-time icon.
pub const ICON_COLUMN_TOP: f64 = 20.0;
/// Vertical distance between stacked desktop icons.
pub const ICON_ROW_STEP: f64 = 120.0;

/// Catalog entries that get a desktop icon at boot.
pub fn desktop_icon_apps(apps: &[Application]) -> Vec<&Application> {
    apps.iter().filter(|app| app.show_on_desktop).collect()
}

/// Boot-time icon column for the catalog: `y = 20 + 120·order`.
pub fn default_desktop_icons(state: &mut DesktopState) -> Vec<DesktopIcon> {
    let app_ids: Vec<String> = desktop_icon_apps(&state.apps)
        .into_iter()
        .map(|app| app.id.clone())
        .collect();
    app_ids
        .into_iter()
        .enumerate()
        .map(|(order, app_id)| DesktopIcon {
            id: next_icon_id(state),
            app_id,
            x: ICON_COLUMN_X,
            y: ICON_COLUMN_TOP + ICON_ROW_STEP * order as f64,
            order,
        })
        .collect()
}

fn next_icon_id(state: &mut DesktopState) -> String {
    let id = format!("icon-{}", state.next_icon_id);
    state.next_icon_id = state.next_icon_id.saturating_add(1);
    id
}

fn next_app_id(state: &mut DesktopState) -> String {
    loop {
        let id = format!("app-{}", state.next_app_id);
        state.next_app_id = state.next_app_id.saturating_add(1);
        if state.app(&id).is_none() {
            return id;
        }
    }
}

/// Registers `new_app` as installed and places an icon below the lowest existing one.
pub fn install_app(state: &mut DesktopState, new_app: NewApplication) -> String {
    let id = next_app_id(state);
    state.apps.push(Application {
        id: id.clone(),
        name: new_app.name,
        app_type: new_app.app_type,
        icon: new_app.icon,
        description: new_app.description,
        executable: new_app.executable,
        installed: true,
        can_multi_instance: new_app.can_multi_instance,
        show_on_desktop: true,
    });

    let max_y = state
        .desktop_icons
        .iter()
        .map(|icon| icon.y)
        .fold(0.0_f64, f64::max);
    let order = state.desktop_icons.len();
    let icon = DesktopIcon {
        id: next_icon_id(state),
        app_id: id.clone(),
        x: ICON_COLUMN_X,
        y: max_y + ICON_ROW_STEP,
        order,
    };
    state.desktop_icons.push(icon);
    tracing::debug!(app_id = %id, "installed app");
    id
}

/// Removes the app and its icons. Returns `false` when the id is unknown.
///
/// Windows of the app are removed by the reducer.
pub fn uninstall_app(state: &mut DesktopState, app_id: &str) -> bool {
    let before = state.apps.len();
    state.apps.retain(|app| app.id != app_id);
    if state.apps.len() == before {
        return false;
    }
    state.desktop_icons.retain(|icon| icon.app_id != app_id);
    tracing::debug!(app_id, "uninstalled app");
    true
}
