use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    Terminal,
    VsStudio,
    Files,
    Browser,
    WebStore,
    Properties,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    pub icon: String,
    pub description: String,
    pub executable: String,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub can_multi_instance: bool,
    #[serde(default = "default_true")]
    pub show_on_desktop: bool,
}

fn default_true() -> bool {
    true
}

/// Install request for a new application; the registry assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    pub icon: String,
    pub description: String,
    pub executable: String,
    pub can_multi_instance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Open,
    Minimized,
    Closed,
}

impl WindowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Minimized => "minimized",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowRect {
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_width: f64, min_height: f64) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub app_id: String,
    pub app_type: AppType,
    #[serde(flatten)]
    pub rect: WindowRect,
    pub status: WindowStatus,
    pub z_index: u64,
    pub start_time_unix_ms: u64,
    pub focused: bool,
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl WindowRecord {
    pub fn is_minimized(&self) -> bool {
        self.status == WindowStatus::Minimized
    }

    /// One `windows` listing line.
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} ({},{}) {}x{} [{}]",
            self.id,
            self.title,
            fluxo_headless::format_number(self.rect.x),
            fluxo_headless::format_number(self.rect.y),
            fluxo_headless::format_number(self.rect.width),
            fluxo_headless::format_number(self.rect.height),
            self.status.as_str()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: String,
    pub app_id: String,
    pub x: f64,
    pub y: f64,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub next_z_index: u64,
    pub next_app_id: u64,
    pub next_icon_id: u64,
    pub windows: Vec<WindowRecord>,
    pub apps: Vec<Application>,
    pub desktop_icons: Vec<DesktopIcon>,
    pub background: Option<String>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            next_z_index: 100,
            next_app_id: 1,
            next_icon_id: 1,
            windows: Vec::new(),
            apps: Vec::new(),
            desktop_icons: Vec::new(),
            background: None,
        }
    }
}

impl DesktopState {
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.focused).map(|w| w.id.clone())
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn app(&self, app_id: &str) -> Option<&Application> {
        self.apps.iter().find(|app| app.id == app_id)
    }

    pub fn installed_apps(&self) -> impl Iterator<Item = &Application> {
        self.apps.iter().filter(|app| app.installed)
    }

    pub fn snapshot(&self) -> SystemState {
        SystemState {
            schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
            windows: self.windows.clone(),
            desktop_icons: self.desktop_icons.clone(),
            next_z_index: self.next_z_index,
            background: self.background.clone(),
        }
    }
}

/// Persisted desktop snapshot: window list, icons, z counter, and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub schema_version: u32,
    pub windows: Vec<WindowRecord>,
    pub desktop_icons: Vec<DesktopIcon>,
    pub next_z_index: u64,
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: String,
    pub data: Option<Value>,
}

impl OpenWindowRequest {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn record() -> WindowRecord {
        WindowRecord {
            id: WindowId::from("win-1"),
            title: "Terminal".to_string(),
            app_id: "terminal".to_string(),
            app_type: AppType::Terminal,
            rect: WindowRect {
                x: 100.0,
                y: 50.5,
                width: 400.0,
                height: 300.0,
            },
            status: WindowStatus::Minimized,
            z_index: 100,
            start_time_unix_ms: 7,
            focused: false,
            data: json!({}),
        }
    }

    #[test]
    fn window_record_serializes_flat_geometry() {
        let value = serde_json::to_value(record()).expect("serialize");
        assert_eq!(value["id"], json!("win-1"));
        assert_eq!(value["x"], json!(100.0));
        assert_eq!(value["height"], json!(300.0));
        assert_eq!(value["status"], json!("minimized"));
        assert_eq!(value["app_type"], json!("terminal"));
        assert!(value.get("rect").is_none());
    }

    #[test]
    fn summary_line_prints_integral_geometry_without_fraction() {
        assert_eq!(
            record().summary_line(),
            "win-1: Terminal (100,50.5) 400x300 [minimized]"
        );
    }

    #[test]
    fn application_type_uses_kebab_case() {
        let app: Application = serde_json::from_value(json!({
            "id": "vs-studio",
            "name": "VS.Studio",
            "type": "vs-studio",
            "icon": "⚡",
            "description": "Code editor",
            "executable": "VS.Studio.fxo",
            "installed": true,
        }))
        .expect("deserialize");
        assert_eq!(app.app_type, AppType::VsStudio);
        assert!(!app.can_multi_instance);
        assert!(app.show_on_desktop);
    }

    #[test]
    fn rect_helpers() {
        let rect = record().rect.offset(-5.0, 10.0).clamped_min(500.0, 200.0);
        assert_eq!(
            rect,
            WindowRect {
                x: 95.0,
                y: 60.5,
                width: 500.0,
                height: 300.0,
            }
        );
    }
}
