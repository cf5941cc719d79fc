//! Desktop controller that owns runtime state and the reducer dispatch path.
//!
//! [`DesktopRuntime`] is the single owner of window state, the app catalog, pointer interaction
//! sessions, and the virtual file system. UI controls call its window methods, terminal surfaces
//! call [`DesktopRuntime::evaluate`], and both end up in the same [`reduce_desktop`] transition.
//! Effects emitted by the reducer are queued until the host drains them with
//! [`DesktopRuntime::take_effects`] or [`crate::effect_executor::run_effects`].

use platform_host::{AppStateStore, MemoryVirtualFs};
use serde_json::Value;
use system_shell_contract::{ShellError, ShellRequest};

use crate::apps;
use crate::config::DesktopConfig;
use crate::fluxo::FluxoHost;
use crate::model::{
    DesktopState, InteractionState, NewApplication, OpenWindowRequest, WindowId, WindowStatus,
};
use crate::persistence::load_system_state;
use crate::reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
use crate::shell;

#[derive(Debug, Clone)]
/// Long-lived desktop controller.
pub struct DesktopRuntime {
    config: DesktopConfig,
    state: DesktopState,
    interaction: InteractionState,
    fs: MemoryVirtualFs,
    effects: Vec<RuntimeEffect>,
}

impl Default for DesktopRuntime {
    fn default() -> Self {
        Self::new(DesktopConfig::default())
    }
}

impl DesktopRuntime {
    /// Boots a desktop from `config` with the default virtual file system tree.
    pub fn new(config: DesktopConfig) -> Self {
        Self::with_fs(config, MemoryVirtualFs::default())
    }

    /// Boots a desktop from `config` over an existing file system.
    pub fn with_fs(config: DesktopConfig, fs: MemoryVirtualFs) -> Self {
        let mut state = DesktopState {
            next_z_index: config.windows.initial_z_index,
            apps: config.apps.clone(),
            background: config.desktop.background.clone(),
            ..DesktopState::default()
        };
        state.desktop_icons = apps::default_desktop_icons(&mut state);
        tracing::debug!(
            apps = state.apps.len(),
            icons = state.desktop_icons.len(),
            "desktop runtime booted"
        );
        Self {
            config,
            state,
            interaction: InteractionState::default(),
            fs,
            effects: Vec::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// Current desktop state.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Current pointer interaction sessions.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Virtual file system.
    pub fn fs(&self) -> &MemoryVirtualFs {
        &self.fs
    }

    /// Mutable virtual file system.
    pub fn fs_mut(&mut self) -> &mut MemoryVirtualFs {
        &mut self.fs
    }

    /// Applies `action` and queues the effects it emits.
    pub fn dispatch(&mut self, action: DesktopAction) {
        let effects = reduce_desktop(
            &mut self.state,
            &mut self.interaction,
            &self.config.windows,
            action,
        );
        self.effects.extend(effects);
    }

    /// Effects queued since the last drain.
    pub fn pending_effects(&self) -> &[RuntimeEffect] {
        &self.effects
    }

    /// Drains queued effects in emission order.
    pub fn take_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Opens a window for `app_id` and returns the window that ends up focused.
    ///
    /// Single-instance apps focus their existing window. Unknown apps return `None`.
    pub fn open_window(&mut self, app_id: &str, data: Option<Value>) -> Option<WindowId> {
        let request = OpenWindowRequest {
            app_id: app_id.to_string(),
            data,
        };
        self.dispatch(DesktopAction::OpenWindow(request));
        self.state
            .windows
            .iter()
            .find(|w| w.focused && w.app_id == app_id)
            .map(|w| w.id.clone())
    }

    /// Closes a window.
    pub fn close_window(&mut self, window_id: &WindowId) {
        self.dispatch(DesktopAction::CloseWindow {
            window_id: window_id.clone(),
        });
    }

    /// Minimizes a window.
    pub fn minimize_window(&mut self, window_id: &WindowId) {
        self.dispatch(DesktopAction::MinimizeWindow {
            window_id: window_id.clone(),
        });
    }

    /// Focuses (restores and raises) a window.
    pub fn focus_window(&mut self, window_id: &WindowId) {
        self.dispatch(DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        });
    }

    /// Moves a window's top-left corner.
    pub fn move_window(&mut self, window_id: &WindowId, x: f64, y: f64) {
        self.dispatch(DesktopAction::MoveWindow {
            window_id: window_id.clone(),
            x,
            y,
        });
    }

    /// Resizes a window without clamping.
    pub fn resize_window(&mut self, window_id: &WindowId, width: f64, height: f64) {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id: window_id.clone(),
            width,
            height,
        });
    }

    /// Shallow-merges `patch` into a window's data payload.
    pub fn set_window_data(&mut self, window_id: &WindowId, patch: Value) {
        self.dispatch(DesktopAction::SetWindowData {
            window_id: window_id.clone(),
            patch,
        });
    }

    /// Taskbar button behavior for a window.
    pub fn toggle_taskbar_window(&mut self, window_id: &WindowId) {
        self.dispatch(DesktopAction::ToggleTaskbarWindow {
            window_id: window_id.clone(),
        });
    }

    /// Installs a new application and returns its id.
    pub fn install_app(&mut self, new_app: NewApplication) -> Option<String> {
        let before: Vec<String> = self.state.apps.iter().map(|app| app.id.clone()).collect();
        self.dispatch(DesktopAction::InstallApp(new_app));
        self.state
            .apps
            .iter()
            .find(|app| !before.contains(&app.id))
            .map(|app| app.id.clone())
    }

    /// Uninstalls an application with its icons and windows.
    pub fn uninstall_app(&mut self, app_id: &str) {
        self.dispatch(DesktopAction::UninstallApp {
            app_id: app_id.to_string(),
        });
    }

    /// Evaluates one terminal line.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] when a `mkdir`/`touch` mutation is rejected.
    pub fn evaluate(
        &mut self,
        line: &str,
        source_window_id: Option<&WindowId>,
    ) -> Result<String, ShellError> {
        let request = ShellRequest::new(line, source_window_id.map(|id| id.as_str().to_string()));
        self.execute(&request)
    }

    /// Executes a structured shell request.
    ///
    /// # Errors
    ///
    /// Same as [`Self::evaluate`].
    pub fn execute(&mut self, request: &ShellRequest) -> Result<String, ShellError> {
        shell::execute_request(self, request)
    }

    /// Restores the persisted desktop snapshot from `store`, if one exists.
    ///
    /// Returns `true` when a snapshot was applied.
    pub async fn hydrate_from<S: AppStateStore + ?Sized>(&mut self, store: &S) -> bool {
        let Some(snapshot) = load_system_state(store).await else {
            return false;
        };
        self.dispatch(DesktopAction::HydrateSnapshot { snapshot });
        true
    }
}

impl FluxoHost for DesktopRuntime {
    fn is_live_window(&self, window_id: &WindowId) -> bool {
        self.state
            .window(window_id)
            .is_some_and(|w| w.status != WindowStatus::Closed)
    }

    fn dispatch_window_action(&mut self, action: DesktopAction) {
        self.dispatch(action);
    }
}
