//! Desktop runtime: window registry, reducer, app catalog, Fluxo evaluation, and the controller
//! that ties them to terminal and UI callers.
//!
//! Every window transition goes through [`reduce_desktop`]. [`DesktopRuntime`] owns the state and
//! exposes both the direct window operations used by UI controls and the line-oriented
//! [`DesktopRuntime::evaluate`] used by terminals, so both paths produce identical state.

pub mod apps;
pub mod config;
pub mod effect_executor;
pub mod fluxo;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod shell;
pub mod window_manager;

pub use config::{ConfigError, DesktopConfig, WindowDefaults};
pub use effect_executor::run_effects;
pub use fluxo::{evaluate_fluxo, FluxoHost};
pub use model::*;
pub use persistence::{load_system_state, persist_system_state};
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use runtime_context::DesktopRuntime;
