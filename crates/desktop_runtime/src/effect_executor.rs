//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use platform_host::AppStateStore;

use crate::model::WindowId;
use crate::persistence::persist_system_state;
use crate::reducer::RuntimeEffect;
use crate::runtime_context::DesktopRuntime;

/// Drains the runtime effect queue in order.
///
/// Any number of queued [`RuntimeEffect::PersistLayout`] entries collapse into one save of the
/// state as it stands after the batch. Save failures are logged and dropped. Returns the windows
/// that asked for input focus, in order, for the host to act on.
pub async fn run_effects<S: AppStateStore + ?Sized>(
    runtime: &mut DesktopRuntime,
    store: &S,
) -> Vec<WindowId> {
    let queued = runtime.take_effects();
    if queued.is_empty() {
        return Vec::new();
    }

    let mut persist = false;
    let mut focus_requests = Vec::new();
    for effect in queued {
        match effect {
            RuntimeEffect::PersistLayout => persist = true,
            RuntimeEffect::FocusWindowInput(window_id) => {
                tracing::debug!(%window_id, "window input focus requested");
                focus_requests.push(window_id);
            }
        }
    }

    if persist {
        if let Err(err) = persist_system_state(store, runtime.state()).await {
            tracing::warn!(error = %err, "desktop snapshot persist failed");
        }
    }
    focus_requests
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryAppStateStore, DESKTOP_STATE_NAMESPACE};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::persistence::load_system_state;

    #[test]
    fn batch_persists_final_state_once() {
        let store = MemoryAppStateStore::default();
        let mut runtime = DesktopRuntime::default();
        let first = runtime.open_window("terminal", None).expect("window");
        let second = runtime.open_window("terminal", None).expect("window");
        runtime.close_window(&first);

        let focused = block_on(run_effects(&mut runtime, &store));
        assert_eq!(focused, vec![first, second.clone()]);
        assert_eq!(store.namespaces(), vec![DESKTOP_STATE_NAMESPACE.to_string()]);

        let saved = block_on(load_system_state(&store)).expect("snapshot");
        assert_eq!(saved.windows.len(), 1);
        assert_eq!(saved.windows[0].id, second);
        assert!(runtime.pending_effects().is_empty());
    }

    #[test]
    fn empty_queue_touches_nothing() {
        let store = MemoryAppStateStore::default();
        let mut runtime = DesktopRuntime::default();
        assert!(block_on(run_effects(&mut runtime, &store)).is_empty());
        assert!(store.namespaces().is_empty());
    }
}
