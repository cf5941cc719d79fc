//! Desktop snapshot persistence through the host app-state store.

use platform_host::{
    load_app_state_with_migration, migrate_envelope_payload, save_app_state_with,
    AppStateEnvelope, AppStateStore, DESKTOP_STATE_NAMESPACE,
};

use crate::model::{DesktopState, SystemState, DESKTOP_LAYOUT_SCHEMA_VERSION};

fn migrate_system_state(
    schema_version: u32,
    envelope: &AppStateEnvelope,
) -> Result<Option<SystemState>, String> {
    match schema_version {
        0 => migrate_envelope_payload(envelope).map(Some),
        _ => Ok(None),
    }
}

/// Loads the persisted desktop snapshot, if any.
///
/// Store and decode failures are logged and treated as "nothing persisted".
pub async fn load_system_state<S: AppStateStore + ?Sized>(store: &S) -> Option<SystemState> {
    match load_app_state_with_migration(
        store,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        migrate_system_state,
    )
    .await
    {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(error = %err, "desktop snapshot load failed");
            None
        }
    }
}

/// Saves the current desktop snapshot.
///
/// # Errors
///
/// Returns the store error message when serialization or the save fails.
pub async fn persist_system_state<S: AppStateStore + ?Sized>(
    store: &S,
    state: &DesktopState,
) -> Result<(), String> {
    save_app_state_with(
        store,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        &state.snapshot(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{build_app_state_envelope, MemoryAppStateStore, NoopAppStateStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_round_trips_through_memory_store() {
        let store = MemoryAppStateStore::default();
        let state = DesktopState {
            next_z_index: 130,
            background: Some("aurora".to_string()),
            ..DesktopState::default()
        };
        block_on(persist_system_state(&store, &state)).expect("persist");
        assert_eq!(store.namespaces(), vec![DESKTOP_STATE_NAMESPACE.to_string()]);

        let loaded = block_on(load_system_state(&store)).expect("snapshot");
        assert_eq!(loaded, state.snapshot());
    }

    #[test]
    fn undecodable_payload_is_treated_as_absent() {
        let store = MemoryAppStateStore::default();
        let envelope = build_app_state_envelope(
            DESKTOP_STATE_NAMESPACE,
            DESKTOP_LAYOUT_SCHEMA_VERSION,
            &json!({"windows": "nope"}),
        )
        .expect("envelope");
        block_on(store.save_app_state_envelope(&envelope)).expect("save");
        assert_eq!(block_on(load_system_state(&store)), None);
    }

    #[test]
    fn legacy_schema_zero_payload_is_migrated() {
        let store = MemoryAppStateStore::default();
        let snapshot = DesktopState::default().snapshot();
        let envelope =
            build_app_state_envelope(DESKTOP_STATE_NAMESPACE, 0, &snapshot).expect("envelope");
        block_on(store.save_app_state_envelope(&envelope)).expect("save");
        assert_eq!(block_on(load_system_state(&store)), Some(snapshot));
    }

    #[test]
    fn noop_store_never_returns_a_snapshot() {
        let store = NoopAppStateStore;
        block_on(persist_system_state(&store, &DesktopState::default())).expect("persist");
        assert_eq!(block_on(load_system_state(&store)), None);
    }
}
