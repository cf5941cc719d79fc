//! Versioned state envelopes and the store contract used for optional desktop persistence.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Version for [`AppStateEnvelope`] metadata serialization.
pub const APP_STATE_ENVELOPE_VERSION: u32 = 1;
/// Namespace holding the desktop system snapshot (windows, icons, z counter, background).
pub const DESKTOP_STATE_NAMESPACE: &str = "system.desktop";
/// Namespace holding terminal session state.
pub const TERMINAL_STATE_NAMESPACE: &str = "app.terminal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope wrapping a persisted payload.
pub struct AppStateEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owning domain.
    pub namespace: String,
    /// Domain-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl AppStateEnvelope {
    /// Creates a new envelope stamped with a monotonic timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Object-safe boxed future used by [`AppStateStore`] methods.
pub type AppStateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External store for state envelopes keyed by namespace.
pub trait AppStateStore {
    /// Loads an envelope by namespace.
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>>;

    /// Saves (or replaces) an envelope.
    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>>;

    /// Deletes the envelope for a namespace.
    fn delete_app_state<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that accepts every write and never returns data.
pub struct NoopAppStateStore;

impl AppStateStore for NoopAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        _envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_app_state<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by namespace. Clones share the same backing map.
pub struct MemoryAppStateStore {
    inner: Rc<RefCell<BTreeMap<String, AppStateEnvelope>>>,
}

impl MemoryAppStateStore {
    /// Returns the namespaces currently stored, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }
}

impl AppStateStore for MemoryAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(namespace).cloned()) })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(envelope.namespace.clone(), envelope.clone());
            Ok(())
        })
    }

    fn delete_app_state<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(namespace);
            Ok(())
        })
    }
}

/// Builds a versioned [`AppStateEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_app_state_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<AppStateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(AppStateEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when deserialization fails.
pub fn migrate_envelope_payload<T: DeserializeOwned>(
    envelope: &AppStateEnvelope,
) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

/// Serializes `payload` into an envelope and saves it through `store`.
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub async fn save_app_state_with<S: AppStateStore + ?Sized, T: Serialize>(
    store: &S,
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let envelope = build_app_state_envelope(namespace, schema_version, payload)?;
    store.save_app_state_envelope(&envelope).await
}

/// Loads a typed payload, routing older schema versions through `migrate`.
///
/// Envelopes newer than `current_schema_version`, or written by a different envelope format,
/// are treated as absent.
///
/// # Errors
///
/// Returns an error when the store load, migration, or decoding fails.
pub async fn load_app_state_with_migration<S, T, F>(
    store: &S,
    namespace: &str,
    current_schema_version: u32,
    migrate: F,
) -> Result<Option<T>, String>
where
    S: AppStateStore + ?Sized,
    T: DeserializeOwned,
    F: Fn(u32, &AppStateEnvelope) -> Result<Option<T>, String>,
{
    let Some(envelope) = store.load_app_state_envelope(namespace).await? else {
        return Ok(None);
    };
    if envelope.envelope_version != APP_STATE_ENVELOPE_VERSION {
        tracing::warn!(
            namespace,
            version = envelope.envelope_version,
            "ignoring state envelope with unknown format"
        );
        return Ok(None);
    }
    if envelope.schema_version == current_schema_version {
        return migrate_envelope_payload(&envelope).map(Some);
    }
    if envelope.schema_version > current_schema_version {
        return Ok(None);
    }
    migrate(envelope.schema_version, &envelope)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    fn envelope(namespace: &str, schema_version: u32, payload: Value) -> AppStateEnvelope {
        AppStateEnvelope {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.to_string(),
            schema_version,
            updated_at_unix_ms: 1,
            payload,
        }
    }

    #[test]
    fn envelope_serializes_with_snake_case_fields() {
        let value = serde_json::to_value(envelope("system.desktop", 3, json!({"ok": true})))
            .expect("serialize envelope");
        let object = value.as_object().expect("object");
        assert_eq!(object.get("schema_version"), Some(&json!(3)));
        assert_eq!(object.get("updated_at_unix_ms"), Some(&json!(1)));
        assert!(!object.contains_key("updatedAtUnixMs"));
    }

    #[test]
    fn new_envelopes_use_monotonic_timestamps() {
        let first = AppStateEnvelope::new("a", 1, json!(1));
        let second = AppStateEnvelope::new("a", 1, json!(2));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[test]
    fn memory_store_save_overwrite_and_delete() {
        let store = MemoryAppStateStore::default();
        let shared = store.clone();

        block_on(save_app_state_with(&store, "one", 1, &Counter { count: 1 })).expect("save");
        block_on(save_app_state_with(&store, "one", 1, &Counter { count: 2 })).expect("save");
        block_on(save_app_state_with(&store, "two", 1, &Counter { count: 9 })).expect("save");
        assert_eq!(shared.namespaces(), vec!["one".to_string(), "two".to_string()]);

        let loaded = block_on(load_app_state_with_migration::<_, Counter, _>(
            &shared,
            "one",
            1,
            |_, _| Ok(None),
        ))
        .expect("load");
        assert_eq!(loaded, Some(Counter { count: 2 }));

        block_on(store.delete_app_state("two")).expect("delete");
        assert_eq!(shared.namespaces(), vec!["one".to_string()]);
    }

    #[test]
    fn load_routes_older_schemas_through_migration() {
        let store = MemoryAppStateStore::default();
        block_on(store.save_app_state_envelope(&envelope("ns", 0, json!({"legacy": 4}))))
            .expect("save");

        let loaded = block_on(load_app_state_with_migration(&store, "ns", 1, |version, env| {
            assert_eq!(version, 0);
            let count = env.payload["legacy"].as_u64().unwrap_or_default() as u32;
            Ok(Some(Counter { count }))
        }))
        .expect("load");
        assert_eq!(loaded, Some(Counter { count: 4 }));
    }

    #[test]
    fn load_ignores_newer_schemas() {
        let store = MemoryAppStateStore::default();
        block_on(store.save_app_state_envelope(&envelope("ns", 5, json!({"count": 1}))))
            .expect("save");
        let loaded = block_on(load_app_state_with_migration::<_, Counter, _>(
            &store,
            "ns",
            1,
            |_, _| Err("should not migrate".to_string()),
        ))
        .expect("load");
        assert_eq!(loaded, None);
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopAppStateStore;
        let store_obj: &dyn AppStateStore = &store;
        block_on(store_obj.save_app_state_envelope(&envelope("noop", 1, json!({}))))
            .expect("save");
        assert_eq!(
            block_on(store_obj.load_app_state_envelope("noop")).expect("load"),
            None
        );
        block_on(store_obj.delete_app_state("noop")).expect("delete");
    }
}
