/// Key-value record store
///
/// Every collection lives under one key as a JSON array. The store keeps the
/// latest value of each key for the running session, mirrors it into a
/// `KvBackend`, and synchronously notifies observers on every write.
///
/// Durability is best effort: when the backend rejects a write (quota, disk,
/// locked database) the session value still changes and the key is reported
/// as degraded until a later write to it succeeds. Two processes sharing one
/// backend are last-writer-wins; nothing is merged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::error::StoreError;

/// Persistence layer behind a `RecordStore`
pub trait KvBackend {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Raw payload stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the payload stored under `key`
    fn set(&mut self, key: &str, payload: &str) -> Result<(), StoreError>;
}

/// In-process backend, used by tests and when the database cannot be opened
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    /// Total bytes allowed across all keys (None = unlimited)
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that fails writes once the stored payloads exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + payload.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Outcome of a successful `RecordStore::write`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// The backend accepted the payload
    Persisted,
    /// Only this session sees the value; it will be lost on restart
    SessionOnly,
}

/// Handle returned by `RecordStore::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Value)>;

pub struct RecordStore {
    backend: Box<dyn KvBackend>,
    /// Latest value of every key read or written this session
    session: HashMap<String, Value>,
    observers: HashMap<String, Vec<(SubscriptionId, Observer)>>,
    /// Keys whose latest write never reached the backend
    degraded: BTreeSet<String>,
    next_subscription: u64,
}

impl RecordStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            session: HashMap::new(),
            observers: HashMap::new(),
            degraded: BTreeSet::new(),
            next_subscription: 0,
        }
    }

    /// Store over a fresh `MemoryBackend`
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Value stored under `key`, or `default` when it is absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.raw(key) else {
            return default;
        };

        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("⚠️  Ignoring unreadable value for '{}': {}", key, e);
                default
            }
        }
    }

    /// Current JSON value for `key`, if any
    fn raw(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.session.get(key) {
            return Some(value.clone());
        }

        let payload = match self.backend.get(key) {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!("⚠️  {} backend read of '{}' failed: {}", self.backend.name(), key, e);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("⚠️  Corrupt payload under '{}' treated as absent: {}", key, e);
                None
            }
        }
    }

    /// Serialize `value` under `key`, persist it, and notify observers.
    ///
    /// Only a serialization failure is an error. A backend failure is logged,
    /// the session still sees the new value, and `Durability::SessionOnly` is
    /// returned.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<Durability, StoreError> {
        let json = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        let payload = json.to_string();

        let durability = match self.backend.set(key, &payload) {
            Ok(()) => {
                if self.degraded.remove(key) {
                    tracing::info!("💾 '{}' is durable again", key);
                }
                Durability::Persisted
            }
            Err(e) => {
                tracing::error!(
                    "❌ Failed to persist '{}' to {} backend, keeping it for this session only: {}",
                    key,
                    self.backend.name(),
                    e
                );
                self.degraded.insert(key.to_string());
                Durability::SessionOnly
            }
        };

        self.session.insert(key.to_string(), json);
        self.notify(key);

        Ok(durability)
    }

    /// Register `observer` to be called with the new value after every write to `key`
    pub fn subscribe(&mut self, key: &str, observer: impl FnMut(&Value) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers
            .entry(key.to_string())
            .or_default()
            .push((id, Box::new(observer)));
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for observers in self.observers.values_mut() {
            if let Some(pos) = observers.iter().position(|(sid, _)| *sid == id) {
                observers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Whether the latest write to `key` reached the backend
    pub fn is_durable(&self, key: &str) -> bool {
        !self.degraded.contains(key)
    }

    /// Keys currently held only in memory
    pub fn degraded_keys(&self) -> impl Iterator<Item = &str> {
        self.degraded.iter().map(String::as_str)
    }

    fn notify(&mut self, key: &str) {
        let (Some(value), Some(observers)) = (self.session.get(key), self.observers.get_mut(key)) else {
            return;
        };
        for (_, observer) in observers.iter_mut() {
            observer(value);
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("backend", &self.backend.name())
            .field("keys", &self.session.keys().collect::<Vec<_>>())
            .field("degraded", &self.degraded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_read_missing_key_returns_default() {
        let store = RecordStore::in_memory();
        let value: Vec<String> = store.read("nothing", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_write_is_visible_to_next_read() {
        let mut store = RecordStore::in_memory();
        let durability = store.write("numbers", &vec![3, 1, 2]).unwrap();

        assert_eq!(durability, Durability::Persisted);
        assert_eq!(store.read::<Vec<i32>>("numbers", vec![]), vec![3, 1, 2]);
    }

    #[test]
    fn test_persisted_value_survives_new_store() {
        let mut backend = MemoryBackend::new();
        backend.set("numbers", "[4,5]").unwrap();

        let store = RecordStore::new(backend);
        assert_eq!(store.read::<Vec<i32>>("numbers", vec![]), vec![4, 5]);
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_default() {
        let mut backend = MemoryBackend::new();
        backend.set("numbers", "{not json").unwrap();
        backend.set("wrong-shape", "{\"a\":1}").unwrap();

        let store = RecordStore::new(backend);
        assert!(store.read::<Vec<i32>>("numbers", vec![]).is_empty());
        assert!(store.read::<Vec<i32>>("wrong-shape", vec![]).is_empty());
    }

    #[test]
    fn test_observers_see_each_write() {
        let mut store = RecordStore::in_memory();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe("numbers", move |value| sink.borrow_mut().push(value.clone()));

        store.write("numbers", &vec![1]).unwrap();
        store.write("other", &vec![9]).unwrap();
        store.write("numbers", &vec![1, 2]).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_observers_fire_when_write_is_session_only() {
        let mut store = RecordStore::new(MemoryBackend::with_quota(16));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe("k", move |value| sink.borrow_mut().push(value.clone()));

        let durability = store.write("k", &vec!["does not fit in sixteen bytes"]).unwrap();
        assert_eq!(durability, Durability::SessionOnly);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], serde_json::json!(["does not fit in sixteen bytes"]));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = RecordStore::in_memory();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let id = store.subscribe("numbers", move |_| *counter.borrow_mut() += 1);

        store.write("numbers", &vec![1]).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.write("numbers", &vec![2]).unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_quota_failure_keeps_session_value() {
        let mut store = RecordStore::new(MemoryBackend::with_quota(32));

        let small = store.write("k", &vec![1]).unwrap();
        assert_eq!(small, Durability::Persisted);

        let big = vec!["a long string that will not fit"; 4];
        let durability = store.write("k", &big).unwrap();

        assert_eq!(durability, Durability::SessionOnly);
        assert!(!store.is_durable("k"));
        assert_eq!(store.degraded_keys().collect::<Vec<_>>(), vec!["k"]);
        assert_eq!(store.read::<Vec<String>>("k", vec![]).len(), 4);

        // A smaller write fits again and clears the degraded flag
        store.write("k", &vec![2]).unwrap();
        assert!(store.is_durable("k"));
    }
}
