use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::pattern;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    pattern: String,
    handler: ChangeHandler,
}

/// Path-keyed state store with pattern subscriptions.
///
/// This is the single process-wide context every screen reads from. Writers
/// replace whole values (`set`), readers take cheap `Arc` clones (`get`) or
/// typed copies (`read`). Subscribers run synchronously on the writer's
/// thread, after the write lock is released.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store `value` at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        self.values
            .write()
            .unwrap()
            .insert(path.to_string(), value.clone());
        self.notify(path, &value);
    }

    fn notify(&self, path: &str, value: &StateValue) {
        let handlers: Vec<ChangeHandler> = self
            .subscribers
            .read()
            .unwrap()
            .iter()
            .filter(|s| pattern::matches(&s.pattern, path))
            .map(|s| Arc::clone(&s.handler))
            .collect();
        for handler in handlers {
            handler(path, value);
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.values.read().unwrap().get(path).cloned()
    }

    /// Typed read: clone of the value at `path` if it holds a `T`.
    pub fn read<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Read-modify-write of a typed value, atomic with respect to other
    /// writers. Starts from `init()` when the path is empty or holds another
    /// type. Returns the stored result.
    pub fn update<T, I, F>(&self, path: &str, init: I, f: F) -> T
    where
        T: Any + Clone + Send + Sync,
        I: FnOnce() -> T,
        F: FnOnce(&mut T),
    {
        let (value, stored) = {
            let mut values = self.values.write().unwrap();
            let mut value = values
                .get(path)
                .and_then(|v| v.downcast_ref::<T>().cloned())
                .unwrap_or_else(init);
            f(&mut value);
            let stored = StateValue::new(value.clone());
            values.insert(path.to_string(), stored.clone());
            (value, stored)
        };
        self.notify(path, &stored);
        value
    }

    /// Atomic edit of an existing typed value. `f` returns whether to keep
    /// its changes; nothing is written when the path holds no `T` or `f`
    /// returns `false`. Returns whether a write happened.
    pub fn modify<T, F>(&self, path: &str, f: F) -> bool
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut T) -> bool,
    {
        let stored = {
            let mut values = self.values.write().unwrap();
            let Some(mut value) = values.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
            else {
                return false;
            };
            if !f(&mut value) {
                return false;
            }
            let stored = StateValue::new(value);
            values.insert(path.to_string(), stored.clone());
            stored
        };
        self.notify(path, &stored);
        true
    }

    /// Remove the value at `path`. Subscribers are not notified.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        self.values.write().unwrap().remove(path)
    }

    /// All entries strictly below `prefix`, ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let scan_prefix = format!("{}/", prefix);
        self.values
            .read()
            .unwrap()
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values.read().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().unwrap().push(Subscriber {
            id,
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().unwrap().retain(|s| s.id != id);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
