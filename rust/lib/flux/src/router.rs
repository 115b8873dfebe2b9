use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::pattern;
use crate::store::StateStore;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

type ErasedHandler = Arc<dyn Fn(String, Payload, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Maps request path patterns to async handlers.
///
/// Every handler whose pattern matches a dispatched path runs, in
/// registration order, one after another.
pub struct Router {
    routes: RwLock<Vec<(String, ErasedHandler)>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
        }
    }

    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |path, payload, store| -> BoxFuture {
            Box::pin(handler(path, payload, store))
        });
        self.routes
            .write()
            .unwrap()
            .push((pattern.to_string(), erased));
    }

    /// Run all handlers matching `path`. Unrouted paths are a no-op.
    pub async fn dispatch(&self, path: &str, payload: Payload, store: Arc<StateStore>) {
        let handlers = self.matching(path);
        if handlers.is_empty() {
            tracing::debug!(path, "no handler for request");
            return;
        }
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        !self.matching(path).is_empty()
    }

    fn matching(&self, path: &str) -> Vec<ErasedHandler> {
        self.routes
            .read()
            .unwrap()
            .iter()
            .filter(|(p, _)| pattern::matches(p, path))
            .map(|(_, h)| Arc::clone(h))
            .collect()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Ping {
        n: u32,
    }

    #[tokio::test]
    async fn dispatch_downcasts_payload() {
        let router = Router::new();
        router.on("ping", |_, payload, store: Arc<StateStore>| async move {
            let req = payload.downcast_ref::<Ping>().unwrap();
            store.set("pong", req.n + 1);
        });

        let store = Arc::new(StateStore::new());
        router
            .dispatch("ping", Arc::new(Ping { n: 41 }), store.clone())
            .await;
        assert_eq!(store.read::<u32>("pong"), Some(42));
    }

    #[tokio::test]
    async fn unmatched_path_is_noop() {
        let router = Router::new();
        router.on("auth/login", |_, _, store: Arc<StateStore>| async move {
            store.set("hit", true);
        });
        let store = Arc::new(StateStore::new());
        router.dispatch("auth/logout", Arc::new(()), store.clone()).await;
        assert!(!store.contains("hit"));
        assert!(!router.matches("auth/logout"));
    }

    #[tokio::test]
    async fn wildcard_handlers_run_in_registration_order() {
        let router = Router::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["exact", "wild"] {
            let log = log.clone();
            let pattern = if tag == "exact" { "users/load" } else { "users/#" };
            router.on(pattern, move |path, _, _| {
                let log = log.clone();
                async move { log.lock().unwrap().push(format!("{tag}:{path}")) }
            });
        }

        router
            .dispatch("users/load", Arc::new(()), Arc::new(StateStore::new()))
            .await;
        assert_eq!(
            *log.lock().unwrap(),
            vec!["exact:users/load".to_string(), "wild:users/load".to_string()]
        );
    }
}
