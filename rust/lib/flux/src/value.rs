use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, reference-counted state value.
///
/// Clone is an `Arc` clone; readers share the same allocation.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the stored value as `T`, or `None` on a type mismatch.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_id", &(*self.inner).type_id())
            .finish()
    }
}

/// Handle returned by `StateStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_matches_stored_type_only() {
        let v = StateValue::new(7u32);
        assert_eq!(v.downcast_ref::<u32>(), Some(&7));
        assert_eq!(v.downcast_ref::<i64>(), None);
        assert!(v.is::<u32>());
        assert_eq!(v.type_id(), TypeId::of::<u32>());
    }

    #[test]
    fn clones_share_allocation() {
        let v = StateValue::new(vec![1u8; 64]);
        let w = v.clone();
        let p1 = v.downcast_ref::<Vec<u8>>().unwrap().as_ptr();
        let p2 = w.downcast_ref::<Vec<u8>>().unwrap().as_ptr();
        assert_eq!(p1, p2);
    }

    #[test]
    fn option_payloads_round_trip() {
        let v = StateValue::new(None::<String>);
        assert_eq!(v.downcast_ref::<Option<String>>(), Some(&None));
    }
}
