//! Ordered object (string keys → values) for the Lagoon runtime.
//!
//! Objects created for a struct declared in the compiled program carry that
//! struct's name; method dispatch consults the named descriptor before the
//! built-in object descriptor.

use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::value::Value;

#[derive(Default)]
struct ObjectInner {
    type_name: Option<Arc<str>>,
    fields: RwLock<IndexMap<String, Value>>,
}

#[derive(Clone, Default)]
pub struct LagoonObject {
    inner: Arc<ObjectInner>,
}

impl LagoonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// An instance of the source-language type `type_name`.
    pub fn named(type_name: &str) -> Self {
        LagoonObject {
            inner: Arc::new(ObjectInner {
                type_name: Some(Arc::from(type_name)),
                fields: RwLock::new(IndexMap::new()),
            }),
        }
    }

    pub fn type_name(&self) -> Option<Arc<str>> {
        self.inner.type_name.clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn set(&self, key: &str, value: Value) -> Option<Value> {
        self.inner
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value)
    }

    pub fn len(&self) -> usize {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fields in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &LagoonObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let obj = LagoonObject::new();
        assert!(obj.is_empty());
        assert_eq!(obj.set("a", Value::from(1)), None);
        assert_eq!(obj.set("a", Value::from(2)), Some(Value::from(1)));
        assert_eq!(obj.get("a"), Some(Value::from(2)));
        assert_eq!(obj.get("missing"), None);
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_insertion_order() {
        let obj = LagoonObject::new();
        obj.set("z", Value::from(1));
        obj.set("a", Value::from(2));
        obj.set("m", Value::from(3));
        let keys: Vec<String> = obj.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_named() {
        let p = LagoonObject::named("Point");
        assert_eq!(p.type_name().as_deref(), Some("Point"));
        assert_eq!(LagoonObject::new().type_name(), None);
        let q = p.clone();
        q.set("x", Value::from(1));
        assert_eq!(p.get("x"), Some(Value::from(1)));
        assert!(p.ptr_eq(&q));
    }
}
