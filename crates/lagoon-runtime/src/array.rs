//! Shared, growable array for the Lagoon runtime, plus the array entries of
//! the extension set.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{RuntimeError, RuntimeResult};
use crate::host;
use crate::runtime::Runtime;
use crate::value::{TypeTag, Value};

// ═══════════════════════════════════════════════════════════════
// LagoonArray
// ═══════════════════════════════════════════════════════════════

/// Handle to a shared element vector. Clones share storage.
#[derive(Clone, Default)]
pub struct LagoonArray {
    inner: Arc<RwLock<Vec<Value>>>,
}

impl LagoonArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        LagoonArray {
            inner: Arc::new(RwLock::new(items)),
        }
    }

    // Poisoned locks are recovered.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        self.read().get(idx).cloned()
    }

    pub fn push(&self, value: Value) -> usize {
        let mut items = self.write();
        items.push(value);
        items.len()
    }

    pub fn pop(&self) -> Option<Value> {
        self.write().pop()
    }

    pub fn set(&self, idx: usize, value: Value) -> bool {
        match self.write().get_mut(idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the current elements. Callbacks run against a snapshot so
    /// they may mutate the array without holding its lock.
    pub fn snapshot(&self) -> Vec<Value> {
        self.read().clone()
    }

    pub fn reverse_in_place(&self) {
        self.write().reverse();
    }

    /// Membership test; `NaN` is found in an array holding `NaN`.
    pub fn contains(&self, needle: &Value) -> bool {
        self.read().iter().any(|v| v.same_value_zero(needle))
    }

    /// Strict equality, so `NaN` is never found.
    pub fn index_of(&self, needle: &Value) -> Option<usize> {
        self.read().iter().position(|v| v == needle)
    }

    pub fn ptr_eq(&self, other: &LagoonArray) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Address of the shared storage, stable for the handle's lifetime.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}

// ═══════════════════════════════════════════════════════════════
// Extension methods
// ═══════════════════════════════════════════════════════════════

pub(crate) fn install(runtime: &Runtime) {
    runtime.install_native(TypeTag::Array, "isEmpty", array_is_empty);
    runtime.install_native(TypeTag::Array, "isNotEmpty", array_is_not_empty);
    runtime.install_native(TypeTag::Array, "each", array_each);
    runtime.install_native(TypeTag::Array, "first", array_first);
    runtime.install_native(TypeTag::Array, "reverse", array_reverse);
    runtime.install_native(TypeTag::Array, "join", array_join);
    runtime.install_native(TypeTag::Array, "filter", array_filter);
    runtime.install_native(TypeTag::Array, "map", array_map);
}

fn expect_array<'a>(name: &str, this: &'a Value) -> RuntimeResult<&'a LagoonArray> {
    this.as_array().ok_or_else(|| RuntimeError::TypeMismatch {
        name: name.to_string(),
        expected: "an array receiver",
        found: this.type_label(),
    })
}

fn array_is_empty(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.isEmpty", 0, args)?;
    Ok(Value::Bool(expect_array("Array.isEmpty", this)?.is_empty()))
}

fn array_is_not_empty(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.isNotEmpty", 0, args)?;
    Ok(Value::Bool(!expect_array("Array.isNotEmpty", this)?.is_empty()))
}

/// Calls `cb(element)` in order. The result is the host's iteration result
/// (`null`), not the receiver, so `each` does not chain.
fn array_each(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.each", 1, args)?;
    let items = expect_array("Array.each", this)?.snapshot();
    for item in items {
        rt.call(&args[0], &[item])?;
    }
    Ok(Value::Null)
}

fn array_first(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity_range("Array.first", 0, 1, args)?;
    let items = expect_array("Array.first", this)?.snapshot();
    match args.first() {
        Some(cb) => {
            for item in items {
                if rt.call(cb, &[item.clone()])?.truthiness() {
                    return Ok(item);
                }
            }
            Ok(Value::Null)
        }
        None => Ok(items.into_iter().next().unwrap_or(Value::Null)),
    }
}

/// Non-mutating override of the host's in-place `reverse`: the host
/// behavior is applied to a fresh copy, which is returned.
fn array_reverse(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.reverse", 0, args)?;
    let copy = LagoonArray::from_vec(expect_array("Array.reverse", this)?.snapshot());
    host::array_reverse(rt, &Value::Array(copy), &[])
}

fn array_join(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.join", 1, args)?;
    let items = expect_array("Array.join", this)?.snapshot();
    let sep = args[0].to_string();
    let joined = items
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(&sep);
    Ok(Value::from(joined))
}

fn array_filter(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.filter", 1, args)?;
    let items = expect_array("Array.filter", this)?.snapshot();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if rt.call(&args[0], &[item.clone()])?.truthiness() {
            kept.push(item);
        }
    }
    Ok(Value::array(kept))
}

fn array_map(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.map", 1, args)?;
    let items = expect_array("Array.map", this)?.snapshot();
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(rt.call(&args[0], &[item])?);
    }
    Ok(Value::array(mapped))
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn nums(ns: &[i32]) -> Value {
        Value::array(ns.iter().map(|n| Value::from(*n)).collect())
    }

    #[test]
    fn test_push_get_set() {
        let arr = LagoonArray::new();
        assert!(arr.is_empty());
        assert_eq!(arr.push(Value::from(1)), 1);
        assert_eq!(arr.push(Value::from(2)), 2);
        assert_eq!(arr.get(1), Some(Value::from(2)));
        assert_eq!(arr.get(5), None);
        assert!(arr.set(0, Value::from("x")));
        assert!(!arr.set(9, Value::Null));
        assert_eq!(arr.get(0), Some(Value::from("x")));
        assert_eq!(arr.pop(), Some(Value::from(2)));
        assert_eq!(arr.len(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let a = LagoonArray::new();
        let b = a.clone();
        b.push(Value::from(7));
        assert_eq!(a.len(), 1);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&LagoonArray::new()));
    }

    #[test]
    fn test_contains_and_index_of() {
        let inner = Value::array(vec![]);
        let arr = LagoonArray::from_vec(vec![Value::from(1), Value::from("b"), inner.clone()]);
        assert!(arr.contains(&Value::from("b")));
        assert!(arr.contains(&inner));
        assert!(!arr.contains(&Value::array(vec![])));
        assert_eq!(arr.index_of(&Value::from(1)), Some(0));
        assert_eq!(arr.index_of(&Value::from(9)), None);
    }

    #[test]
    fn test_is_empty() {
        let rt = Runtime::new();
        assert_eq!(array_is_empty(&rt, &nums(&[]), &[]).unwrap(), Value::Bool(true));
        assert_eq!(array_is_empty(&rt, &nums(&[1]), &[]).unwrap(), Value::Bool(false));
        assert_eq!(array_is_not_empty(&rt, &nums(&[1]), &[]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_each_visits_in_order() {
        let rt = Runtime::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb = Value::closure("cb", 1, move |_, args| {
            sink.lock().unwrap().push(args[0].clone());
            Ok(Value::Null)
        });
        let out = array_each(&rt, &nums(&[1, 2, 3]), &[cb]).unwrap();
        assert_eq!(out, Value::Null);
        assert_eq!(*seen.lock().unwrap(), vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn test_first() {
        let rt = Runtime::new();
        let even = Value::closure("even", 1, |_, args| {
            Ok(Value::Bool(args[0].as_number().unwrap_or(1.0) % 2.0 == 0.0))
        });
        assert_eq!(array_first(&rt, &nums(&[5, 6, 8]), &[]).unwrap(), Value::from(5));
        assert_eq!(array_first(&rt, &nums(&[5, 6, 8]), &[even.clone()]).unwrap(), Value::from(6));
        assert_eq!(array_first(&rt, &nums(&[1, 3]), &[even.clone()]).unwrap(), Value::Null);
        assert_eq!(array_first(&rt, &nums(&[]), &[]).unwrap(), Value::Null);
        assert_eq!(array_first(&rt, &nums(&[]), &[even]).unwrap(), Value::Null);
    }

    #[test]
    fn test_reverse_does_not_mutate() {
        let rt = Runtime::new();
        let original = nums(&[1, 2, 3]);
        let reversed = array_reverse(&rt, &original, &[]).unwrap();
        assert_eq!(reversed.to_string(), "[3, 2, 1]");
        assert_eq!(original.to_string(), "[1, 2, 3]");
        assert_ne!(reversed, original);
    }

    #[test]
    fn test_join_filter_map() {
        let rt = Runtime::new();
        let joined = array_join(&rt, &nums(&[1, 2, 3]), &[Value::from("-")]).unwrap();
        assert_eq!(joined, Value::from("1-2-3"));

        let big = Value::closure("big", 1, |_, args| {
            Ok(Value::Bool(args[0].as_number().unwrap_or(0.0) > 1.0))
        });
        let filtered = array_filter(&rt, &nums(&[1, 2, 3]), &[big]).unwrap();
        assert_eq!(filtered.to_string(), "[2, 3]");

        let square = Value::closure("square", 1, |_, args| {
            let n = args[0].as_number().unwrap_or(0.0);
            Ok(Value::Number(n * n))
        });
        let source = nums(&[1, 2, 3]);
        let mapped = array_map(&rt, &source, &[square]).unwrap();
        assert_eq!(mapped.to_string(), "[1, 4, 9]");
        assert_eq!(source.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_callback_error_stops_iteration() {
        let rt = Runtime::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let cb = Value::closure("boom", 1, move |_, _| {
            *counter.lock().unwrap() += 1;
            Err(RuntimeError::raised("boom"))
        });
        let err = array_each(&rt, &nums(&[1, 2, 3]), &[cb]).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_wrong_receiver_and_arity() {
        let rt = Runtime::new();
        let err = array_is_empty(&rt, &Value::from("nope"), &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
        let err = array_each(&rt, &nums(&[1]), &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::Arity { .. }));
    }
}
