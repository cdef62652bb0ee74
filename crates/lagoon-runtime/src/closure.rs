//! Function values for the Lagoon runtime.
//!
//! Every callable the runtime handles, whether a builtin, an extension
//! method, or a closure supplied by compiled code, is a `LagoonFunction`.
//! Methods always take their receiver as the explicit first argument; a
//! `Bound` callable is the call-site adapter that supplies it.

use std::fmt;
use std::sync::Arc;

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use crate::value::Value;

/// Builtin without a receiver (`println`, `type`, static natives).
pub type NativeFunction = fn(&Runtime, &[Value]) -> RuntimeResult<Value>;

/// Builtin method: receiver first, then the call arguments.
pub type NativeMethod = fn(&Runtime, &Value, &[Value]) -> RuntimeResult<Value>;

pub type ClosureFn = dyn Fn(&Runtime, &[Value]) -> RuntimeResult<Value> + Send + Sync;

// ═══════════════════════════════════════════════════════════════
// Callable
// ═══════════════════════════════════════════════════════════════

#[derive(Clone)]
pub enum Callable {
    Native(NativeFunction),
    /// Receives `args[0]` as the receiver.
    Method(NativeMethod),
    Closure(Arc<ClosureFn>),
    Bound {
        receiver: Value,
        method: LagoonFunction,
    },
}

impl Callable {
    fn kind(&self) -> &'static str {
        match self {
            Callable::Native(_) => "native",
            Callable::Method(_) => "method",
            Callable::Closure(_) => "closure",
            Callable::Bound { .. } => "bound",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// LagoonFunction
// ═══════════════════════════════════════════════════════════════

struct FunctionInner {
    name: String,
    /// Minimum argument count, checked before the body runs.
    arity: Option<usize>,
    callable: Callable,
}

#[derive(Clone)]
pub struct LagoonFunction {
    inner: Arc<FunctionInner>,
}

impl LagoonFunction {
    fn from_parts(name: &str, arity: Option<usize>, callable: Callable) -> Self {
        LagoonFunction {
            inner: Arc::new(FunctionInner {
                name: name.to_string(),
                arity,
                callable,
            }),
        }
    }

    pub fn native(name: &str, f: NativeFunction) -> Self {
        Self::from_parts(name, None, Callable::Native(f))
    }

    pub fn method(name: &str, f: NativeMethod) -> Self {
        Self::from_parts(name, Some(1), Callable::Method(f))
    }

    pub fn closure<F>(name: &str, arity: Option<usize>, f: F) -> Self
    where
        F: Fn(&Runtime, &[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(name, arity, Callable::Closure(Arc::new(f)))
    }

    /// Fix `receiver` as the first argument of every call to `method`.
    pub fn bound(receiver: Value, method: LagoonFunction) -> Self {
        let name = method.name().to_string();
        let arity = method.arity().map(|n| n.saturating_sub(1));
        Self::from_parts(&name, arity, Callable::Bound { receiver, method })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn arity(&self) -> Option<usize> {
        self.inner.arity
    }

    pub fn callable(&self) -> &Callable {
        &self.inner.callable
    }

    pub fn ptr_eq(&self, other: &LagoonFunction) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn invoke(&self, runtime: &Runtime, args: &[Value]) -> RuntimeResult<Value> {
        if let Some(expected) = self.inner.arity {
            if args.len() < expected {
                return Err(RuntimeError::Arity {
                    name: self.inner.name.clone(),
                    expected: expected.to_string(),
                    received: args.len(),
                });
            }
        }
        match &self.inner.callable {
            Callable::Native(f) => f(runtime, args),
            Callable::Method(f) => match args.split_first() {
                Some((receiver, rest)) => f(runtime, receiver, rest),
                None => Err(RuntimeError::Arity {
                    name: self.inner.name.clone(),
                    expected: "1".to_string(),
                    received: 0,
                }),
            },
            Callable::Closure(f) => f(runtime, args),
            Callable::Bound { receiver, method } => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(receiver.clone());
                full.extend_from_slice(args);
                method.invoke(runtime, &full)
            }
        }
    }
}

impl fmt::Debug for LagoonFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LagoonFunction({}, {}, arity={:?})",
            self.inner.name,
            self.inner.callable.kind(),
            self.inner.arity
        )
    }
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
