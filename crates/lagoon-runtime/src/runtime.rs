//! The runtime: extension tables, method dispatch, and the output sink.
//!
//! Extension methods live in tables owned by a `Runtime`, never in shared
//! host definitions. Dispatch for `value.name(...)` consults the receiver's
//! instance tables (named type first, then built-in tag) and falls back to
//! the host-native methods in [`crate::host`].
//!
//! Registration takes the write lock for the duration of a single insert.
//! Dispatch clones the resolved function out of the read lock before
//! invoking it, so callbacks may register or dispatch themselves.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::closure::{LagoonFunction, NativeMethod};
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::host;
use crate::output::{OutputSink, StdoutSink};
use crate::registry::{MethodKind, MethodRegistry};
use crate::value::{TypeKey, TypeTag, Value};

static GLOBAL: Lazy<Runtime> = Lazy::new(|| Runtime::with_config(RuntimeConfig::from_env()));

pub struct Runtime {
    config: RuntimeConfig,
    registry: RwLock<MethodRegistry>,
    output: Box<dyn OutputSink>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Default configuration, standard output, extension set installed.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self::with_output(config, StdoutSink)
    }

    pub fn with_output(config: RuntimeConfig, output: impl OutputSink + 'static) -> Self {
        let runtime = Self::without_extensions(config, output);
        runtime.install_extensions();
        runtime
    }

    /// A runtime whose values only have their host-native methods.
    pub fn without_extensions(config: RuntimeConfig, output: impl OutputSink + 'static) -> Self {
        Runtime {
            config,
            registry: RwLock::new(MethodRegistry::new()),
            output: Box::new(output),
        }
    }

    /// Process-wide runtime, configured from the environment and with the
    /// extension set installed on first access.
    pub fn global() -> &'static Runtime {
        &GLOBAL
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn output(&self) -> &dyn OutputSink {
        self.output.as_ref()
    }

    fn install_extensions(&self) {
        crate::array::install(self);
        crate::string::install(self);
        crate::number::install(self);
        debug!(methods = self.registry().len(), "extension set installed");
    }

    fn registry(&self) -> RwLockReadGuard<'_, MethodRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, MethodRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ═══════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════

    /// Attach `callback` to `target` under `name`, as an instance method
    /// (receiver passed as the first argument) or a static method (no
    /// receiver). Replaces any previous entry of the same kind and name.
    pub fn register_method(
        &self,
        target: impl Into<TypeKey>,
        name: &str,
        callback: Value,
        is_instance_method: bool,
    ) -> RuntimeResult<()> {
        let method = match callback {
            Value::Function(f) => f,
            other => return Err(RuntimeError::NotCallable(other.type_label())),
        };
        let kind = MethodKind::from_instance_flag(is_instance_method);
        self.insert(target.into(), name, kind, method);
        Ok(())
    }

    pub(crate) fn install_native(&self, tag: TypeTag, name: &str, f: NativeMethod) {
        self.insert(
            TypeKey::Builtin(tag),
            name,
            MethodKind::Instance,
            LagoonFunction::method(name, f),
        );
    }

    fn insert(&self, key: TypeKey, name: &str, kind: MethodKind, method: LagoonFunction) {
        let replaced = self
            .registry_mut()
            .register(key.clone(), name, kind, method)
            .is_some();
        debug!(type_key = %key, method = name, ?kind, replaced, "method registered");
    }

    /// Names registered on `target`, in registration order.
    pub fn registered_methods(&self, target: impl Into<TypeKey>, kind: MethodKind) -> Vec<String> {
        self.registry().method_names(&target.into(), kind)
    }

    // ═══════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════

    /// Extension instance method for `receiver`, named type before tag.
    pub fn lookup_instance(&self, receiver: &Value, name: &str) -> Option<LagoonFunction> {
        let keys = receiver.type_keys();
        let registry = self.registry();
        keys.iter().find_map(|key| registry.lookup(key, name, MethodKind::Instance).cloned())
    }

    pub fn lookup_static(&self, target: impl Into<TypeKey>, name: &str) -> Option<LagoonFunction> {
        self.registry()
            .lookup(&target.into(), name, MethodKind::Static)
            .cloned()
    }

    /// Extension table first, host-native method second.
    pub fn resolve_method(&self, receiver: &Value, name: &str) -> Option<LagoonFunction> {
        if let Some(method) = self.lookup_instance(receiver, name) {
            trace!(receiver = %receiver.type_label(), method = name, "dispatch: extension");
            return Some(method);
        }
        let native = host::resolve(receiver.tag(), name)?;
        trace!(receiver = %receiver.type_label(), method = name, "dispatch: host");
        Some(LagoonFunction::method(name, native))
    }

    // ═══════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════

    pub fn call(&self, callee: &Value, args: &[Value]) -> RuntimeResult<Value> {
        match callee {
            Value::Function(f) => f.invoke(self, args),
            other => Err(RuntimeError::NotCallable(other.type_label())),
        }
    }

    /// `receiver.name(args...)`.
    pub fn call_method(&self, receiver: &Value, name: &str, args: &[Value]) -> RuntimeResult<Value> {
        let method = self
            .resolve_method(receiver, name)
            .ok_or_else(|| undefined_method(receiver.type_label(), name))?;
        LagoonFunction::bound(receiver.clone(), method).invoke(self, args)
    }

    /// `Type.name(args...)`.
    pub fn call_static(
        &self,
        target: impl Into<TypeKey>,
        name: &str,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        let key = target.into();
        let method = self
            .lookup_static(key.clone(), name)
            .ok_or_else(|| undefined_method(key.to_string(), name))?;
        trace!(type_key = %key, method = name, "dispatch: static");
        method.invoke(self, args)
    }

    /// `receiver.name` as a first-class function with the receiver fixed.
    pub fn bind_method(&self, receiver: &Value, name: &str) -> RuntimeResult<Value> {
        let method = self
            .resolve_method(receiver, name)
            .ok_or_else(|| undefined_method(receiver.type_label(), name))?;
        Ok(Value::Function(LagoonFunction::bound(receiver.clone(), method)))
    }

    // ═══════════════════════════════════════════════════════════
    // Arity
    // ═══════════════════════════════════════════════════════════

    pub fn check_arity(&self, name: &str, expected: usize, args: &[Value]) -> RuntimeResult<()> {
        self.check_arity_range(name, expected, expected, args)
    }

    /// Missing arguments always fail; surplus ones only under
    /// `strict_arity`.
    pub fn check_arity_range(
        &self,
        name: &str,
        min: usize,
        max: usize,
        args: &[Value],
    ) -> RuntimeResult<()> {
        let received = args.len();
        if received < min || (self.config.strict_arity && received > max) {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{} to {}", min, max)
            };
            return Err(RuntimeError::Arity {
                name: name.to_string(),
                expected,
                received,
            });
        }
        Ok(())
    }
}

fn undefined_method(type_name: String, method: &str) -> RuntimeError {
    RuntimeError::UndefinedMethod {
        type_name,
        method: method.to_string(),
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("methods", &self.registry().len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
