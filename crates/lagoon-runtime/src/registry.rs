//! Per-type extension method tables.
//!
//! Each type key owns one descriptor holding two tables: instance methods,
//! resolved against a receiver, and static methods, resolved against the
//! type itself. Registering a name that already exists in a table replaces
//! the previous entry; the last registration wins.

use indexmap::IndexMap;

use crate::closure::LagoonFunction;
use crate::value::TypeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Instance,
    Static,
}

impl MethodKind {
    pub fn from_instance_flag(is_instance_method: bool) -> Self {
        if is_instance_method {
            MethodKind::Instance
        } else {
            MethodKind::Static
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// MethodTable
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    instance: IndexMap<String, LagoonFunction>,
    statics: IndexMap<String, LagoonFunction>,
}

impl MethodTable {
    fn sub(&self, kind: MethodKind) -> &IndexMap<String, LagoonFunction> {
        match kind {
            MethodKind::Instance => &self.instance,
            MethodKind::Static => &self.statics,
        }
    }

    fn sub_mut(&mut self, kind: MethodKind) -> &mut IndexMap<String, LagoonFunction> {
        match kind {
            MethodKind::Instance => &mut self.instance,
            MethodKind::Static => &mut self.statics,
        }
    }

    /// Returns the entry that was replaced, if any.
    pub fn insert(
        &mut self,
        kind: MethodKind,
        name: &str,
        method: LagoonFunction,
    ) -> Option<LagoonFunction> {
        // IndexMap::insert keeps the original slot, so a replaced method
        // stays at its first registration position.
        self.sub_mut(kind).insert(name.to_string(), method)
    }

    pub fn get(&self, kind: MethodKind, name: &str) -> Option<&LagoonFunction> {
        self.sub(kind).get(name)
    }

    /// Method names in registration order.
    pub fn names(&self, kind: MethodKind) -> Vec<String> {
        self.sub(kind).keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instance.len() + self.statics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════
// TypeDescriptor / MethodRegistry
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    methods: MethodTable,
}

impl TypeDescriptor {
    pub fn new(key: TypeKey) -> Self {
        TypeDescriptor {
            key,
            methods: MethodTable::default(),
        }
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

/// Every descriptor known to a runtime. Descriptors are created on first
/// registration and never removed.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    types: IndexMap<TypeKey, TypeDescriptor>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        key: TypeKey,
        name: &str,
        kind: MethodKind,
        method: LagoonFunction,
    ) -> Option<LagoonFunction> {
        self.types
            .entry(key.clone())
            .or_insert_with(|| TypeDescriptor::new(key))
            .methods
            .insert(kind, name, method)
    }

    pub fn lookup(&self, key: &TypeKey, name: &str, kind: MethodKind) -> Option<&LagoonFunction> {
        self.types.get(key)?.methods.get(kind, name)
    }

    pub fn descriptor(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.types.get(key)
    }

    pub fn method_names(&self, key: &TypeKey, kind: MethodKind) -> Vec<String> {
        self.types
            .get(key)
            .map(|d| d.methods.names(kind))
            .unwrap_or_default()
    }

    pub fn type_keys(&self) -> Vec<TypeKey> {
        self.types.keys().cloned().collect()
    }

    /// Total number of registered methods across all descriptors.
    pub fn len(&self) -> usize {
        self.types.values().map(|d| d.methods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
