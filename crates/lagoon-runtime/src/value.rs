//! Tagged union `Value` for Lagoon runtime values.
//!
//! Scalars are stored inline. Arrays, objects and functions are shared
//! handles: cloning a `Value` clones the handle, never the contents, so two
//! clones of an array observe each other's mutations.

use std::fmt;
use std::sync::Arc;

use crate::array::LagoonArray;
use crate::closure::LagoonFunction;
use crate::map::LagoonObject;

// ═══════════════════════════════════════════════════════════════
// Type tags
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    Function,
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::Object,
        TypeTag::Function,
    ];

    /// Kind name the host reports for this tag, before any renaming.
    /// Arrays and objects share `"object"`.
    pub fn host_name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array | TypeTag::Object => "object",
            TypeTag::Function => "function",
        }
    }

    /// Name of the type as written in source (`Number.zero()`), also used in
    /// diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            TypeTag::Null => "Null",
            TypeTag::Bool => "Bool",
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Array => "Array",
            TypeTag::Object => "Object",
            TypeTag::Function => "Function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key of a type descriptor: a built-in tag or a type declared by the
/// compiled program (a struct name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Builtin(TypeTag),
    Named(Arc<str>),
}

impl From<TypeTag> for TypeKey {
    fn from(tag: TypeTag) -> Self {
        TypeKey::Builtin(tag)
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        TypeKey::Named(Arc::from(name))
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        TypeKey::Named(Arc::from(name))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Builtin(tag) => write!(f, "{}", tag),
            TypeKey::Named(name) => f.write_str(name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Value
// ═══════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    Array(LagoonArray),
    Object(LagoonObject),
    Function(LagoonFunction),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(LagoonArray::from_vec(items))
    }

    /// A function value backed by a Rust closure. Calls with fewer than
    /// `arity` arguments fail before reaching `f`.
    pub fn closure<F>(name: &str, arity: usize, f: F) -> Self
    where
        F: Fn(&crate::Runtime, &[Value]) -> crate::RuntimeResult<Value> + Send + Sync + 'static,
    {
        Value::Function(LagoonFunction::closure(name, Some(arity), f))
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
            Value::Function(_) => TypeTag::Function,
        }
    }

    /// Name reported by the `type()` operator.
    pub fn type_name(&self) -> &'static str {
        crate::builtins::type_name(self)
    }

    /// Descriptor keys consulted for method dispatch, most specific first.
    pub fn type_keys(&self) -> Vec<TypeKey> {
        let builtin = TypeKey::Builtin(self.tag());
        match self {
            Value::Object(obj) => match obj.type_name() {
                Some(name) => vec![TypeKey::Named(name), builtin],
                None => vec![builtin],
            },
            _ => vec![builtin],
        }
    }

    /// Label used in diagnostics: the declared type name for named objects,
    /// the tag label otherwise.
    pub fn type_label(&self) -> String {
        match self {
            Value::Object(obj) => match obj.type_name() {
                Some(name) => name.to_string(),
                None => TypeTag::Object.label().to_string(),
            },
            _ => self.tag().label().to_string(),
        }
    }

    /// `false`, `null`, `0`, `NaN` and `""` are falsy; everything else,
    /// including empty arrays and objects, is truthy.
    pub fn truthiness(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&LagoonArray> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&LagoonObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&LagoonFunction> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<LagoonArray> for Value {
    fn from(arr: LagoonArray) -> Self {
        Value::Array(arr)
    }
}

impl From<LagoonObject> for Value {
    fn from(obj: LagoonObject) -> Self {
        Value::Object(obj)
    }
}

impl From<LagoonFunction> for Value {
    fn from(func: LagoonFunction) -> Self {
        Value::Function(func)
    }
}

// ═══════════════════════════════════════════════════════════════
// Formatting
// ═══════════════════════════════════════════════════════════════

/// Format a number the way the host prints it: integral values carry no
/// decimal point (`3`, not `3.0`), non-finite values use host spelling, and
/// magnitudes outside `[1e-6, 1e21)` switch to exponent form (`1e+21`,
/// `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }
    format!("{}", n)
}

/// Display marker for a handle already being printed further up the stack.
fn cycle_marker(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "{...}",
        _ => "[...]",
    }
}

/// Writes `value`, tracking the composite handles on the current path in
/// `open` so a value that contains itself prints a marker instead of
/// recursing forever.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, open: &mut Vec<usize>) -> fmt::Result {
    let addr = match value {
        Value::Array(arr) => arr.addr(),
        Value::Object(obj) => obj.addr(),
        _ => return write_scalar(f, value),
    };
    if open.contains(&addr) {
        return f.write_str(cycle_marker(value));
    }
    open.push(addr);
    let result = match value {
        Value::Array(arr) => {
            write!(f, "[")?;
            for (i, v) in arr.snapshot().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, v, open)?;
            }
            write!(f, "]")
        }
        Value::Object(obj) => {
            if let Some(name) = obj.type_name() {
                write!(f, "{} ", name)?;
            }
            write!(f, "{{")?;
            for (i, (k, v)) in obj.entries().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", k)?;
                write_value(f, v, open)?;
            }
            write!(f, "}}")
        }
        _ => write_scalar(f, value),
    };
    open.pop();
    result
}

fn write_scalar(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", format_number(*n)),
        Value::String(s) => f.write_str(s),
        Value::Function(func) => write!(f, "<{}>", func.name()),
        Value::Array(_) | Value::Object(_) => f.write_str(cycle_marker(value)),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "Value({}, {:?})", self.tag(), s),
            _ => write!(f, "Value({}, {})", self.tag(), self),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Equality
// ═══════════════════════════════════════════════════════════════

/// Host-default equality: scalars by value (IEEE-754 for numbers, so
/// `NaN != NaN`), arrays, objects and functions by identity. Different tags
/// are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Equality used by membership (`in`, `includes`): host-default equality
    /// except that `NaN` matches `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
