//! Host-native methods of the built-in types.
//!
//! This is the behavior a value has before any extension is installed, and
//! what dispatch falls back to when no extension table defines a name. Some
//! of it mutates the receiver in place (`push`, `pop`, `reverse`); the
//! extension set overrides `reverse` with a copying variant.

use crate::closure::NativeMethod;
use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use crate::value::{format_number, TypeTag, Value};

/// Look up the host method `name` on values tagged `tag`.
pub fn resolve(tag: TypeTag, name: &str) -> Option<NativeMethod> {
    let method: NativeMethod = match (tag, name) {
        (TypeTag::Array, "length") => array_length,
        (TypeTag::Array, "push") => array_push,
        (TypeTag::Array, "pop") => array_pop,
        (TypeTag::Array, "reverse") => array_reverse,
        (TypeTag::Array, "includes") => array_includes,
        (TypeTag::Array, "indexOf") => array_index_of,

        (TypeTag::String, "length") => string_length,
        (TypeTag::String, "includes") => string_includes,
        (TypeTag::String, "toUpperCase") => string_to_upper_case,
        (TypeTag::String, "toLowerCase") => string_to_lower_case,
        (TypeTag::String, "startsWith") => string_starts_with,
        (TypeTag::String, "endsWith") => string_ends_with,
        (TypeTag::String, "trim") => string_trim,

        (TypeTag::Number, "toString") => number_to_string,
        _ => return None,
    };
    Some(method)
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_label(),
    }
}

// ═══════════════════════════════════════════════════════════════
// Array
// ═══════════════════════════════════════════════════════════════

fn array_length(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.length", 0, args)?;
    let arr = this.as_array().ok_or_else(|| mismatch("Array.length", "an array receiver", this))?;
    Ok(Value::from(arr.len()))
}

/// Appends every argument; returns the new length.
fn array_push(_: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    let arr = this.as_array().ok_or_else(|| mismatch("Array.push", "an array receiver", this))?;
    let mut len = arr.len();
    for v in args {
        len = arr.push(v.clone());
    }
    Ok(Value::from(len))
}

fn array_pop(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.pop", 0, args)?;
    let arr = this.as_array().ok_or_else(|| mismatch("Array.pop", "an array receiver", this))?;
    Ok(arr.pop().unwrap_or(Value::Null))
}

/// Reverses the receiver in place and returns it.
pub(crate) fn array_reverse(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.reverse", 0, args)?;
    let arr = this.as_array().ok_or_else(|| mismatch("Array.reverse", "an array receiver", this))?;
    arr.reverse_in_place();
    Ok(this.clone())
}

fn array_includes(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.includes", 1, args)?;
    let arr = this.as_array().ok_or_else(|| mismatch("Array.includes", "an array receiver", this))?;
    Ok(Value::Bool(arr.contains(&args[0])))
}

fn array_index_of(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Array.indexOf", 1, args)?;
    let arr = this.as_array().ok_or_else(|| mismatch("Array.indexOf", "an array receiver", this))?;
    Ok(match arr.index_of(&args[0]) {
        Some(i) => Value::from(i),
        None => Value::from(-1),
    })
}

// ═══════════════════════════════════════════════════════════════
// String
// ═══════════════════════════════════════════════════════════════

fn receiver_str<'a>(name: &str, this: &'a Value) -> RuntimeResult<&'a str> {
    this.as_str().ok_or_else(|| mismatch(name, "a string receiver", this))
}

/// Length in characters, not bytes.
fn string_length(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.length", 0, args)?;
    Ok(Value::from(receiver_str("String.length", this)?.chars().count()))
}

fn string_includes(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.includes", 1, args)?;
    let s = receiver_str("String.includes", this)?;
    Ok(Value::Bool(s.contains(args[0].to_string().as_str())))
}

fn string_to_upper_case(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.toUpperCase", 0, args)?;
    Ok(Value::from(receiver_str("String.toUpperCase", this)?.to_uppercase()))
}

fn string_to_lower_case(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.toLowerCase", 0, args)?;
    Ok(Value::from(receiver_str("String.toLowerCase", this)?.to_lowercase()))
}

fn string_starts_with(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.startsWith", 1, args)?;
    let s = receiver_str("String.startsWith", this)?;
    Ok(Value::Bool(s.starts_with(args[0].to_string().as_str())))
}

fn string_ends_with(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.endsWith", 1, args)?;
    let s = receiver_str("String.endsWith", this)?;
    Ok(Value::Bool(s.ends_with(args[0].to_string().as_str())))
}

fn string_trim(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.trim", 0, args)?;
    Ok(Value::from(receiver_str("String.trim", this)?.trim()))
}

// ═══════════════════════════════════════════════════════════════
// Number
// ═══════════════════════════════════════════════════════════════

fn number_to_string(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Number.toString", 0, args)?;
    let n = this
        .as_number()
        .ok_or_else(|| mismatch("Number.toString", "a number receiver", this))?;
    Ok(Value::from(format_number(n)))
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
