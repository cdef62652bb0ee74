//! String entries of the extension set.
//!
//! Strings are immutable; every method returns a new value. Non-string
//! arguments are converted through their display form.

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use crate::value::{TypeTag, Value};

pub(crate) fn install(runtime: &Runtime) {
    runtime.install_native(TypeTag::String, "contains", string_contains);
    runtime.install_native(TypeTag::String, "startsWith", string_starts_with);
    runtime.install_native(TypeTag::String, "endsWith", string_ends_with);
    runtime.install_native(TypeTag::String, "finish", string_finish);
    runtime.install_native(TypeTag::String, "append", string_append);
    runtime.install_native(TypeTag::String, "tap", string_tap);
    runtime.install_native(TypeTag::String, "toUpper", string_to_upper);
    runtime.install_native(TypeTag::String, "toLower", string_to_lower);
}

fn expect_str<'a>(name: &str, this: &'a Value) -> RuntimeResult<&'a str> {
    this.as_str().ok_or_else(|| RuntimeError::TypeMismatch {
        name: name.to_string(),
        expected: "a string receiver",
        found: this.type_label(),
    })
}

fn string_contains(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.contains", 1, args)?;
    let s = expect_str("String.contains", this)?;
    Ok(Value::Bool(s.contains(args[0].to_string().as_str())))
}

fn string_starts_with(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.startsWith", 1, args)?;
    let s = expect_str("String.startsWith", this)?;
    Ok(Value::Bool(s.starts_with(args[0].to_string().as_str())))
}

fn string_ends_with(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.endsWith", 1, args)?;
    let s = expect_str("String.endsWith", this)?;
    Ok(Value::Bool(s.ends_with(args[0].to_string().as_str())))
}

/// Append `suffix` unless the string already ends with it.
fn string_finish(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.finish", 1, args)?;
    let s = expect_str("String.finish", this)?;
    let suffix = args[0].to_string();
    if s.ends_with(&suffix) {
        Ok(this.clone())
    } else {
        Ok(Value::from(format!("{}{}", s, suffix)))
    }
}

fn string_append(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.append", 1, args)?;
    let s = expect_str("String.append", this)?;
    Ok(Value::from(format!("{}{}", s, args[0])))
}

/// Hand the string to `cb` for side effects; the expression keeps its value.
fn string_tap(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity_range("String.tap", 0, 1, args)?;
    expect_str("String.tap", this)?;
    if let Some(cb) = args.first() {
        rt.call(cb, &[this.clone()])?;
    }
    Ok(this.clone())
}

fn string_to_upper(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.toUpper", 0, args)?;
    Ok(Value::from(expect_str("String.toUpper", this)?.to_uppercase()))
}

fn string_to_lower(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("String.toLower", 0, args)?;
    Ok(Value::from(expect_str("String.toLower", this)?.to_lowercase()))
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
