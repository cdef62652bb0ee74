//! Number entries of the extension set.

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use crate::value::{TypeTag, Value};

pub(crate) fn install(runtime: &Runtime) {
    runtime.install_native(TypeTag::Number, "isInteger", number_is_integer);
    runtime.install_native(TypeTag::Number, "isFloat", number_is_float);
    runtime.install_native(TypeTag::Number, "toFixed", number_to_fixed);
}

fn expect_number(name: &str, value: &Value) -> RuntimeResult<f64> {
    value.as_number().ok_or_else(|| RuntimeError::TypeMismatch {
        name: name.to_string(),
        expected: "a number",
        found: value.type_label(),
    })
}

fn number_is_integer(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Number.isInteger", 0, args)?;
    let n = expect_number("Number.isInteger", this)?;
    Ok(Value::Bool(n.is_finite() && n.fract() == 0.0))
}

fn number_is_float(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("Number.isFloat", 0, args)?;
    let n = expect_number("Number.isFloat", this)?;
    Ok(Value::Bool(n.is_finite() && n.fract() != 0.0))
}

/// Round to `digits` decimals. No argument (or `0`) truncates toward zero
/// rather than rounding. Negative digit counts are treated as `0`.
fn number_to_fixed(rt: &Runtime, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity_range("Number.toFixed", 0, 1, args)?;
    let n = expect_number("Number.toFixed", this)?;
    let digits = match args.first() {
        Some(d) => expect_number("Number.toFixed", d)?.trunc().clamp(0.0, 100.0) as usize,
        None => 0,
    };
    if digits == 0 || !n.is_finite() {
        return Ok(Value::Number(n.trunc()));
    }
    let rounded = format!("{:.*}", digits, n).parse::<f64>().unwrap_or(n);
    Ok(Value::Number(rounded))
}
