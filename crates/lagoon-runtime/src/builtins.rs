//! Builtins called directly by compiled code.
//!
//! `type()`, the `in` / `not in` operators, the `for ... in` loop adapter,
//! and `println` / `print`, plus the table through which compiled code
//! looks those up by name.

use crate::closure::{LagoonFunction, NativeFunction};
use crate::config::MembershipFallback;
use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use crate::value::{TypeTag, Value};

// ═══════════════════════════════════════════════════════════════
// Type inspection
// ═══════════════════════════════════════════════════════════════

/// Tags whose source-language name differs from the host kind name.
/// Consulted before `TypeTag::host_name`; add entries here rather than
/// changing the host names.
const TYPE_RENAMES: &[(TypeTag, &str)] = &[(TypeTag::Bool, "bool")];

/// Name reported by `type(value)`: `"bool"`, `"number"`, `"string"`,
/// `"object"` (arrays and objects), `"function"` or `"null"`.
pub fn type_name(value: &Value) -> &'static str {
    let tag = value.tag();
    TYPE_RENAMES
        .iter()
        .find(|(renamed, _)| *renamed == tag)
        .map(|(_, name)| *name)
        .unwrap_or_else(|| tag.host_name())
}

// ═══════════════════════════════════════════════════════════════
// Membership
// ═══════════════════════════════════════════════════════════════

/// `needle in haystack`.
///
/// - two strings: substring test;
/// - array haystack: some element equals `needle`. Equality is the host
///   default: scalars by value, arrays/objects/functions by identity, so
///   `[1] in [[1]]` is false unless it is the very same array;
/// - anything else: `UnsupportedOperands`, or `false` when the runtime is
///   configured with `MembershipFallback::False`.
pub fn contains(rt: &Runtime, needle: &Value, haystack: &Value) -> RuntimeResult<bool> {
    membership(rt, "in", needle, haystack)
}

/// `needle not in haystack`: the negation of [`contains`], with the same
/// error for unsupported operands.
pub fn not_contains(rt: &Runtime, needle: &Value, haystack: &Value) -> RuntimeResult<bool> {
    membership(rt, "not in", needle, haystack).map(|found| !found)
}

fn membership(
    rt: &Runtime,
    op: &'static str,
    needle: &Value,
    haystack: &Value,
) -> RuntimeResult<bool> {
    match (needle, haystack) {
        (Value::String(n), Value::String(h)) => Ok(h.contains(&**n)),
        (_, Value::Array(items)) => Ok(items.contains(needle)),
        _ => match rt.config().membership_fallback {
            MembershipFallback::False => Ok(false),
            MembershipFallback::Error => Err(RuntimeError::UnsupportedOperands {
                op,
                left: type_name(needle).to_string(),
                right: type_name(haystack).to_string(),
            }),
        },
    }
}

// ═══════════════════════════════════════════════════════════════
// Iteration
// ═══════════════════════════════════════════════════════════════

/// Loop adapter for `for item in target`: calls `visitor(element, index)`
/// once per element in ascending index order. Iterates over the elements
/// present at entry; the first visitor error ends the loop and is returned.
pub fn for_each(rt: &Runtime, target: &Value, visitor: &Value) -> RuntimeResult<()> {
    let items = match target {
        Value::Array(arr) => arr.snapshot(),
        other => return Err(RuntimeError::NotIterable(other.type_label())),
    };
    if visitor.as_function().is_none() {
        return Err(RuntimeError::NotCallable(visitor.type_label()));
    }
    for (index, item) in items.into_iter().enumerate() {
        rt.call(visitor, &[item, Value::from(index)])?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// Print builtins
// ═══════════════════════════════════════════════════════════════

/// Writes each value on its own line, in argument order. Sink failures are
/// returned as `RuntimeError::Output`; lines already written stay written.
pub fn println(rt: &Runtime, values: &[Value]) -> RuntimeResult<Value> {
    for value in values {
        rt.output().write_line(&value.to_string())?;
    }
    Ok(Value::Null)
}

/// Same operation as [`println`] under its second source-language name.
pub fn print(rt: &Runtime, values: &[Value]) -> RuntimeResult<Value> {
    println(rt, values)
}

fn type_of(rt: &Runtime, args: &[Value]) -> RuntimeResult<Value> {
    rt.check_arity("type", 1, args)?;
    Ok(Value::from(type_name(&args[0])))
}

// ═══════════════════════════════════════════════════════════════
// Global function table
// ═══════════════════════════════════════════════════════════════

pub const GLOBAL_NAMES: [&str; 3] = ["println", "print", "type"];

/// Function value bound to a global name, if the runtime defines one.
pub fn global(name: &str) -> Option<Value> {
    let f: NativeFunction = match name {
        "println" => println,
        "print" => print,
        "type" => type_of,
        _ => return None,
    };
    Some(Value::Function(LagoonFunction::native(name, f)))
}

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::map::LagoonObject;
    use crate::output::BufferSink;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn captured() -> (Runtime, Arc<BufferSink>) {
        let sink = Arc::new(BufferSink::new());
        let rt = Runtime::with_output(RuntimeConfig::default(), Arc::clone(&sink));
        (rt, sink)
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&Value::from(true)), "bool");
        assert_eq!(type_name(&Value::from(3)), "number");
        assert_eq!(type_name(&Value::from("x")), "string");
        assert_eq!(type_name(&Value::array(vec![Value::from(1)])), "object");
        assert_eq!(type_name(&Value::Object(LagoonObject::named("Point"))), "object");
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&global("print").unwrap()), "function");
    }

    #[test]
    fn test_type_names_never_empty() {
        for tag in TypeTag::ALL {
            let renamed = TYPE_RENAMES.iter().find(|(t, _)| *t == tag).map(|(_, n)| *n);
            assert!(!renamed.unwrap_or_else(|| tag.host_name()).is_empty());
        }
    }

    #[test]
    fn test_contains_strings() {
        let rt = Runtime::new();
        let hay = Value::from("lagoon");
        assert!(contains(&rt, &Value::from("goo"), &hay).unwrap());
        assert!(contains(&rt, &Value::from(""), &hay).unwrap());
        assert!(!contains(&rt, &Value::from("pond"), &hay).unwrap());
        // substring relation, not the reverse
        assert!(!contains(&rt, &hay, &Value::from("goo")).unwrap());
    }

    #[test]
    fn test_contains_arrays() {
        let rt = Runtime::new();
        let inner = Value::array(vec![Value::from(1)]);
        let hay = Value::array(vec![Value::from(1), Value::from("two"), inner.clone()]);
        assert!(contains(&rt, &Value::from(1), &hay).unwrap());
        assert!(contains(&rt, &Value::from("two"), &hay).unwrap());
        assert!(!contains(&rt, &Value::from("1"), &hay).unwrap());
        assert!(contains(&rt, &inner, &hay).unwrap());
        assert!(!contains(&rt, &Value::array(vec![Value::from(1)]), &hay).unwrap());
        assert!(!contains(&rt, &Value::from(1), &Value::array(vec![])).unwrap());
        assert!(not_contains(&rt, &Value::from(5), &hay).unwrap());
    }

    #[test]
    fn test_contains_unsupported() {
        let rt = Runtime::new();
        let err = contains(&rt, &Value::from(1), &Value::from(12)).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operand kinds for `in`: number and number");
        let err = not_contains(&rt, &Value::from(1), &Value::from("12")).unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperands { op: "not in", .. }));
    }

    #[test]
    fn test_contains_fallback_false() {
        let config = RuntimeConfig {
            membership_fallback: MembershipFallback::False,
            ..RuntimeConfig::default()
        };
        let rt = Runtime::with_output(config, BufferSink::new());
        assert!(!contains(&rt, &Value::from(1), &Value::from(12)).unwrap());
        assert!(not_contains(&rt, &Value::from(1), &Value::from(12)).unwrap());
    }

    #[test]
    fn test_for_each_order_and_index() {
        let rt = Runtime::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let visitor = Value::closure("visit", 1, move |_, args| {
            sink.lock().unwrap().push((args[0].clone(), args[1].clone()));
            Ok(Value::Null)
        });
        let target = Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        for_each(&rt, &target, &visitor).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (Value::from(1), Value::from(0)));
        assert_eq!(seen[1], (Value::from(2), Value::from(1)));
        assert_eq!(seen[2], (Value::from(3), Value::from(2)));
    }

    #[test]
    fn test_for_each_snapshot() {
        let rt = Runtime::new();
        let target = Value::array(vec![Value::from(1), Value::from(2)]);
        let handle = target.clone();
        let visits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&visits);
        let visitor = Value::closure("grow", 1, move |_, _| {
            *counter.lock().unwrap() += 1;
            if let Some(arr) = handle.as_array() {
                arr.push(Value::Null);
            }
            Ok(Value::Null)
        });
        for_each(&rt, &target, &visitor).unwrap();
        assert_eq!(*visits.lock().unwrap(), 2);
        assert_eq!(target.as_array().map(|a| a.len()), Some(4));
    }

    #[test]
    fn test_for_each_errors() {
        let rt = Runtime::new();
        let visitor = Value::closure("v", 1, |_, _| Ok(Value::Null));
        let err = for_each(&rt, &Value::from("abc"), &visitor).unwrap_err();
        assert_eq!(err.to_string(), "unable to iterate over value of type String");

        let err = for_each(&rt, &Value::array(vec![]), &Value::from(1)).unwrap_err();
        assert!(matches!(err, RuntimeError::NotCallable(_)));

        let failing = Value::closure("v", 1, |_, args| {
            if args[0] == Value::from(2) {
                Err(RuntimeError::raised("stop at 2"))
            } else {
                Ok(Value::Null)
            }
        });
        let target = Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let err = for_each(&rt, &target, &failing).unwrap_err();
        assert_eq!(err.to_string(), "stop at 2");
    }

    #[test]
    fn test_println_one_line_per_argument() {
        let (rt, sink) = captured();
        let out = println(
            &rt,
            &[Value::from("a"), Value::from(2.5), Value::array(vec![Value::from(true)])],
        )
        .unwrap();
        assert_eq!(out, Value::Null);
        print(&rt, &[Value::Null]).unwrap();
        println(&rt, &[]).unwrap();
        assert_eq!(sink.lines(), vec!["a", "2.5", "[true]", "null"]);
    }

    struct BrokenSink;

    impl crate::output::OutputSink for BrokenSink {
        fn write_line(&self, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_println_sink_failure_propagates() {
        let rt = Runtime::with_output(RuntimeConfig::default(), BrokenSink);
        let err = println(&rt, &[Value::from(1)]).unwrap_err();
        assert!(matches!(err, RuntimeError::Output(_)));
    }

    #[test]
    fn test_globals() {
        let (rt, sink) = captured();
        for name in GLOBAL_NAMES {
            assert!(global(name).is_some(), "missing global {}", name);
        }
        assert!(global("require").is_none());

        let type_fn = global("type").unwrap();
        assert_eq!(rt.call(&type_fn, &[Value::from(false)]).unwrap(), Value::from("bool"));
        assert!(rt.call(&type_fn, &[]).is_err());

        let print_fn = global("print").unwrap();
        rt.call(&print_fn, &[Value::from("x"), Value::from("y")]).unwrap();
        assert_eq!(sink.lines(), vec!["x", "y"]);
    }
}
