//! Lagoon Runtime Library
//!
//! Runtime support for compiled Lagoon programs. Compiled code hands every
//! value to this crate as a [`Value`] and calls back into it for the
//! operations the host platform does not provide natively:
//!
//! - `type(value)` and the `in` / `not in` operators ([`type_name`],
//!   [`contains`], [`not_contains`])
//! - the `for ... in` loop adapter ([`for_each`])
//! - method calls on built-in and user-defined types, resolved through
//!   per-type extension tables ([`Runtime::call_method`],
//!   [`Runtime::register_method`])
//! - `println` / `print` ([`println`], [`print`])
//!
//! # Method Resolution
//!
//! A method call on a receiver looks in the extension tables first, named
//! object type before its built-in kind, then falls back to the host-native
//! methods of the kind. A [`Runtime`] installs the standard extension set
//! on `Array`, `String` and `Number` when it is created.
//!
//! # Sharing
//!
//! Arrays and objects are shared handles: cloning a [`Value`] clones the
//! handle, and mutation through one handle is visible through all of them.
//! Every type here is `Send + Sync`; [`Runtime::global`] is the
//! process-wide instance compiled programs use by default.

pub mod array;
pub mod builtins;
pub mod closure;
pub mod config;
pub mod error;
pub mod host;
pub mod map;
pub mod number;
pub mod output;
pub mod registry;
pub mod runtime;
pub mod string;
pub mod value;

// Re-export core types for convenience
pub use array::LagoonArray;
pub use closure::{Callable, LagoonFunction};
pub use config::{MembershipFallback, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use map::LagoonObject;
pub use output::{BufferSink, OutputSink, StdoutSink};
pub use registry::{MethodKind, MethodRegistry};
pub use runtime::Runtime;
pub use value::{TypeKey, TypeTag, Value};

// Re-export the builtins compiled code calls by name
pub use builtins::{contains, for_each, global, not_contains, print, println, type_name};
