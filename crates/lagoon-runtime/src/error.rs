//! Error type shared by every runtime entry point.
//!
//! Failures surface synchronously to the immediate caller. Nothing in the
//! runtime retries or swallows an error, including errors raised inside
//! callbacks handed to `each`, `first`, `tap` or `for_each`.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `in` / `not in` received an operand combination it has no rule for.
    #[error("unsupported operand kinds for `{op}`: {left} and {right}")]
    UnsupportedOperands {
        op: &'static str,
        left: String,
        right: String,
    },

    /// Neither the extension tables nor the host type define the method.
    #[error("undefined method: {type_name}.{method}()")]
    UndefinedMethod { type_name: String, method: String },

    #[error("unable to iterate over value of type {0}")]
    NotIterable(String),

    #[error("value of type {0} is not callable")]
    NotCallable(String),

    #[error("{name}() expected {expected} arguments, received {received}")]
    Arity {
        name: String,
        expected: String,
        received: usize,
    },

    #[error("{name}() expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// Raised by compiled code from inside a callback.
    #[error("{0}")]
    Raised(String),

    #[error("output sink failed: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn raised(message: impl Into<String>) -> Self {
        RuntimeError::Raised(message.into())
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
