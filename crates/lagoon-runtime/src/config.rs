//! Runtime configuration.
//!
//! Configuration only selects policies; the dispatcher and builtins apply
//! them.

use std::env;

/// What `in` / `not in` do with operands that match no membership rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipFallback {
    /// Fail with `RuntimeError::UnsupportedOperands`.
    #[default]
    Error,
    /// Treat the pair as "not a member".
    False,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub membership_fallback: MembershipFallback,

    /// Reject surplus arguments to native methods. Missing arguments are
    /// always an error.
    pub strict_arity: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            membership_fallback: MembershipFallback::Error,
            strict_arity: true,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `LAGOON_MEMBERSHIP_FALLBACK` (`error` | `false`)
    /// and `LAGOON_STRICT_ARITY` (`0` / `false` disables). Unrecognised
    /// values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("LAGOON_MEMBERSHIP_FALLBACK") {
            if let Some(fallback) = parse_fallback(&raw) {
                config.membership_fallback = fallback;
            }
        }
        if let Ok(raw) = env::var("LAGOON_STRICT_ARITY") {
            if let Some(strict) = parse_flag(&raw) {
                config.strict_arity = strict;
            }
        }
        config
    }
}

fn parse_fallback(raw: &str) -> Option<MembershipFallback> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "error" => Some(MembershipFallback::Error),
        "false" => Some(MembershipFallback::False),
        _ => None,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
