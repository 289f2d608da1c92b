//! Top-level boundary for internal contract violations.
//!
//! Drivers propagate [`InvariantViolation`] with `?`; the application hands
//! the result to [`settle`] once, which either crashes (debug builds) or logs
//! and degrades to "no result" (release builds).

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Panic with the violation message
    CrashFast,
    /// Log at error level and carry on without a result
    LogAndDegrade,
}

impl Default for ViolationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ViolationPolicy::CrashFast
        } else {
            ViolationPolicy::LogAndDegrade
        }
    }
}

/// Resolve a driver result according to `policy`.
pub fn settle<T>(result: Result<T, InvariantViolation>, policy: ViolationPolicy) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => match policy {
            ViolationPolicy::CrashFast => panic!("internal invariant violated: {violation}"),
            ViolationPolicy::LogAndDegrade => {
                error!(%violation, "internal invariant violated, continuing without a result");
                None
            }
        },
    }
}
