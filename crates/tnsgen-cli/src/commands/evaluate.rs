//! The `evaluate` command slot
//!
//! Accepted for interface compatibility with the expression pipeline. No
//! evaluation semantics exist here, and the command reports that explicitly
//! rather than succeeding as a no-op.

use anyhow::Result;
use tracing::debug;

use tnsgen_core::TnsError;

pub fn run(expression: &str, schedule: &str) -> Result<()> {
    debug!(expression, schedule, "evaluate requested");
    Err(TnsError::Unimplemented("expression evaluation").into())
}
