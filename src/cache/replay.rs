//! Replay Module
//!
//! Rebuilds an operation's call history from the counter and call logs an
//! [`InstrumentedCache`](crate::cache::InstrumentedCache) left in the store.

use std::fmt;

use serde::Serialize;

use crate::cache::{Operation, Store};
use crate::error::Result;

// == Trace ==
/// Recorded history of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Qualified operation name
    pub operation: String,
    /// Value of the call counter
    pub calls: i64,
    /// Calls present in both logs, oldest first
    pub entries: Vec<TraceEntry>,
}

/// A single recorded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Rendered argument tuple
    pub input: String,
    /// Rendered result
    pub output: String,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.calls == 1 { "time" } else { "times" };
        write!(f, "{} was called {} {}:", self.operation, self.calls, noun)?;
        for entry in &self.entries {
            write!(f, "\n{}{} -> {}", self.operation, entry.input, entry.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the call count and call logs of `op` and pairs them up.
///
/// Missing data never fails: an operation that was never called yields a
/// zero-call trace, and logs shorter than the counter only contribute the
/// indices present in both.
pub async fn replay(store: &dyn Store, op: Operation) -> Result<Trace> {
    let calls = store.counter(op.qualified_name()).await?;
    let inputs = store.range_read(&op.inputs_key(), 0, -1).await?;
    let outputs = store.range_read(&op.outputs_key(), 0, -1).await?;

    let recorded = usize::try_from(calls).unwrap_or(0);
    let entries = inputs
        .iter()
        .zip(&outputs)
        .take(recorded)
        .map(|(input, output)| TraceEntry {
            input: String::from_utf8_lossy(input).into_owned(),
            output: String::from_utf8_lossy(output).into_owned(),
        })
        .collect();

    Ok(Trace {
        operation: op.qualified_name().to_string(),
        calls,
        entries,
    })
}
