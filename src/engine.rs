//! Engine trait for wiring a session to an OSA scripting runtime.

use crate::error::OsaError;
use crate::types::Descriptor;

/// One unit of work handed to an engine: a script body, an optional
/// handler to invoke, and the packed arguments for that handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub source: String,
    pub call: Option<String>,
    pub args: Vec<Descriptor>,
}

impl ScriptRequest {
    /// Request that evaluates a script body top to bottom.
    pub fn eval(source: impl Into<String>) -> Self {
        Self { source: source.into(), call: None, args: Vec::new() }
    }

    /// Request that invokes a named handler with packed arguments.
    pub fn call(source: impl Into<String>, handler: impl Into<String>, args: Vec<Descriptor>) -> Self {
        Self { source: source.into(), call: Some(handler.into()), args }
    }
}

/// A scripting runtime that turns requests into result descriptors.
///
/// Implementations own compilation and execution entirely; errors they
/// report surface to callers unchanged.
pub trait ScriptEngine: Send + Sync {
    /// Runs a request to completion, returning the result descriptor.
    fn execute(&self, request: &ScriptRequest) -> Result<Descriptor, OsaError>;
}
