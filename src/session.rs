//! High-level scripting session — pack arguments, execute, unpack results.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::aedesc::{pack_value, unpack_value, UnpackOptions};
use crate::debug::{DebugEntry, DebugLog, ExecutionOutcome};
use crate::engine::{ScriptEngine, ScriptRequest};
use crate::error::OsaError;
use crate::types::{Descriptor, OsaValue};

/// Drives an engine through the descriptor codec.
///
/// Arguments are packed before the engine runs; results are unpacked
/// under the session's decode options. Engine failures pass through
/// unchanged.
pub struct ScriptSession<E> {
    engine: E,
    options: UnpackOptions,
    debug_log: Option<Arc<DebugLog>>,
}

impl<E: ScriptEngine> ScriptSession<E> {
    /// Creates a session with strict decoding and no transcript.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            options: UnpackOptions::default(),
            debug_log: None,
        }
    }

    /// Replaces the decode options.
    pub fn with_options(mut self, options: UnpackOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches a shared execution transcript.
    pub fn with_debug_log(mut self, log: Arc<DebugLog>) -> Self {
        self.debug_log = Some(log);
        self
    }

    /// Returns the session's decode options.
    pub fn options(&self) -> UnpackOptions {
        self.options
    }

    /// Returns a reference to the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Evaluates a script body and unpacks its result.
    pub fn eval(&self, source: &str) -> Result<OsaValue, OsaError> {
        self.run(ScriptRequest::eval(source))
    }

    /// Invokes a named handler with the given arguments.
    ///
    /// Every argument is packed up front; a pack failure returns before
    /// the engine is touched.
    pub fn call(&self, source: &str, handler: &str, args: &[OsaValue]) -> Result<OsaValue, OsaError> {
        let packed = args.iter().map(pack_value).collect::<Result<Vec<_>, _>>()?;
        self.run(ScriptRequest::call(source, handler, packed))
    }

    /// Executes a request and returns the undecoded result descriptor.
    pub fn execute_raw(&self, request: ScriptRequest) -> Result<Descriptor, OsaError> {
        let started = Instant::now();
        let execution_id = Uuid::new_v4();
        tracing::debug!(execution = %execution_id, "executing script for raw result");
        match self.engine.execute(&request) {
            Ok(desc) => {
                let outcome = ExecutionOutcome::Value(OsaValue::Raw(desc.clone()));
                self.log(execution_id, &request, outcome, started);
                Ok(desc)
            }
            Err(e) => {
                tracing::debug!(execution = %execution_id, error = %e, "engine execution failed");
                self.log(execution_id, &request, ExecutionOutcome::EngineError(e.to_string()), started);
                Err(e)
            }
        }
    }

    fn run(&self, request: ScriptRequest) -> Result<OsaValue, OsaError> {
        let started = Instant::now();
        let execution_id = Uuid::new_v4();
        tracing::debug!(
            execution = %execution_id,
            handler = request.call.as_deref().unwrap_or(""),
            "executing script"
        );
        match self.engine.execute(&request) {
            Ok(desc) => match unpack_value(&desc, self.options) {
                Ok(value) => {
                    self.log(execution_id, &request, ExecutionOutcome::Value(value.clone()), started);
                    Ok(value)
                }
                Err(e) => {
                    tracing::debug!(execution = %execution_id, error = %e, "result decode failed");
                    self.log(execution_id, &request, ExecutionOutcome::DecodeError(e.to_string()), started);
                    Err(e)
                }
            },
            Err(e) => {
                tracing::debug!(execution = %execution_id, error = %e, "engine execution failed");
                self.log(execution_id, &request, ExecutionOutcome::EngineError(e.to_string()), started);
                Err(e)
            }
        }
    }

    fn log(&self, id: Uuid, request: &ScriptRequest, outcome: ExecutionOutcome, started: Instant) {
        let Some(log) = &self.debug_log else { return };
        log.record(DebugEntry {
            id,
            source: request.source.clone(),
            call: request.call.clone(),
            args: request.args.clone(),
            outcome,
            elapsed: started.elapsed(),
            at: started,
        });
    }
}
