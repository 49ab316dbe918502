//! Error types for descriptor packing, unpacking, and script execution.

use crate::types::{Descriptor, OsaValue};

/// Errors that can occur while packing values, unpacking descriptors,
/// or driving the script engine.
#[derive(Debug, thiserror::Error)]
pub enum OsaError {
    /// An integer outside `[-2^31, 2^31 - 1]` was handed to Pack.
    #[error("integer {0} does not fit in a signed 32-bit descriptor")]
    OutOfRange(i64),

    /// Pack was given a value with no wire tag mapping.
    #[error("cannot pack value: {0}")]
    UnsupportedValue(OsaValue),

    /// Unpack encountered a tag absent from the type table.
    #[error("unknown descriptor tag: {0}")]
    UnknownTag(Descriptor),

    /// A payload's shape, length, or pairing violates its tag's contract.
    #[error("malformed descriptor ({reason}): {desc}")]
    MalformedDescriptor { reason: String, desc: Descriptor },

    /// The script engine reported an execution failure.
    #[error("script execution failed: {0}")]
    Execution(String),

    /// I/O error while assembling script source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OsaError {
    /// Wraps any displayable engine failure as an execution error.
    pub fn execution(e: impl std::fmt::Display) -> Self {
        Self::Execution(e.to_string())
    }

    /// Builds a `MalformedDescriptor` annotated with the offending descriptor.
    pub(crate) fn malformed(reason: impl Into<String>, desc: &Descriptor) -> Self {
        Self::MalformedDescriptor {
            reason: reason.into(),
            desc: desc.clone(),
        }
    }
}
