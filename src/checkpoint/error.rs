//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while encoding, decoding or restoring snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot data failed validation
    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),

    /// Snapshot names a state the restoring machine never registered
    #[error("Snapshot references state '{state}' not registered with machine '{machine}'")]
    UnregisteredState {
        state: &'static str,
        machine: String,
    },
}
