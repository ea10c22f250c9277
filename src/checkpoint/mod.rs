//! Serialisable snapshots of a machine.
//!
//! A snapshot captures what can be written to disk: the current, previous
//! and target tags, the lock flag, every state's weight and the transition
//! history. Behaviours, guards and transitions are code and are rebuilt by
//! the host; pending events are only counted.

use crate::core::{StateHistory, StateTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Weight of one state at snapshot time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateWeight<T: StateTag> {
    pub tag: T,
    pub weight: f32,
}

/// Serializable snapshot of a machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<T: StateTag> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Name of the machine it was taken from
    pub machine: String,

    pub current: T,

    pub previous: T,

    /// Destination of the transition in flight, if any
    pub target: Option<T>,

    pub locked: bool,

    /// Weights ordered by state id
    pub weights: Vec<StateWeight<T>>,

    /// Events that were queued; the events themselves are not captured
    pub pending_events: usize,

    /// Completed transitions
    pub history: StateHistory<T>,
}

impl<T: StateTag> MachineSnapshot<T> {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the snapshot can be restored.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        if let Some(target) = self.target {
            return Err(SnapshotError::ValidationFailed(format!(
                "snapshot was taken while transitioning from '{}' to '{}'",
                self.current.name(),
                target.name()
            )));
        }

        if let Some(entry) = self
            .weights
            .iter()
            .find(|entry| !entry.weight.is_finite())
        {
            return Err(SnapshotError::ValidationFailed(format!(
                "weight of state '{}' is not finite",
                entry.tag.name()
            )));
        }

        Ok(())
    }
}
