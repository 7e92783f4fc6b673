//! IPC protocol definitions and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use closest_core::Point;

/// IPC protocol version for compatibility checking
pub const IPC_PROTOCOL_VERSION: u32 = 1;

/// Result of solving one partition of the point set: the minimum pairwise
/// distance found and the number of worker processes spawned in the subtree
/// that produced it.
///
/// The worker count travels only here; process exit status never carries it
/// (conventional exit codes truncate at 255, which silently corrupts the
/// count for deep trees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionOutcome {
    pub distance: f64,
    pub workers_spawned: u64,
}

impl PartitionOutcome {
    /// An outcome produced without forking
    pub fn sequential(distance: f64) -> Self {
        Self {
            distance,
            workers_spawned: 0,
        }
    }
}

/// Messages sent from the coordinator to a worker process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// Solve one half of a split: the points are a contiguous,
    /// x-sorted sub-range of the parent's slice.
    ComputePartition {
        points: Vec<Point>,
        depth_budget: i64,
        correlation_id: Uuid,
    },
}

/// Messages sent from a worker process back to its coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinatorMessage {
    /// The single result of the worker's partition
    PartitionResult {
        correlation_id: Uuid,
        result: PartitionOutcome,
    },

    /// Worker error
    Error {
        correlation_id: Option<Uuid>,
        error: WorkerError,
    },
}

/// Worker error types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum WorkerError {
    /// The partition computation failed
    ComputeFailed { error: String },

    /// The task message could not be parsed
    MessageParseError { error: String },

    /// Transport failure talking to the coordinator
    CommunicationError { error: String },
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::ComputeFailed { error } => {
                write!(f, "partition computation failed: {}", error)
            }
            WorkerError::MessageParseError { error } => {
                write!(f, "message parse error: {}", error)
            }
            WorkerError::CommunicationError { error } => {
                write!(f, "communication error: {}", error)
            }
        }
    }
}

impl std::error::Error for WorkerError {}

/// Message envelope for all IPC communications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope<T> {
    pub protocol_version: u32,
    pub timestamp: DateTime<Utc>,
    pub message: T,
}

impl<T> MessageEnvelope<T> {
    /// Create a new message envelope
    pub fn new(message: T) -> Self {
        Self {
            protocol_version: IPC_PROTOCOL_VERSION,
            timestamp: Utc::now(),
            message,
        }
    }

    /// Check if protocol version is compatible
    pub fn is_compatible(&self) -> bool {
        self.protocol_version == IPC_PROTOCOL_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_envelope() {
        let message = WorkerMessage::ComputePartition {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            depth_budget: 2,
            correlation_id: Uuid::new_v4(),
        };

        let envelope = MessageEnvelope::new(message);
        assert_eq!(envelope.protocol_version, IPC_PROTOCOL_VERSION);
        assert!(envelope.is_compatible());

        let json = serde_json::to_string(&envelope).unwrap();
        let back: MessageEnvelope<WorkerMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.protocol_version, envelope.protocol_version);
    }

    #[test]
    fn test_worker_message_tagged_form() {
        let message = WorkerMessage::ComputePartition {
            points: vec![],
            depth_budget: 0,
            correlation_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"type\":\"compute_partition\""));
    }

    #[test]
    fn test_partition_result_roundtrip() {
        let correlation_id = Uuid::new_v4();
        let message = CoordinatorMessage::PartitionResult {
            correlation_id,
            result: PartitionOutcome {
                distance: 1.25,
                workers_spawned: 6,
            },
        };

        let json = serde_json::to_string(&message).unwrap();
        let back: CoordinatorMessage = serde_json::from_str(&json).unwrap();
        match back {
            CoordinatorMessage::PartitionResult {
                correlation_id: id,
                result,
            } => {
                assert_eq!(id, correlation_id);
                assert_eq!(result.distance, 1.25);
                assert_eq!(result.workers_spawned, 6);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_sequential_outcome() {
        let outcome = PartitionOutcome::sequential(0.5);
        assert_eq!(outcome.distance, 0.5);
        assert_eq!(outcome.workers_spawned, 0);
    }

    #[test]
    fn test_worker_error_display() {
        let error = WorkerError::ComputeFailed {
            error: "spawn failed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "partition computation failed: spawn failed"
        );
    }
}
