//! Error types for the parallel engine

use thiserror::Error;
use uuid::Uuid;

use closest_ipc::{IpcError, WorkerError};

/// Engine errors. All of them are fatal: the computation has no retry or
/// partial-result path, so the owning process reports the error and exits
/// non-zero, which its own parent observes as an abnormal child exit.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The worker binary could not be resolved
    #[error("failed to resolve worker binary: {0}")]
    WorkerBinary(String),

    /// Spawning a worker process failed
    #[error("failed to spawn worker {worker_id}: {error}")]
    Spawn { worker_id: String, error: String },

    /// A worker's pipe handle was unavailable after spawn
    #[error("worker {worker_id} is missing its {handle} handle")]
    MissingHandle {
        worker_id: String,
        handle: &'static str,
    },

    /// Waiting on a worker failed
    #[error("failed to wait for worker {worker_id}: {error}")]
    Wait { worker_id: String, error: String },

    /// A worker terminated abnormally (non-zero exit or killed by signal)
    #[error("worker {worker_id} exited abnormally ({status})")]
    AbnormalExit { worker_id: String, status: String },

    /// A worker reported a structured failure before exiting
    #[error("worker {worker_id} failed: {error}")]
    WorkerFailed {
        worker_id: String,
        error: WorkerError,
    },

    /// A worker replied with a result for a different request
    #[error("worker {worker_id} replied to {actual}, expected {expected}")]
    CorrelationMismatch {
        worker_id: String,
        expected: Uuid,
        actual: Uuid,
    },

    /// IPC transport failure
    #[error("IPC error: {0}")]
    Ipc(#[from] IpcError),
}
