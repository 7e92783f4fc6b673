//! Worker process lifecycle
//!
//! A worker is a re-execution of the current binary with the hidden
//! `--worker` flag. It receives one task envelope on stdin, solves it (which
//! may spawn its own workers at a smaller depth budget), writes one reply
//! envelope to stdout, and exits. Worker stderr is inherited so diagnostics
//! from the whole process tree surface on the invoking terminal.

use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;
use uuid::Uuid;

use closest_core::Point;
use closest_ipc::{
    ChildProcessTransport, CoordinatorMessage, IpcTransport, MessageEnvelope, PartitionOutcome,
    WorkerMessage,
};

use crate::error::EngineError;

/// Handle to one spawned worker process
pub struct WorkerHandle {
    id: String,
    correlation_id: Uuid,
    child: Child,
    transport: ChildProcessTransport,
}

impl WorkerHandle {
    /// Spawn a worker and hand it its partition.
    ///
    /// The task is written before this returns and the worker's stdin is
    /// closed right after, so the child can run to completion without any
    /// further interaction.
    pub async fn spawn(
        binary: &Path,
        worker_id: impl Into<String>,
        points: &[Point],
        depth_budget: i64,
    ) -> Result<Self, EngineError> {
        let id = worker_id.into();
        debug!(
            "spawning worker {} ({} points, depth budget {})",
            id,
            points.len(),
            depth_budget
        );

        let mut cmd = Command::new(binary);
        cmd.arg("--worker")
            .arg("--worker-id")
            .arg(&id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| EngineError::Spawn {
            worker_id: id.clone(),
            error: e.to_string(),
        })?;

        let stdin = child.stdin.take().ok_or(EngineError::MissingHandle {
            worker_id: id.clone(),
            handle: "stdin",
        })?;
        let stdout = child.stdout.take().ok_or(EngineError::MissingHandle {
            worker_id: id.clone(),
            handle: "stdout",
        })?;

        let mut transport = ChildProcessTransport::new(stdin, stdout);
        let correlation_id = Uuid::new_v4();
        let task = WorkerMessage::ComputePartition {
            points: points.to_vec(),
            depth_budget,
            correlation_id,
        };
        transport.send(&MessageEnvelope::new(task)).await?;
        transport.close_sender();

        Ok(Self {
            id,
            correlation_id,
            child,
            transport,
        })
    }

    /// The worker id this handle was spawned with
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the worker to terminate, then read its single reply.
    ///
    /// Termination is consumed before the result: the reply sits in the pipe
    /// buffer until then. Any abnormal exit is fatal; if the worker managed
    /// to write a structured error before dying, that richer diagnostic is
    /// preferred over the bare exit status.
    pub async fn join(mut self) -> Result<PartitionOutcome, EngineError> {
        let status = self.child.wait().await.map_err(|e| EngineError::Wait {
            worker_id: self.id.clone(),
            error: e.to_string(),
        })?;

        if !status.success() {
            if let Ok(envelope) = self.transport.receive::<CoordinatorMessage>().await {
                if let CoordinatorMessage::Error { error, .. } = envelope.message {
                    return Err(EngineError::WorkerFailed {
                        worker_id: self.id,
                        error,
                    });
                }
            }
            return Err(EngineError::AbnormalExit {
                worker_id: self.id,
                status: status.to_string(),
            });
        }

        let envelope = self.transport.receive::<CoordinatorMessage>().await?;
        match envelope.message {
            CoordinatorMessage::PartitionResult {
                correlation_id,
                result,
            } => {
                if correlation_id != self.correlation_id {
                    return Err(EngineError::CorrelationMismatch {
                        worker_id: self.id,
                        expected: self.correlation_id,
                        actual: correlation_id,
                    });
                }
                debug!(
                    "worker {} reported distance {} with {} workers in its subtree",
                    self.id, result.distance, result.workers_spawned
                );
                Ok(result)
            }
            CoordinatorMessage::Error { error, .. } => Err(EngineError::WorkerFailed {
                worker_id: self.id,
                error,
            }),
        }
    }
}
