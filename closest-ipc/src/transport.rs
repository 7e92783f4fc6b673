//! IPC transport implementations
//!
//! Messages are newline-delimited JSON envelopes. A transport owns both
//! directions of one conversation: the worker side wraps its own
//! stdin/stdout, the coordinator side wraps one child's piped handles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::IpcError;
use crate::protocol::{MessageEnvelope, IPC_PROTOCOL_VERSION};

/// IPC transport trait for different communication mechanisms
#[async_trait]
pub trait IpcTransport: Send {
    /// Send a message to the other end
    async fn send<T: Serialize + Send + Sync>(
        &mut self,
        message: &MessageEnvelope<T>,
    ) -> Result<(), IpcError>;

    /// Receive a message from the other end
    async fn receive<T: for<'de> Deserialize<'de> + Send>(
        &mut self,
    ) -> Result<MessageEnvelope<T>, IpcError>;

    /// Close the transport
    async fn close(&mut self) -> Result<(), IpcError>;
}

fn decode_envelope<T: for<'de> Deserialize<'de>>(line: &str) -> Result<MessageEnvelope<T>, IpcError> {
    let envelope: MessageEnvelope<T> = serde_json::from_str(line.trim_end())
        .map_err(|e| IpcError::DeserializationError(e.to_string()))?;

    if envelope.protocol_version != IPC_PROTOCOL_VERSION {
        return Err(IpcError::ProtocolVersionMismatch {
            expected: IPC_PROTOCOL_VERSION,
            actual: envelope.protocol_version,
        });
    }

    Ok(envelope)
}

async fn write_envelope<T, W>(writer: &mut W, message: &MessageEnvelope<T>) -> Result<(), IpcError>
where
    T: Serialize,
    W: AsyncWriteExt + Unpin,
{
    let json =
        serde_json::to_string(message).map_err(|e| IpcError::SerializationError(e.to_string()))?;

    let line = format!("{}\n", json);
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| IpcError::IoError(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| IpcError::IoError(e.to_string()))?;

    Ok(())
}

/// Stdin/stdout IPC transport for the worker side of the conversation
pub struct StdioTransport {
    stdin: BufReader<tokio::io::Stdin>,
    stdout: tokio::io::Stdout,
}

impl StdioTransport {
    /// Create a new stdio transport
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpcTransport for StdioTransport {
    async fn send<T: Serialize + Send + Sync>(
        &mut self,
        message: &MessageEnvelope<T>,
    ) -> Result<(), IpcError> {
        write_envelope(&mut self.stdout, message).await
    }

    async fn receive<T: for<'de> Deserialize<'de> + Send>(
        &mut self,
    ) -> Result<MessageEnvelope<T>, IpcError> {
        let mut line = String::new();
        let read = self
            .stdin
            .read_line(&mut line)
            .await
            .map_err(|e| IpcError::IoError(e.to_string()))?;

        if read == 0 {
            return Err(IpcError::ConnectionClosed);
        }

        decode_envelope(&line)
    }

    async fn close(&mut self) -> Result<(), IpcError> {
        // Stdin/stdout don't need explicit closing
        Ok(())
    }
}

/// Coordinator-side transport over a child process's piped handles
pub struct ChildProcessTransport {
    stdin: Option<tokio::process::ChildStdin>,
    stdout: Option<BufReader<tokio::process::ChildStdout>>,
}

impl ChildProcessTransport {
    /// Create a new child process transport
    pub fn new(stdin: tokio::process::ChildStdin, stdout: tokio::process::ChildStdout) -> Self {
        Self {
            stdin: Some(stdin),
            stdout: Some(BufReader::new(stdout)),
        }
    }

    /// Drop the write half so the child sees EOF on its stdin.
    ///
    /// Each worker receives exactly one task; closing the sender right after
    /// it is what lets the child terminate once it has replied.
    pub fn close_sender(&mut self) {
        let _ = self.stdin.take();
    }
}

#[async_trait]
impl IpcTransport for ChildProcessTransport {
    async fn send<T: Serialize + Send + Sync>(
        &mut self,
        message: &MessageEnvelope<T>,
    ) -> Result<(), IpcError> {
        let stdin = self.stdin.as_mut().ok_or(IpcError::NotConnected)?;
        write_envelope(stdin, message).await
    }

    async fn receive<T: for<'de> Deserialize<'de> + Send>(
        &mut self,
    ) -> Result<MessageEnvelope<T>, IpcError> {
        let stdout = self.stdout.as_mut().ok_or(IpcError::NotConnected)?;

        let mut line = String::new();
        let read = stdout
            .read_line(&mut line)
            .await
            .map_err(|e| IpcError::IoError(e.to_string()))?;

        if read == 0 {
            return Err(IpcError::ConnectionClosed);
        }

        decode_envelope(&line)
    }

    async fn close(&mut self) -> Result<(), IpcError> {
        // Take ownership and drop to close
        let _ = self.stdin.take();
        let _ = self.stdout.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CoordinatorMessage, PartitionOutcome};
    use uuid::Uuid;

    #[test]
    fn test_decode_envelope_roundtrip() {
        let message = CoordinatorMessage::PartitionResult {
            correlation_id: Uuid::new_v4(),
            result: PartitionOutcome::sequential(2.0),
        };
        let json = serde_json::to_string(&MessageEnvelope::new(message)).unwrap();

        let decoded: MessageEnvelope<CoordinatorMessage> = decode_envelope(&json).unwrap();
        assert!(decoded.is_compatible());
    }

    #[test]
    fn test_decode_envelope_rejects_version_mismatch() {
        let message = CoordinatorMessage::PartitionResult {
            correlation_id: Uuid::new_v4(),
            result: PartitionOutcome::sequential(2.0),
        };
        let mut envelope = MessageEnvelope::new(message);
        envelope.protocol_version = IPC_PROTOCOL_VERSION + 1;
        let json = serde_json::to_string(&envelope).unwrap();

        let err = decode_envelope::<CoordinatorMessage>(&json).unwrap_err();
        assert!(matches!(err, IpcError::ProtocolVersionMismatch { .. }));
    }

    #[test]
    fn test_decode_envelope_rejects_garbage() {
        let err = decode_envelope::<CoordinatorMessage>("not json at all").unwrap_err();
        assert!(matches!(err, IpcError::DeserializationError(_)));
    }
}
