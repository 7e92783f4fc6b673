//! Inter-process communication for the closest-pair process tree
//!
//! This crate provides the IPC protocol and transport abstractions used for
//! communication between a coordinator and the worker processes it spawns.
//! Every worker receives exactly one task message on stdin and writes
//! exactly one reply to stdout.

pub mod error;
pub mod protocol;
pub mod transport;

// Re-export commonly used types
pub use error::IpcError;
pub use protocol::{
    CoordinatorMessage, MessageEnvelope, PartitionOutcome, WorkerError, WorkerMessage,
    IPC_PROTOCOL_VERSION,
};
pub use transport::{ChildProcessTransport, IpcTransport, StdioTransport};
