//! Parallel divide-and-conquer closest-pair engine
//!
//! Each recursion level either solves its slice in-process with the
//! sequential solver or spawns two isolated worker processes, one per half,
//! and merges their results with a strip pass. Workers are re-executions of
//! the current binary; the recursion tree is the process tree.

pub mod engine;
pub mod error;
pub mod worker;

// Re-export main types
pub use engine::{ClosestEngine, EngineConfig, MIN_PARTITION_SIZE};
pub use error::EngineError;
pub use worker::WorkerHandle;

// Re-export the IPC result type; it is the engine's return value too
pub use closest_ipc::PartitionOutcome;
