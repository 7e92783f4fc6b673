//! Core domain types and the sequential closest-pair solver
//!
//! This crate holds everything that does not involve process management:
//! the `Point` type, the x-sort precondition helper, the sequential
//! divide-and-conquer solver with its strip merge step, and the points-file
//! readers.

pub mod input;
pub mod point;
pub mod serial;

// Re-export commonly used types
pub use input::{read_points, total_points, InputError};
pub use point::{sort_by_x, Point};
pub use serial::{brute_force, closest_serial, strip_closest};
