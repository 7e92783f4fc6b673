//! The parallel divide-and-conquer engine

use std::path::PathBuf;

use tracing::debug;

use closest_core::{closest_serial, strip_closest, Point};
use closest_ipc::PartitionOutcome;

use crate::error::EngineError;
use crate::worker::WorkerHandle;

/// Slices below this size are never worth a fork; the floor is independent
/// from, and in practice tighter than, the depth budget.
pub const MIN_PARTITION_SIZE: usize = 4;

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Binary to re-execute for workers; defaults to the current executable
    pub worker_binary: Option<PathBuf>,
}

/// Parallel closest-pair engine.
///
/// One engine value is cheap and stateless; the worker count lives in the
/// returned [`PartitionOutcome`], aggregated bottom-up, never in shared
/// state.
pub struct ClosestEngine {
    config: EngineConfig,
}

impl ClosestEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    fn worker_binary(&self) -> Result<PathBuf, EngineError> {
        match &self.config.worker_binary {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe().map_err(|e| EngineError::WorkerBinary(e.to_string())),
        }
    }

    /// Minimum pairwise distance for a slice sorted ascending by x, plus the
    /// total number of worker processes spawned below this call.
    ///
    /// A depth budget of zero or less means forking is exhausted; together
    /// with the size floor it forces the sequential path. Otherwise the
    /// slice is split at its midpoint and each half goes to an isolated
    /// worker process running this same computation one level down.
    pub async fn closest_parallel(
        &self,
        points: &[Point],
        depth_budget: i64,
    ) -> Result<PartitionOutcome, EngineError> {
        if points.len() < MIN_PARTITION_SIZE || depth_budget <= 0 {
            return Ok(PartitionOutcome::sequential(closest_serial(points)));
        }

        let mid = points.len() / 2;
        let mid_x = points[mid].x;
        let binary = self.worker_binary()?;

        let left =
            WorkerHandle::spawn(&binary, "worker-left", &points[..mid], depth_budget - 1).await?;
        let right =
            WorkerHandle::spawn(&binary, "worker-right", &points[mid..], depth_budget - 1).await?;

        // Both children run with no mutual ordering; nothing is combined
        // until both have terminated and reported.
        let (left_outcome, right_outcome) = tokio::try_join!(left.join(), right.join())?;

        let d = left_outcome.distance.min(right_outcome.distance);
        let strip = build_strip(points, mid_x, d);
        let distance = d.min(strip_closest(&strip, d));

        let workers_spawned = 2 + left_outcome.workers_spawned + right_outcome.workers_spawned;
        debug!(
            "merged partition of {} points: distance {}, {} workers",
            points.len(),
            distance,
            workers_spawned
        );

        Ok(PartitionOutcome {
            distance,
            workers_spawned,
        })
    }
}

/// Points of the combined slice lying strictly within `d` of the dividing
/// line, in their original order.
fn build_strip(points: &[Point], mid_x: f64, d: f64) -> Vec<Point> {
    points
        .iter()
        .copied()
        .filter(|p| (p.x - mid_x).abs() < d)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use closest_core::{brute_force, sort_by_x};

    fn sorted(mut points: Vec<Point>) -> Vec<Point> {
        sort_by_x(&mut points);
        points
    }

    // Forking paths are exercised end-to-end against the real binary in
    // closest-cli's integration tests; in-process tests stay on the
    // sequential side of the floor.

    #[tokio::test]
    async fn test_depth_zero_is_sequential() {
        let points = sorted(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 2.0),
            Point::new(7.0, 7.0),
        ]);

        let engine = ClosestEngine::with_defaults();
        let outcome = engine.closest_parallel(&points, 0).await.unwrap();
        assert_eq!(outcome.distance, closest_serial(&points));
        assert_eq!(outcome.workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_negative_depth_is_exhausted() {
        let points = sorted((0..8).map(|i| Point::new(i as f64, 0.0)).collect());

        let engine = ClosestEngine::with_defaults();
        let outcome = engine.closest_parallel(&points, -1).await.unwrap();
        assert_eq!(outcome.distance, 1.0);
        assert_eq!(outcome.workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_small_slice_never_forks() {
        // Below the size floor even a generous depth budget stays
        // in-process.
        let points = sorted(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(3.0, 4.0),
        ]);

        let engine = ClosestEngine::with_defaults();
        let outcome = engine.closest_parallel(&points, 10).await.unwrap();
        assert_eq!(outcome.distance, 1.0);
        assert_eq!(outcome.workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_degenerate_inputs() {
        let engine = ClosestEngine::with_defaults();

        let outcome = engine.closest_parallel(&[], 3).await.unwrap();
        assert_eq!(outcome.distance, f64::INFINITY);
        assert_eq!(outcome.workers_spawned, 0);

        let one = [Point::new(1.0, 1.0)];
        let outcome = engine.closest_parallel(&one, 3).await.unwrap();
        assert_eq!(outcome.distance, f64::INFINITY);
        assert_eq!(outcome.workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_sequential_path_matches_brute_force() {
        let points = sorted(
            (0..30)
                .map(|i| {
                    let i = i as f64;
                    Point::new((i * 31.0) % 83.0, (i * 47.0) % 89.0)
                })
                .collect(),
        );

        let engine = ClosestEngine::with_defaults();
        let outcome = engine.closest_parallel(&points, 0).await.unwrap();
        assert!((outcome.distance - brute_force(&points)).abs() < 1e-12);
    }

    #[test]
    fn test_build_strip_is_strict() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        // Distance exactly d from the line is excluded.
        let strip = build_strip(&points, 5.0, 1.0);
        assert_eq!(strip, vec![Point::new(5.0, 0.0)]);
    }

    #[test]
    fn test_build_strip_keeps_original_order() {
        let points = [
            Point::new(4.5, 2.0),
            Point::new(4.9, 1.0),
            Point::new(5.1, 3.0),
        ];
        let strip = build_strip(&points, 5.0, 1.0);
        assert_eq!(strip, points.to_vec());
    }

    #[test]
    fn test_worker_binary_defaults_to_current_exe() {
        let engine = ClosestEngine::with_defaults();
        assert!(engine.worker_binary().is_ok());
    }

    #[test]
    fn test_worker_binary_override() {
        let engine = ClosestEngine::new(EngineConfig {
            worker_binary: Some(PathBuf::from("/opt/closest/bin/closest")),
        });
        assert_eq!(
            engine.worker_binary().unwrap(),
            PathBuf::from("/opt/closest/bin/closest")
        );
    }
}
