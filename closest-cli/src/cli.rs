//! CLI argument parsing definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "closest", version, about = "Parallel closest pair of points", long_about = None)]
pub struct Cli {
    /// File that contains the input points
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Maximum process tree depth
    #[arg(
        short = 'd',
        long = "depth",
        value_name = "DEPTH",
        allow_hyphen_values = true
    )]
    pub depth: Option<i64>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Run as worker process (internal use)
    #[arg(long, hide = true)]
    pub worker: bool,

    /// Worker ID (used with --worker)
    #[arg(long, value_name = "ID", hide = true)]
    pub worker_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from(["closest", "-f", "points.txt", "-d", "3"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("points.txt")));
        assert_eq!(cli.depth, Some(3));
        assert!(!cli.worker);
    }

    #[test]
    fn test_parse_negative_depth() {
        let cli = Cli::try_parse_from(["closest", "-f", "points.txt", "-d", "-1"]).unwrap();
        assert_eq!(cli.depth, Some(-1));
    }

    #[test]
    fn test_parse_worker_mode() {
        let cli = Cli::try_parse_from(["closest", "--worker", "--worker-id", "worker-left"]).unwrap();
        assert!(cli.worker);
        assert_eq!(cli.worker_id.as_deref(), Some("worker-left"));
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_non_numeric_depth_rejected() {
        assert!(Cli::try_parse_from(["closest", "-f", "p.txt", "-d", "deep"]).is_err());
    }
}
