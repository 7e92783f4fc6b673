use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use closest_config::{ClosestConfig, ConfigLoader};
use closest_core::{read_points, sort_by_x};
use closest_engine::{ClosestEngine, EngineConfig};
use closest_ipc::{
    CoordinatorMessage, IpcTransport, MessageEnvelope, StdioTransport, WorkerError, WorkerMessage,
};

mod cli;
use cli::Cli;

fn print_usage() {
    eprintln!("Usage: closest -f <file> -d <depth>");
    eprintln!();
    eprintln!("    -d Maximum process tree depth");
    eprintln!("    -f File that contains the input points");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return Ok(());
        }
        Err(_) => {
            print_usage();
            std::process::exit(1);
        }
    };

    if cli.worker {
        let worker_id = cli.worker_id.clone().unwrap_or_else(|| "worker".to_string());
        return run_worker_process(worker_id, cli.log_level.as_ref()).await;
    }

    let (file, depth) = match (&cli.file, cli.depth) {
        (Some(file), Some(depth)) => (file.clone(), depth),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    let config = ConfigLoader::new()
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&resolve_log_level(cli.log_level.as_ref(), &config))?;

    let mut points = read_points(&file)
        .with_context(|| format!("Failed to read points from {}", file.display()))?;
    sort_by_x(&mut points);
    info!("read {} points from {}", points.len(), file.display());

    let engine = ClosestEngine::new(EngineConfig {
        worker_binary: config.execution.worker_binary.clone(),
    });
    let outcome = engine
        .closest_parallel(&points, depth)
        .await
        .context("Closest-pair computation failed")?;

    println!(
        "The smallest distance: is {:.2} (total worker processes: {})",
        outcome.distance, outcome.workers_spawned
    );

    Ok(())
}

fn resolve_log_level(flag: Option<&String>, config: &ClosestConfig) -> String {
    match flag {
        Some(level) => level.clone(),
        None => config.logging.level.to_string(),
    }
}

/// Initialize tracing for the coordinator. Stdout is reserved for the single
/// result line, so diagnostics always go to stderr.
fn init_tracing(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', falling back to 'info'", level);
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Run as worker process: one task envelope in on stdin, one reply envelope
/// out on stdout, then exit. Stdout belongs to IPC; logs go to stderr.
async fn run_worker_process(worker_id: String, log_level: Option<&String>) -> Result<()> {
    let config = ConfigLoader::new()
        .from_env()
        .context("Failed to load worker configuration")?;
    init_tracing(&resolve_log_level(log_level, &config))?;
    info!("starting worker process {}", worker_id);

    let mut transport = StdioTransport::new();

    let envelope: MessageEnvelope<WorkerMessage> = match transport.receive().await {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("worker {} failed to read its task: {}", worker_id, e);
            let reply = CoordinatorMessage::Error {
                correlation_id: None,
                error: WorkerError::MessageParseError {
                    error: e.to_string(),
                },
            };
            let _ = transport.send(&MessageEnvelope::new(reply)).await;
            std::process::exit(1);
        }
    };

    let reply = process_worker_message(envelope.message, &config).await;
    let failed = matches!(reply, CoordinatorMessage::Error { .. });

    transport
        .send(&MessageEnvelope::new(reply))
        .await
        .context("Failed to write worker reply")?;

    if failed {
        std::process::exit(1);
    }

    info!("worker {} finished", worker_id);
    Ok(())
}

/// Solve the received partition, spawning further workers if the budget
/// allows, and shape the outcome into a reply message.
async fn process_worker_message(msg: WorkerMessage, config: &ClosestConfig) -> CoordinatorMessage {
    match msg {
        WorkerMessage::ComputePartition {
            points,
            depth_budget,
            correlation_id,
        } => {
            info!(
                "solving partition of {} points (depth budget {})",
                points.len(),
                depth_budget
            );

            let engine = ClosestEngine::new(EngineConfig {
                worker_binary: config.execution.worker_binary.clone(),
            });

            match engine.closest_parallel(&points, depth_budget).await {
                Ok(result) => CoordinatorMessage::PartitionResult {
                    correlation_id,
                    result,
                },
                Err(e) => {
                    error!("partition computation failed: {}", e);
                    CoordinatorMessage::Error {
                        correlation_id: Some(correlation_id),
                        error: WorkerError::ComputeFailed {
                            error: e.to_string(),
                        },
                    }
                }
            }
        }
    }
}
