//! Taskline Worker - async RabbitMQ consumer for the shared task queue.
//!
//! This worker competes with any other running workers for task messages,
//! simulates work (one second per `.` in the message body), and acknowledges
//! each task once the work is done. Start more copies of this process to add
//! more workers.

mod consumer;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskline::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    tracing::info!("worker_starting");

    // Load configuration from environment
    let config = Config::from_env();
    tracing::info!(
        queue = %config.queue_name,
        prefetch_count = config.prefetch_count,
        "config_loaded"
    );

    // Start the consumer
    consumer::run(config).await?;

    Ok(())
}
