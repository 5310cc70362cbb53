//! Taskline Send - one-shot task producer.
//!
//! Publishes a single task message to the durable task queue and exits.
//! The task text is taken from the command-line arguments joined with
//! spaces; with no arguments a default task is sent. Add dots to the end
//! of the text to make the task longer-running (one second per dot).

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskline::{Config, Publisher, Task};

/// Task sent when no command-line arguments are given.
const DEFAULT_TASK: &str = "Second task.....";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("producer_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        queue = %config.queue_name,
        management_url = %config.management_url,
        "config_loaded"
    );

    // Get the task text from the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        DEFAULT_TASK.to_string()
    } else {
        args.join(" ")
    };

    let task = Task::new(text).context("Invalid task text")?;

    // Publish the task and close the connection
    let publisher = Publisher::new(
        config.amqp_url.clone(),
        config.queue_name.clone(),
        config.persistent_delivery,
    );

    publisher.publish(&task).await?;
    publisher.close().await;

    info!("producer_done");

    Ok(())
}
