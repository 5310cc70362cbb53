//! Taskline Send CSV - batch task producer.
//!
//! Reads task texts from the first column of a local CSV file (default
//! `tasks.csv`) and publishes each row as one message to the durable task
//! queue, then exits. A missing tasks file is logged and exits with a
//! non-zero status.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskline::{source, Config, Publisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("batch_producer_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        queue = %config.queue_name,
        tasks_csv = %config.tasks_csv,
        management_url = %config.management_url,
        "config_loaded"
    );

    // Read the tasks up front so a missing file fails before connecting
    let tasks = source::read_tasks(&config.tasks_csv)?;

    // Publish every task over one connection, then close it
    let publisher = Publisher::new(
        config.amqp_url.clone(),
        config.queue_name.clone(),
        config.persistent_delivery,
    );

    for task in &tasks {
        publisher.publish(task).await?;
    }

    publisher.close().await;

    info!(count = tasks.len(), "batch_producer_done");

    Ok(())
}
