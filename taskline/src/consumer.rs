//! RabbitMQ consumer module using lapin.
//!
//! This module handles connecting to RabbitMQ, consuming task messages from
//! the shared durable queue, and simulating the work each task encodes.
//! The prefetch cap (default one) means the broker withholds the next
//! delivery until the current one is acknowledged, so processing is
//! effectively serial per worker.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use lapin::{
    options::{
        BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions,
        QueueDeclareOptions,
    },
    types::FieldTable,
    Connection, ConnectionProperties,
};
use tokio::signal;
use tracing::{error, info, warn};

use taskline::{Config, Task};

/// Run the RabbitMQ consumer.
///
/// This function:
/// 1. Connects to RabbitMQ using the configured URL
/// 2. Declares the durable task queue (idempotent operation)
/// 3. Caps unacknowledged in-flight deliveries via QoS
/// 4. Consumes messages until SIGINT/SIGTERM, acking each after the
///    simulated work completes
pub async fn run(config: Config) -> Result<()> {
    // Connect to RabbitMQ
    info!(url_length = config.amqp_url.len(), "rabbitmq_connecting");

    let conn = Connection::connect(&config.amqp_url, ConnectionProperties::default())
        .await
        .context("Failed to connect to RabbitMQ")?;

    info!("rabbitmq_connected");

    // Create a channel
    let channel = conn
        .create_channel()
        .await
        .context("Failed to create channel")?;

    info!("rabbitmq_channel_created");

    // Limit in-flight deliveries so one slow task does not pile work onto
    // this worker while others sit idle
    channel
        .basic_qos(config.prefetch_count, BasicQosOptions::default())
        .await
        .context("Failed to set QoS")?;

    info!(prefetch_count = config.prefetch_count, "rabbitmq_qos_set");

    // Declare the queue (durable to match the producers)
    channel
        .queue_declare(
            &config.queue_name,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .context("Failed to declare task queue")?;

    info!(queue = %config.queue_name, "rabbitmq_queue_declared");

    // Start consuming messages
    let mut consumer = channel
        .basic_consume(
            &config.queue_name,
            "taskline-worker",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .context("Failed to start consumer")?;

    info!(queue = %config.queue_name, "rabbitmq_consumer_started");
    info!("worker_ready");

    // Clone channel for use in message handler
    let channel = Arc::new(channel);
    let queue_name = Arc::new(config.queue_name.clone());

    // Create shutdown signal future
    let shutdown = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT"),
            _ = terminate => info!("Received SIGTERM"),
        }
    };

    // Pin the shutdown future
    tokio::pin!(shutdown);

    // Process messages until shutdown
    loop {
        tokio::select! {
            // Check for shutdown signal
            _ = &mut shutdown => {
                info!("worker_stopping");
                break;
            }
            // Process next message
            delivery = consumer.next() => {
                match delivery {
                    Some(Ok(delivery)) => {
                        let delivery_tag = delivery.delivery_tag;

                        // Clone resources for the spawned task
                        let channel = Arc::clone(&channel);
                        let queue_name = Arc::clone(&queue_name);

                        // Handle the delivery off the select loop so shutdown
                        // stays responsive during the simulated work. With
                        // prefetch 1 the broker delivers the next task only
                        // after this one is acked.
                        tokio::spawn(async move {
                            match Task::parse(&delivery.data) {
                                Ok(task) => {
                                    info!(
                                        queue = %queue_name,
                                        task = %task.text(),
                                        delivery_tag = delivery_tag,
                                        "task_received"
                                    );

                                    // Simulate work: one second per dot
                                    tokio::time::sleep(task.workload()).await;

                                    // Acknowledge so the broker can delete
                                    // the message from the queue
                                    if let Err(e) = channel
                                        .basic_ack(delivery_tag, BasicAckOptions::default())
                                        .await
                                    {
                                        error!(
                                            delivery_tag = delivery_tag,
                                            error = %e,
                                            "rabbitmq_ack_failed"
                                        );
                                    } else {
                                        info!(
                                            queue = %queue_name,
                                            seconds = task.workload().as_secs(),
                                            "task_done"
                                        );
                                    }
                                }
                                Err(e) => {
                                    error!(
                                        delivery_tag = delivery_tag,
                                        error = %e,
                                        "task_parse_failed"
                                    );

                                    // Reject without requeue: the payload is
                                    // malformed and will never parse
                                    if let Err(nack_err) = channel
                                        .basic_nack(
                                            delivery_tag,
                                            BasicNackOptions {
                                                requeue: false,
                                                ..Default::default()
                                            },
                                        )
                                        .await
                                    {
                                        error!(
                                            delivery_tag = delivery_tag,
                                            error = %nack_err,
                                            "rabbitmq_nack_failed"
                                        );
                                    }
                                }
                            }
                        });
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "rabbitmq_delivery_error");
                    }
                    None => {
                        warn!("rabbitmq_consumer_closed");
                        break;
                    }
                }
            }
        }
    }

    // Close the connection; any unacked in-flight task returns to the queue
    if let Err(e) = conn.close(200, "Normal shutdown").await {
        warn!(error = %e, "rabbitmq_connection_close_error");
    }

    info!("worker_shutdown_complete");
    Ok(())
}
