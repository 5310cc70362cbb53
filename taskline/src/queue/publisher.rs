//! Async RabbitMQ publisher for enqueueing task messages.
//!
//! The publisher maintains a persistent connection and channel to RabbitMQ,
//! connecting lazily on first publish and reconnecting on failure, so one
//! instance can be shared across a whole producer run.

use std::sync::Arc;

use anyhow::{Context, Result};
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::task::Task;

/// Async RabbitMQ publisher with connection management.
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    url: String,
    queue_name: String,
    persistent: bool,
    connection: RwLock<Option<Connection>>,
    channel: RwLock<Option<Channel>>,
}

impl Publisher {
    /// Create a new publisher for the given RabbitMQ URL and queue.
    pub fn new(url: String, queue_name: String, persistent: bool) -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                url,
                queue_name,
                persistent,
                connection: RwLock::new(None),
                channel: RwLock::new(None),
            }),
        }
    }

    /// Ensure we have a valid connection and channel.
    async fn ensure_connected(&self) -> Result<Channel> {
        // Check if we have a valid channel
        {
            let channel = self.inner.channel.read().await;
            if let Some(ch) = channel.as_ref() {
                if ch.status().connected() {
                    return Ok(ch.clone());
                }
            }
        }

        // Need to reconnect
        let mut connection = self.inner.connection.write().await;
        let mut channel = self.inner.channel.write().await;

        // Double-check after acquiring write lock
        if let Some(ch) = channel.as_ref() {
            if ch.status().connected() {
                return Ok(ch.clone());
            }
        }

        info!("rabbitmq_publisher_connecting");

        let conn = Connection::connect(&self.inner.url, ConnectionProperties::default())
            .await
            .context("Failed to connect to RabbitMQ")?;

        info!("rabbitmq_publisher_connected");

        let ch = conn
            .create_channel()
            .await
            .context("Failed to create channel")?;

        // Declare the task queue (idempotent operation). A durable queue
        // survives a broker restart.
        ch.queue_declare(
            &self.inner.queue_name,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .context("Failed to declare task queue")?;

        info!(queue = %self.inner.queue_name, "rabbitmq_queue_declared");

        *connection = Some(conn);
        *channel = Some(ch.clone());

        Ok(ch)
    }

    /// Publish a task to the queue.
    pub async fn publish(&self, task: &Task) -> Result<()> {
        let channel = self.ensure_connected().await?;

        let body = task.text().as_bytes();

        let mut properties = BasicProperties::default().with_content_type("text/plain".into());
        if self.inner.persistent {
            // Delivery mode 2: message is written to disk with the queue
            properties = properties.with_delivery_mode(2);
        }

        channel
            .basic_publish(
                "",
                &self.inner.queue_name,
                BasicPublishOptions::default(),
                body,
                properties,
            )
            .await
            .context("Failed to publish to task queue")?
            .await
            .context("Failed to confirm publish")?;

        info!(
            queue = %self.inner.queue_name,
            task = %task.text(),
            body_length = body.len(),
            "task_sent"
        );

        Ok(())
    }

    /// Close the connection gracefully.
    pub async fn close(&self) {
        let mut connection = self.inner.connection.write().await;
        let mut channel = self.inner.channel.write().await;

        if let Some(ch) = channel.take() {
            if let Err(e) = ch.close(200, "Normal shutdown").await {
                warn!(error = %e, "rabbitmq_channel_close_error");
            }
        }

        if let Some(conn) = connection.take() {
            if let Err(e) = conn.close(200, "Normal shutdown").await {
                warn!(error = %e, "rabbitmq_connection_close_error");
            }
        }

        info!("rabbitmq_publisher_closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_creation() {
        let publisher = Publisher::new(
            "amqp://localhost:5672".to_string(),
            "task_queue".to_string(),
            true,
        );
        // Just verify it can be created
        assert!(Arc::strong_count(&publisher.inner) == 1);
    }
}
