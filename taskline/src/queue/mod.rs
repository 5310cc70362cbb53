//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - The shared task queue name
//! - Async publisher for enqueueing task messages
//!
//! ## Architecture
//!
//! ```text
//! taskline-send / taskline-send-csv → task_queue → taskline-worker (xN)
//! ```

pub mod publisher;

pub use publisher::Publisher;

/// Default name of the durable task queue.
pub const TASK_QUEUE: &str = "task_queue";
