//! Taskline - RabbitMQ work-queue demonstration.
//!
//! This library provides shared modules for the three Taskline binaries:
//! - `taskline-send`: One-shot producer taking the task text from the CLI
//! - `taskline-send-csv`: Batch producer reading tasks from a CSV file
//! - `taskline-worker`: Consumer that simulates work and acks each task
//!
//! ## Architecture
//!
//! ```text
//! taskline-send / taskline-send-csv → task_queue → taskline-worker (xN)
//! ```
//!
//! Workers compete for messages from the shared durable queue; each task is
//! delivered to exactly one worker. A task's synthetic workload is one second
//! per `.` character in its text.

pub mod config;
pub mod queue;
pub mod source;
pub mod task;

// Re-export commonly used types
pub use config::Config;
pub use queue::{Publisher, TASK_QUEUE};
pub use task::{Task, TaskError};
