//! Task payload type.
//!
//! A task is an opaque line of text. The only thing the worker derives from it
//! is the synthetic workload: one second of simulated work per `.` character.

use std::time::Duration;

use thiserror::Error;

/// Errors raised when validating a task payload.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Payload was empty (or whitespace only)
    #[error("task payload is empty")]
    Empty,

    /// Payload bytes were not valid UTF-8
    #[error("task payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// An opaque text task message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    text: String,
}

impl Task {
    /// Create a task from text, rejecting payloads that are empty after
    /// trimming. The text itself is stored untrimmed.
    pub fn new(text: impl Into<String>) -> Result<Self, TaskError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskError::Empty);
        }
        Ok(Task { text })
    }

    /// Parse a task from a raw message body.
    pub fn parse(body: &[u8]) -> Result<Self, TaskError> {
        let text = std::str::from_utf8(body)?;
        Task::new(text)
    }

    /// The task text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Simulated work duration: one second per `.` in the text.
    pub fn workload(&self) -> Duration {
        let dots = self.text.bytes().filter(|b| *b == b'.').count();
        Duration::from_secs(dots as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_counts_dots() {
        let task = Task::new("Second task.....").unwrap();
        assert_eq!(task.workload(), Duration::from_secs(5));
    }

    #[test]
    fn test_workload_no_dots() {
        let task = Task::new("quick one").unwrap();
        assert_eq!(task.workload(), Duration::from_secs(0));
    }

    #[test]
    fn test_workload_counts_interior_dots() {
        let task = Task::new("a.b.c").unwrap();
        assert_eq!(task.workload(), Duration::from_secs(2));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Task::new(""), Err(TaskError::Empty)));
        assert!(matches!(Task::new("   \t"), Err(TaskError::Empty)));
    }

    #[test]
    fn test_text_preserved_untrimmed() {
        let task = Task::new("  padded task.  ").unwrap();
        assert_eq!(task.text(), "  padded task.  ");
        assert_eq!(task.workload(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_valid_body() {
        let task = Task::parse(b"First task.").unwrap();
        assert_eq!(task.text(), "First task.");
    }

    #[test]
    fn test_parse_invalid_utf8() {
        assert!(matches!(
            Task::parse(&[0xff, 0xfe]),
            Err(TaskError::InvalidUtf8(_))
        ));
    }
}
