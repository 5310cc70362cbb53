//! CSV task source for the batch producer.
//!
//! Tasks are read from a headerless CSV file, one task per row; only the
//! first column is used. Blank rows are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use crate::task::Task;

/// Read tasks from the first column of a CSV file.
///
/// Rows whose first column is empty after trimming are skipped. A missing or
/// unreadable file is an error.
pub fn read_tasks(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open tasks file {}", path.display()))?;

    let mut tasks = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("Failed to read record from {}", path.display()))?;

        let Some(text) = record.get(0) else {
            continue;
        };

        match Task::new(text) {
            Ok(task) => tasks.push(task),
            // Blank rows are tolerated, not fatal
            Err(_) => continue,
        }
    }

    info!(path = %path.display(), count = tasks.len(), "tasks_loaded");

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_reads_first_column() {
        let (_dir, path) = write_csv("First task.,extra\nSecond task..\n");
        let tasks = read_tasks(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text(), "First task.");
        assert_eq!(tasks[1].text(), "Second task..");
    }

    #[test]
    fn test_skips_blank_rows() {
        let (_dir, path) = write_csv("First task.\n\nThird task...\n");
        let tasks = read_tasks(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].text(), "Third task...");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_tasks(dir.path().join("no_such.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_rows_with_varying_columns() {
        let (_dir, path) = write_csv("one.\ntwo..,notes,more\nthree...\n");
        let tasks = read_tasks(&path).unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].text(), "two..");
    }
}
