//! # Order Log
//!
//! Append-only text log with one line per committed order:
//!
//! ```text
//! 2024-05-01 12:00:00.123456 - Processed order ord-1 for $115.00
//! ```
//!
//! The file is opened, written and closed for every line. The handle is
//! dropped at the end of `append_line` whether or not the write succeeded.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{PipelineError, PipelineResult};

/// Destination for order log lines.
#[async_trait]
pub trait OrderLog: Send + Sync {
    /// Appends `line` plus a newline to `destination`.
    async fn append_line(&self, destination: &Path, line: &str) -> PipelineResult<()>;
}

/// Writes log lines to files on disk, creating the parent directory on
/// first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOrderLog;

#[async_trait]
impl OrderLog for FileOrderLog {
    async fn append_line(&self, destination: &Path, line: &str) -> PipelineResult<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::LogWrite(format!("{}: {}", parent.display(), e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .await
            .map_err(|e| PipelineError::LogWrite(format!("{}: {}", destination.display(), e)))?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| PipelineError::LogWrite(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| PipelineError::LogWrite(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("fulfillment-log-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_appends_lines_and_creates_dir() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("orders.log");

        FileOrderLog.append_line(&path, "first").await.unwrap();
        FileOrderLog.append_line(&path, "second").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_log_write_error() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();

        // The destination is a directory, so it can't be opened for append.
        let err = FileOrderLog.append_line(&dir, "line").await.unwrap_err();
        assert!(matches!(err, PipelineError::LogWrite(_)));

        std::fs::remove_dir_all(dir).ok();
    }
}
