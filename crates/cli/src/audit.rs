//! Append-only audit log files.
//!
//! Every operation appends one timestamped line to the operations log;
//! failures additionally land in a separate error log so they survive
//! scrollback.

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const OPERATIONS_LOG: &str = "did_operations.log";
const ERRORS_LOG: &str = "did_errors.log";

pub struct AuditLog {
    operations: PathBuf,
    errors: PathBuf,
}

impl AuditLog {
    /// Open the audit log under `log_dir`, creating the directory if needed.
    pub fn open(log_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = log_dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            operations: dir.join(OPERATIONS_LOG),
            errors: dir.join(ERRORS_LOG),
        })
    }

    pub fn record(&self, message: &str) -> Result<()> {
        append_line(&self.operations, message)
    }

    pub fn error(&self, message: &str) -> Result<()> {
        append_line(&self.errors, &format!("ERROR: {message}"))
    }
}

fn append_line(path: &Path, message: &str) -> Result<()> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "[{timestamp}] {message}")?;
    Ok(())
}
