//! Append-only audit log
//!
//! One tab-separated line per processed input:
//!
//! ```text
//! <RFC 3339 timestamp>  <operation>  <variant>  <input>  <verdict>
//! ```

use crate::ops::{Outcome, Request};
use chrono::{SecondsFormat, Utc};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Audit log errors.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("could not open audit log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write audit log: {0}")]
    Write(#[from] io::Error),
}

/// Open handle on the audit file.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Open {
                path: path.clone(),
                source,
            })?;
        log::debug!("audit log opened at {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the line for one processed request.
    pub fn record(&mut self, request: &Request, outcome: &Outcome) -> Result<(), AuditError> {
        let line = format_entry(
            &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            request,
            outcome,
        );
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Build an audit line with the given timestamp.
pub fn format_entry(timestamp: &str, request: &Request, outcome: &Outcome) -> String {
    let input = request.input.to_string().replace(['\t', '\n'], " ");
    format!(
        "{}\t{}\t{}\t{}\t{}",
        timestamp,
        request.kind,
        request.variant,
        input,
        outcome.verdict()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{int, Input, OpKind, Variant};

    fn temp_log(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push("overflow_lab_tests");
        std::fs::create_dir_all(&path).ok();
        path.push(format!("{}_{}.log", name, std::process::id()));
        std::fs::remove_file(&path).ok();
        path
    }

    #[test]
    fn test_format_entry() {
        let request = Request::new(OpKind::Int, Variant::Safe, Input::Scalar(5));
        let outcome = int::safe_write(5, 42);
        assert_eq!(
            format_entry("2024-01-01T00:00:00Z", &request, &outcome),
            "2024-01-01T00:00:00Z\tint\tsafe\t5\trejected"
        );
    }

    #[test]
    fn test_record_appends() {
        let path = temp_log("append");
        let request = Request::new(OpKind::Int, Variant::Safe, Input::Scalar(1));
        let outcome = int::safe_write(1, 42);

        let mut log = AuditLog::open(&path).unwrap();
        log.record(&request, &outcome).unwrap();
        drop(log);

        let mut log = AuditLog::open(&path).unwrap();
        log.record(&request, &outcome).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\tint\tsafe\t1\tok"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_open_failure() {
        let err = AuditLog::open("/definitely/not/here/audit.log").unwrap_err();
        assert!(matches!(err, AuditError::Open { .. }));
    }
}
