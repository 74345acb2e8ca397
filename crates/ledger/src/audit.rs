//! Append-only transaction history.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use medstock_core::LedgerResult;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One parsed line of the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// 1-based line position in the log file.
    pub index: usize,
    /// Bracketed timestamp, or `"N/A"` for lines missing the prefix.
    pub timestamp: String,
    pub message: String,
}

/// Append-only, timestamped transaction log.
///
/// Write-only for the store's mutations, read-only for reporting. The
/// format is best-effort human-readable text, not a strict one: reading
/// never fails on a malformed line.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `"[YYYY-MM-DD HH:MM:SS] message"` line. Existing content
    /// is never rewritten or truncated.
    pub fn append(&self, message: &str) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", Local::now().format(TIMESTAMP_FORMAT), message)?;
        Ok(())
    }

    /// Read every recorded line, oldest first.
    ///
    /// A line that does not start with `[` is surfaced with timestamp
    /// `"N/A"` and the raw text as its message instead of failing the read.
    pub fn read_all(&self) -> LedgerResult<Vec<AuditRecord>> {
        let raw = self.raw()?;
        let mut records = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_line(i + 1, line));
        }
        Ok(records)
    }

    /// The log's verbatim contents; empty if nothing has been recorded.
    pub fn raw(&self) -> LedgerResult<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}

fn parse_line(index: usize, line: &str) -> AuditRecord {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some((timestamp, message)) = rest.split_once("] ") {
            return AuditRecord {
                index,
                timestamp: timestamp.to_string(),
                message: message.to_string(),
            };
        }
    }
    AuditRecord {
        index,
        timestamp: "N/A".to_string(),
        message: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_log() -> (tempfile::TempDir, AuditLog) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let log = AuditLog::new(dir.path().join("history.txt"));
        (dir, log)
    }

    #[test]
    fn append_writes_bracketed_timestamp_lines() {
        let (_dir, log) = test_log();
        log.append("Added medicine: Paracetamol (B1), qty=100, price=2.5")
            .unwrap();

        let raw = log.raw().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.trim_end().ends_with("] Added medicine: Paracetamol (B1), qty=100, price=2.5"));
    }

    #[test]
    fn append_never_truncates() {
        let (_dir, log) = test_log();
        log.append("first").unwrap();
        log.append("second").unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second");
        assert_eq!(records[0].timestamp.len(), 19);
    }

    #[test]
    fn records_are_indexed_by_line_position() {
        let (_dir, log) = test_log();
        log.append("first").unwrap();
        log.append("second").unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records[0].index, 1);
        assert_eq!(records[1].index, 2);
    }

    #[test]
    fn malformed_line_surfaces_as_na() {
        let (_dir, log) = test_log();
        fs::write(log.path(), "not a log line\n[2024-05-01 12:00:00] ok\n").unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "N/A");
        assert_eq!(records[0].message, "not a log line");
        assert_eq!(records[1].timestamp, "2024-05-01 12:00:00");
        assert_eq!(records[1].message, "ok");
    }

    #[test]
    fn missing_file_reads_empty() {
        let (_dir, log) = test_log();
        assert!(log.read_all().unwrap().is_empty());
        assert_eq!(log.raw().unwrap(), "");
    }
}
