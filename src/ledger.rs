use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Append-only record of ticket keys that already received an estimate.
///
/// Plain text, one key per line, created lazily on the first `record` call.
/// Loading a missing file yields an empty ledger; any other read failure
/// propagates. Single-writer by assumption: the runner is never executed
/// concurrently with itself.
pub struct CompletedTicketLedger {
    path: PathBuf,
    completed: HashSet<String>,
}

impl CompletedTicketLedger {
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let completed = match fs::read_to_string(&path) {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashSet::new(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self { path, completed })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.completed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Appends `key` to the file and marks it completed for this run.
    pub fn record(&mut self, key: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{key}")?;
        self.completed.insert(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn ledger_path(dir: &TempDir) -> PathBuf {
        dir.path().join("completed_tickets.txt")
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();

        let ledger = CompletedTicketLedger::load(ledger_path(&dir)).unwrap();

        assert_eq!(ledger.len(), 0);
        assert!(!ledger.contains("CF-1"));
    }

    #[test]
    fn trims_whitespace_and_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = ledger_path(&dir);
        fs::write(&path, "  CF-1  \n\nCF-2\n   \nCF-1\n").unwrap();

        let ledger = CompletedTicketLedger::load(&path).unwrap();

        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("CF-1"));
        assert!(ledger.contains("CF-2"));
    }

    #[test]
    fn record_creates_the_file_and_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = ledger_path(&dir);

        let mut ledger = CompletedTicketLedger::load(&path).unwrap();
        ledger.record("CF-7").unwrap();
        ledger.record("CF-8").unwrap();
        assert!(ledger.contains("CF-7"));

        let reloaded = CompletedTicketLedger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("CF-7"));
        assert!(reloaded.contains("CF-8"));
    }

    #[test]
    fn record_appends_after_existing_entries() {
        let dir = TempDir::new().unwrap();
        let path = ledger_path(&dir);
        fs::write(&path, "CF-1\n").unwrap();

        let mut ledger = CompletedTicketLedger::load(&path).unwrap();
        ledger.record("CF-2").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "CF-1\nCF-2\n");
    }

    #[test]
    fn load_propagates_read_failures() {
        let dir = TempDir::new().unwrap();

        // A directory at the ledger path is a read failure, not an empty ledger.
        let result = CompletedTicketLedger::load(dir.path());

        assert!(result.is_err());
    }
}
