use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fmt::eq_ignore_case;

/// Amount tolerance for identity comparison: below the smallest currency
/// unit, wide enough to absorb drift from re-parsed CSV values.
pub const AMOUNT_EPSILON: f64 = 0.001;

/// Fingerprint of one applied transaction. Identity is (day, category,
/// amount, recipient); the sheet name is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub recipient: String,
    pub sheet: String,
}

/// The idempotence store: every amount ever merged into the budget leaves a
/// fingerprint here, and a fingerprint match means the transaction is already
/// applied. Loaded once per run; the file is rewritten in full on each insert.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Load the journal file. Missing → empty; corrupt → warning + empty with
    /// the original file left in place.
    pub fn load(path: &Path) -> Journal {
        let entries = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<JournalEntry>>(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        eprintln!(
                            "Warning: journal file {} is malformed ({e}); starting empty",
                            path.display()
                        );
                        Vec::new()
                    }
                },
                Err(e) => {
                    eprintln!(
                        "Warning: could not read journal file {} ({e}); starting empty",
                        path.display()
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        Journal { path: path.to_path_buf(), entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exists(&self, date: NaiveDate, category: &str, amount: f64, recipient: &str) -> bool {
        self.entries.iter().any(|e| {
            e.date == date
                && eq_ignore_case(&e.category, category)
                && (e.amount - amount).abs() < AMOUNT_EPSILON
                && eq_ignore_case(&e.recipient, recipient)
        })
    }

    /// Append an entry and rewrite the file. Returns false, and mutates
    /// nothing, when an entry with the same identity key is already present.
    pub fn add_entry(&mut self, entry: JournalEntry) -> Result<bool> {
        if self.exists(entry.date, &entry.category, entry.amount, &entry.recipient) {
            return Ok(false);
        }
        self.entries.push(entry);
        self.flush()?;
        Ok(true)
    }

    /// Rewrite the journal file in full.
    pub fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }
}
