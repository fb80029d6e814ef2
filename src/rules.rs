use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::error::Result;
use crate::models::Transaction;

fn persist_default() -> bool {
    true
}

/// One keyword rule. Keywords are case-folded on insertion and matched as
/// substrings against the description and recipient fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub keyword: String,
    pub category: Category,
    /// Session-only rules classify for the rest of the run but are never
    /// written to the rule file.
    #[serde(skip_serializing, default = "persist_default")]
    pub persist: bool,
}

/// The persisted keyword → category mapping. Rules are kept as a list, not a
/// hash map, so classification iterates them in insertion order and the first
/// match always wins deterministically.
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Load the rule file. A missing file is a fresh start; a malformed file
    /// is a warning and an empty rule set; the file itself is left in place.
    pub fn load(path: &Path) -> RuleStore {
        let rules = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<Rule>>(&content) {
                    Ok(rules) => rules,
                    Err(e) => {
                        eprintln!(
                            "Warning: rule file {} is malformed ({e}); starting with no rules",
                            path.display()
                        );
                        Vec::new()
                    }
                },
                Err(e) => {
                    eprintln!(
                        "Warning: could not read rule file {} ({e}); starting with no rules",
                        path.display()
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        RuleStore { path: path.to_path_buf(), rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Add (or overwrite) a rule. The keyword is case-folded; a duplicate
    /// keyword keeps its position and takes the new category. When `persist`
    /// is set the full rule set is rewritten before returning, so a rule the
    /// caller believes saved cannot be lost.
    pub fn add_rule(&mut self, keyword: &str, category: Category, persist: bool) -> Result<()> {
        let keyword = keyword.trim().to_lowercase();
        match self.rules.iter_mut().find(|r| r.keyword == keyword) {
            Some(rule) => {
                rule.category = category;
                rule.persist = persist;
            }
            None => self.rules.push(Rule { keyword, category, persist }),
        }
        if persist {
            self.flush()?;
        }
        Ok(())
    }

    /// First rule whose keyword is a case-insensitive substring of the
    /// description or recipient. The returned category carries the kind
    /// derived from this transaction's sign, not the one the rule was
    /// created with.
    pub fn classify(&self, transaction: &Transaction) -> Option<Category> {
        if transaction.description.trim().is_empty() && transaction.recipient.trim().is_empty() {
            return None;
        }
        let description = transaction.description.to_lowercase();
        let recipient = transaction.recipient.to_lowercase();
        self.rules
            .iter()
            .find(|r| description.contains(&r.keyword) || recipient.contains(&r.keyword))
            .map(|r| Category::for_amount(r.category.name, transaction.amount))
    }

    /// Rewrite the rule file with every persisted rule, in order.
    pub fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let persisted: Vec<&Rule> = self.rules.iter().filter(|r| r.persist).collect();
        let json = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }
}
