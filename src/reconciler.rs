//! The reconciliation run: backup, then one pass over the transactions in
//! input order, then a single document save. Every transaction is processed
//! independently; any per-transaction problem is recorded in the run report
//! and processing moves on. Only opening and saving the document abort a run.

use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::accumulator;
use crate::error::Result;
use crate::fmt::money;
use crate::journal::{Journal, JournalEntry, AMOUNT_EPSILON};
use crate::layout::SheetLayout;
use crate::loader::parse_date;
use crate::models::Transaction;
use crate::resolver::{self, Refusal, Target};
use crate::workbook::{column_letters, Workbook};

// ---------------------------------------------------------------------------
// Run log: the append-only text file kept beside the document
// ---------------------------------------------------------------------------

pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn beside(document: &Path) -> RunLog {
        let dir = document.parent().unwrap_or_else(|| Path::new("."));
        RunLog { path: dir.join("budget_update_log.txt") }
    }

    /// Append a timestamped line. Logging failures never disturb the run.
    pub fn record(&self, message: &str) {
        use std::io::Write;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{stamp}] {message}\n");
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unclassified,
    BadDate(String),
    UnknownMonth(u32),
    SheetNotFound(String),
    SectionHeaderNotFound(String),
    LabelNotFound(String),
    Protected { row: u32, col: u32 },
    AmbiguousAmount,
    SignMismatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unclassified => write!(f, "no category assigned"),
            SkipReason::BadDate(s) => write!(f, "unparsable date '{s}'"),
            SkipReason::UnknownMonth(m) => write!(f, "no sheet mapped for month {m}"),
            SkipReason::SheetNotFound(name) => write!(f, "sheet '{name}' not found"),
            SkipReason::SectionHeaderNotFound(h) => write!(f, "section header '{h}' not found"),
            SkipReason::LabelNotFound(l) => write!(f, "label '{l}' not found on sheet"),
            SkipReason::Protected { row, col } => {
                write!(f, "target {}{row} is protected", column_letters(*col))
            }
            SkipReason::AmbiguousAmount => write!(f, "amount is zero or ambiguous"),
            SkipReason::SignMismatch => write!(f, "category does not match the transaction sign"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Written { sheet: String, row: u32, col: u32, formula: String },
    AlreadyApplied,
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct TxnReport {
    pub index: usize,
    pub date: String,
    pub recipient: String,
    pub category: Option<String>,
    pub amount: f64,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct RunReport {
    pub backup: Option<PathBuf>,
    pub results: Vec<TxnReport>,
    pub written: usize,
    pub already_applied: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// The run
// ---------------------------------------------------------------------------

pub fn reconcile(
    workbook: &mut Workbook,
    layout: &SheetLayout,
    journal: &mut Journal,
    transactions: &[Transaction],
) -> Result<RunReport> {
    let log = RunLog::beside(workbook.path());
    log.record(&format!("Run started with {} transactions", transactions.len()));

    let backup = match workbook.write_backup() {
        Ok(path) => {
            log.record(&format!("Backup created: {}", path.display()));
            Some(path)
        }
        Err(e) => {
            log.record(&format!("Backup failed ({e}); continuing without one"));
            None
        }
    };

    let mut results = Vec::with_capacity(transactions.len());
    let (mut written, mut already_applied, mut skipped) = (0usize, 0usize, 0usize);

    for (index, t) in transactions.iter().enumerate() {
        let outcome = apply_transaction(workbook, layout, journal, t, &log);
        let ident = format!(
            "{} | {} | {}",
            t.transaction_date,
            t.recipient,
            t.category.map(|c| c.name.label()).unwrap_or("-"),
        );
        match &outcome {
            Outcome::Written { sheet, row, col, formula } => {
                written += 1;
                log.record(&format!(
                    "Written: {ident} | {} -> {sheet}!{}{row} := {formula}",
                    money(t.amount),
                    column_letters(*col),
                ));
            }
            Outcome::AlreadyApplied => {
                already_applied += 1;
                log.record(&format!("Already applied: {ident} | {}", money(t.amount)));
            }
            Outcome::Skipped(reason) => {
                skipped += 1;
                log.record(&format!("Skipped: {ident} | {} | {reason}", money(t.amount)));
            }
        }
        results.push(TxnReport {
            index,
            date: t.transaction_date.clone(),
            recipient: t.recipient.clone(),
            category: t.category.map(|c| c.name.label().to_string()),
            amount: t.amount,
            outcome,
        });
    }

    workbook.save()?;
    if let Err(e) = journal.flush() {
        log.record(&format!("Warning: journal flush failed: {e}"));
    }
    log.record(&format!(
        "Budget document saved; {written} written, {already_applied} already applied, {skipped} skipped"
    ));

    Ok(RunReport { backup, results, written, already_applied, skipped })
}

fn apply_transaction(
    workbook: &mut Workbook,
    layout: &SheetLayout,
    journal: &mut Journal,
    t: &Transaction,
    log: &RunLog,
) -> Outcome {
    let Some(category) = t.category else {
        return Outcome::Skipped(SkipReason::Unclassified);
    };
    let Some(date) = parse_date(&t.transaction_date) else {
        return Outcome::Skipped(SkipReason::BadDate(t.transaction_date.clone()));
    };
    let Some(sheet_name) = layout.sheet_for_month(date.month()) else {
        return Outcome::Skipped(SkipReason::UnknownMonth(date.month()));
    };
    let sheet_name = sheet_name.to_string();

    if t.amount.abs() < AMOUNT_EPSILON {
        return Outcome::Skipped(SkipReason::AmbiguousAmount);
    }
    if !category.agrees_with_sign(t.amount) {
        return Outcome::Skipped(SkipReason::SignMismatch);
    }
    let amount = t.amount.abs();

    let Some(sheet) = workbook.sheet_mut(&sheet_name) else {
        return Outcome::Skipped(SkipReason::SheetNotFound(sheet_name));
    };

    let target = match resolver::resolve(sheet, layout, category, date.day()) {
        Ok(target) => target,
        Err(Refusal::LabelNotFound) => {
            return Outcome::Skipped(SkipReason::LabelNotFound(category.name.label().to_string()))
        }
        Err(Refusal::SectionHeaderNotFound) => {
            return Outcome::Skipped(SkipReason::SectionHeaderNotFound(
                layout.variable_header.clone(),
            ))
        }
        Err(Refusal::Protected { row, col }) => {
            return Outcome::Skipped(SkipReason::Protected { row, col })
        }
    };

    if journal.exists(date, category.name.label(), amount, &t.recipient) {
        return Outcome::AlreadyApplied;
    }

    let (row, col) = target.coords();
    let formula = accumulator::merge(sheet.formula(row, col), sheet.text(row, col), amount);
    sheet.set_formula(row, col, &formula);
    sheet.set_format(row, col, "#,##0.00");

    // A variable row keeps a running total; rows without their own autosum
    // formula get a plain numeric sum over the day columns.
    if let Target::DayColumn { row, total_col, .. } = target {
        if sheet.formula(row, total_col).trim().is_empty() && !layout.is_protected(row, total_col) {
            let sum: f64 = layout
                .day_cols()
                .filter_map(|c| accumulator::cell_value(sheet.formula(row, c), sheet.text(row, c)))
                .sum();
            sheet.set_number(row, total_col, sum);
        }
    }

    let entry = JournalEntry {
        date,
        category: category.name.label().to_string(),
        amount,
        recipient: t.recipient.clone(),
        sheet: sheet_name.clone(),
    };
    if let Err(e) = journal.add_entry(entry) {
        log.record(&format!("Warning: journal write failed: {e}"));
    }

    Outcome::Written { sheet: sheet_name, row, col, formula }
}
