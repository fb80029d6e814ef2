use std::path::Path;

use chrono::NaiveDate;

use crate::error::Result;
use crate::journal::AMOUNT_EPSILON;
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Field parsing helpers
// ---------------------------------------------------------------------------

/// Parse a statement amount: strips quotes, currency grouping spaces and
/// non-breaking spaces, and accepts the decimal comma the bank export uses.
pub fn parse_amount(raw: &str) -> f64 {
    let s: String = raw
        .chars()
        .filter(|c| *c != '"' && *c != ' ' && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    s.trim().parse().unwrap_or(0.0)
}

/// Parse a statement date in any of the formats the exports are known to use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y", "%m/%d/%Y"];
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
}

/// Collapse a debit/credit column pair into one signed amount. Exactly one of
/// the two may be non-zero; anything else is unresolvable here and comes back
/// as zero for the orchestrator to skip.
fn signed_amount(debit: f64, credit: f64) -> f64 {
    if debit < 0.0 && credit.abs() < AMOUNT_EPSILON {
        debit
    } else if credit > 0.0 && debit.abs() < AMOUNT_EPSILON {
        credit
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Statement loading
// ---------------------------------------------------------------------------

pub struct LoadResult {
    pub transactions: Vec<Transaction>,
    pub skipped_rows: usize,
}

/// Load a bank-statement CSV export. Column layout of the source bank:
/// account, transaction date, settlement date, kind, counter-account,
/// recipient, description, debit, credit, balance, currency. The first row is
/// a header; blank or short rows are counted and skipped.
pub fn load_statement(path: &Path) -> Result<LoadResult> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut transactions = Vec::new();
    let mut skipped_rows = 0usize;

    for (i, result) in rdr.records().enumerate() {
        if i == 0 {
            continue; // header
        }
        let Ok(record) = result else {
            skipped_rows += 1;
            continue;
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < 11 {
            skipped_rows += 1;
            continue;
        }

        let debit = parse_amount(&record[7]);
        let credit = parse_amount(&record[8]);

        transactions.push(Transaction {
            account: record[0].trim().to_string(),
            transaction_date: record[1].trim().to_string(),
            settlement_date: record[2].trim().to_string(),
            kind: record[3].trim().to_string(),
            counter_account: record[4].trim().to_string(),
            recipient: record[5].trim().to_string(),
            description: record[6].trim().to_string(),
            amount: signed_amount(debit, credit),
            balance: parse_amount(&record[9]),
            currency: record[10].trim().to_string(),
            category: None,
        });
    }

    Ok(LoadResult { transactions, skipped_rows })
}
