use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::{self, NoReview};
use crate::cli::review::ConsoleReviewer;
use crate::error::Result;
use crate::fmt::money;
use crate::journal::Journal;
use crate::layout::SheetLayout;
use crate::loader::load_statement;
use crate::reconciler::{reconcile, Outcome, RunReport};
use crate::rules::RuleStore;
use crate::settings;
use crate::workbook::{column_letters, Workbook};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &str,
    budget: &str,
    rules_path: Option<&str>,
    journal_path: Option<&str>,
    layout_path: Option<&str>,
    no_review: bool,
) -> Result<()> {
    let loaded = load_statement(Path::new(file))?;
    if loaded.skipped_rows > 0 {
        println!(
            "Loaded {} transactions from {file} ({} rows skipped)",
            loaded.transactions.len(),
            loaded.skipped_rows
        );
    } else {
        println!("Loaded {} transactions from {file}", loaded.transactions.len());
    }

    let rules_path = rules_path
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_rules_path);
    let mut rules = RuleStore::load(&rules_path);
    let mut transactions = loaded.transactions;

    let outcome = if no_review {
        categorizer::classify_with_handler(&mut transactions, &mut rules, &mut NoReview)?
    } else {
        categorizer::classify_with_handler(&mut transactions, &mut rules, &mut ConsoleReviewer)?
    };
    println!(
        "{} auto-classified, {} reviewed, {} unresolved",
        outcome.auto_classified, outcome.reviewed, outcome.unresolved
    );
    if !outcome.invalid.is_empty() {
        println!(
            "{}",
            format!("{} classification decision(s) were invalid", outcome.invalid.len()).red()
        );
    }

    let layout = match layout_path {
        Some(p) => SheetLayout::load(Path::new(p))?,
        None => SheetLayout::default(),
    };
    let journal_path = journal_path
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_journal_path);
    let mut journal = Journal::load(&journal_path);
    let mut workbook = Workbook::open(Path::new(budget))?;

    let report = reconcile(&mut workbook, &layout, &mut journal, &transactions)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Recipient", "Category", "Amount", "Result"]);
    for r in &report.results {
        let result = match &r.outcome {
            Outcome::Written { sheet, row, col, .. } => {
                format!("written {sheet}!{}{row}", column_letters(*col))
            }
            Outcome::AlreadyApplied => "already applied".to_string(),
            Outcome::Skipped(reason) => format!("skipped: {reason}"),
        };
        table.add_row(vec![
            Cell::new(&r.date),
            Cell::new(&r.recipient),
            Cell::new(r.category.as_deref().unwrap_or("-")),
            Cell::new(money(r.amount)),
            Cell::new(result),
        ]);
    }
    println!("{table}");

    println!(
        "{} written, {} already applied, {} skipped",
        report.written.to_string().green(),
        report.already_applied.to_string().yellow(),
        report.skipped.to_string().red()
    );
    match &report.backup {
        Some(path) => println!("{}", format!("Backup: {}", path.display()).dimmed()),
        None => println!("{}", "Warning: no backup was created".yellow()),
    }
}
