use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::{self, NoReview};
use crate::cli::review::ConsoleReviewer;
use crate::error::Result;
use crate::fmt::money;
use crate::loader::load_statement;
use crate::rules::RuleStore;
use crate::settings;

pub fn run(file: &str, rules_path: Option<&str>, no_review: bool) -> Result<()> {
    let loaded = load_statement(Path::new(file))?;
    println!("Loaded {} transactions from {file}", loaded.transactions.len());

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

    let mut table = Table::new();
    table.set_header(vec!["Date", "Recipient", "Description", "Amount", "Category"]);
    for t in &transactions {
        table.add_row(vec![
            Cell::new(&t.transaction_date),
            Cell::new(&t.recipient),
            Cell::new(&t.description),
            Cell::new(money(t.amount)),
            Cell::new(
                t.category
                    .map(|c| c.name.label().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("{table}");

    println!(
        "{} auto-classified, {} reviewed, {} unresolved",
        outcome.auto_classified.to_string().green(),
        outcome.reviewed,
        outcome.unresolved.to_string().yellow()
    );
    if !outcome.invalid.is_empty() {
        println!(
            "{}",
            format!("{} classification decision(s) were invalid", outcome.invalid.len()).red()
        );
    }
    Ok(())
}
