use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::journal::Journal;
use crate::settings;

pub fn list(journal_path: Option<&str>) -> Result<()> {
    let path = journal_path
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_journal_path);
    let journal = Journal::load(&path);
    if journal.is_empty() {
        println!("Journal is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Category", "Amount", "Recipient", "Sheet"]);
    for entry in journal.entries() {
        table.add_row(vec![
            Cell::new(entry.date),
            Cell::new(&entry.category),
            Cell::new(money(entry.amount)),
            Cell::new(&entry.recipient),
            Cell::new(&entry.sheet),
        ]);
    }
    println!("Journal ({} entries)\n{table}", journal.len());
    Ok(())
}
