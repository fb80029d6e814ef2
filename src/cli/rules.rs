use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::categories::{Category, CategoryName};
use crate::error::{GroszError, Result};
use crate::rules::RuleStore;
use crate::settings;

fn store_path(rules_path: Option<&str>) -> PathBuf {
    rules_path
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_rules_path)
}

pub fn add(keyword: &str, category: &str, rules_path: Option<&str>) -> Result<()> {
    let name = CategoryName::parse(category)
        .ok_or_else(|| GroszError::UnknownCategory(category.to_string()))?;
    // income rules are credit rules, expense rules debit
    let sign = if name.is_income() { 1.0 } else { -1.0 };
    let mut store = RuleStore::load(&store_path(rules_path));
    store.add_rule(keyword, Category::for_amount(name, sign), true)?;
    println!("Added rule: '{}' \u{2192} {}", keyword.trim().to_lowercase(), name);
    Ok(())
}

pub fn list(rules_path: Option<&str>) -> Result<()> {
    let store = RuleStore::load(&store_path(rules_path));
    if store.is_empty() {
        println!("No rules yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Keyword", "Category", "Kind"]);
    for (i, rule) in store.rules().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&rule.keyword),
            Cell::new(rule.category.name),
            Cell::new(rule.category.kind),
        ]);
    }
    println!("Rules\n{table}");
    Ok(())
}
