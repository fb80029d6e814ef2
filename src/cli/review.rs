use std::io::Write;

use colored::Colorize;

use crate::categorizer::ClassificationHandler;
use crate::error::Result;
use crate::fmt::{eq_ignore_case, money};
use crate::models::{ClassificationDecision, ClassificationRequest};

/// The interactive console side of the classification exchange: shows each
/// unknown transaction, asks for a category from the sign-valid subset, and
/// optionally records a keyword rule for the future.
pub struct ConsoleReviewer;

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn default_keyword(request: &ClassificationRequest) -> &str {
    if !request.recipient.trim().is_empty() {
        request.recipient.trim()
    } else {
        request.description.trim()
    }
}

impl ClassificationHandler for ConsoleReviewer {
    fn resolve_batch(
        &mut self,
        requests: &[ClassificationRequest],
    ) -> Result<Vec<ClassificationDecision>> {
        println!();
        println!(
            "{}",
            format!("{} transaction(s) need a category.", requests.len()).yellow()
        );

        let mut decisions = Vec::new();
        for (n, request) in requests.iter().enumerate() {
            println!();
            println!("{}", format!("--- {} of {} ---", n + 1, requests.len()).dimmed());
            println!("  Date:        {}", request.date);
            println!("  Recipient:   {}", request.recipient);
            println!("  Description: {}", request.description);
            println!("  Amount:      {}", money(request.amount));
            println!("  Categories:  {}", request.available_categories.join(", "));

            let category = loop {
                let input = prompt("Category (enter to skip): ")?;
                if input.is_empty() {
                    break None;
                }
                match request
                    .available_categories
                    .iter()
                    .find(|c| eq_ignore_case(c, &input))
                {
                    Some(valid) => break Some(valid.clone()),
                    None => println!("{}", "Not a valid category for this transaction.".red()),
                }
            };
            let Some(category) = category else {
                println!("{}", "Skipped.".dimmed());
                continue;
            };

            let remember = prompt("Remember as a rule? [y/N]: ")?;
            let apply_as_rule = remember.to_lowercase().starts_with('y');
            let rule_keyword = if apply_as_rule {
                let keyword =
                    prompt(&format!("Keyword (enter for '{}'): ", default_keyword(request)))?;
                if keyword.is_empty() {
                    None
                } else {
                    Some(keyword)
                }
            } else {
                None
            };

            decisions.push(ClassificationDecision {
                index: request.index,
                category,
                apply_as_rule,
                rule_keyword,
            });
        }
        Ok(decisions)
    }
}
