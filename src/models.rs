use serde::{Deserialize, Serialize};

use crate::categories::Category;

/// One bank-statement row, normalized to a single signed amount
/// (credit positive, debit negative).
#[derive(Debug, Clone)]
pub struct Transaction {
    pub account: String,
    pub transaction_date: String,
    pub settlement_date: String,
    pub kind: String,
    pub counter_account: String,
    pub recipient: String,
    pub description: String,
    pub amount: f64,
    pub balance: f64,
    pub currency: String,
    pub category: Option<Category>,
}

impl Transaction {
    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }
}

/// One entry in the batch handed to the classification collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRequest {
    pub index: usize,
    pub date: String,
    pub recipient: String,
    pub description: String,
    pub amount: f64,
    /// Category labels valid for this transaction's sign.
    pub available_categories: Vec<String>,
}

/// One mapping returned by the collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationDecision {
    pub index: usize,
    pub category: String,
    #[serde(default)]
    pub apply_as_rule: bool,
    #[serde(default)]
    pub rule_keyword: Option<String>,
}
