//! The classification phase: rule-based auto-assignment first, then a single
//! batched round trip to an external collaborator (the interactive console,
//! a UI shell, a test script) for whatever the rules could not decide.

use crate::categories::{Category, CategoryName};
use crate::error::Result;
use crate::models::{ClassificationDecision, ClassificationRequest, Transaction};
use crate::rules::RuleStore;

/// The collaborator that resolves transactions the rule set does not know.
/// Called at most once per run, with the whole batch of unknowns; blocks
/// until the decisions are available.
pub trait ClassificationHandler {
    fn resolve_batch(
        &mut self,
        requests: &[ClassificationRequest],
    ) -> Result<Vec<ClassificationDecision>>;
}

/// A handler for non-interactive runs: every unknown stays unclassified.
pub struct NoReview;

impl ClassificationHandler for NoReview {
    fn resolve_batch(
        &mut self,
        _requests: &[ClassificationRequest],
    ) -> Result<Vec<ClassificationDecision>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
pub struct ClassifyOutcome {
    pub auto_classified: usize,
    pub reviewed: usize,
    /// Indices whose decision carried an invalid or sign-incompatible
    /// category name; left unclassified.
    pub invalid: Vec<usize>,
    pub unresolved: usize,
}

/// Assign categories from the rule set; returns the indices left unknown.
pub fn classify_all(transactions: &mut [Transaction], rules: &RuleStore) -> Vec<usize> {
    let mut unknown = Vec::new();
    for (i, t) in transactions.iter_mut().enumerate() {
        match rules.classify(t) {
            Some(category) => t.category = Some(category),
            None => unknown.push(i),
        }
    }
    unknown
}

/// Build the request batch for the collaborator. Each entry carries only the
/// category labels valid for its sign: income labels for credits, expense
/// labels for debits.
pub fn build_requests(transactions: &[Transaction], unknown: &[usize]) -> Vec<ClassificationRequest> {
    unknown
        .iter()
        .map(|&i| {
            let t = &transactions[i];
            let available = if t.amount >= 0.0 {
                CategoryName::credit_labels()
            } else {
                CategoryName::debit_labels()
            };
            ClassificationRequest {
                index: i,
                date: t.transaction_date.clone(),
                recipient: t.recipient.clone(),
                description: t.description.clone(),
                amount: t.amount,
                available_categories: available.iter().map(|s| s.to_string()).collect(),
            }
        })
        .collect()
}

/// Apply the collaborator's decisions. An unknown category name, an
/// out-of-range index or a category invalid for the transaction's sign leaves
/// the entry unclassified and reports it in the outcome. A decision with
/// `apply_as_rule` also records a persisted keyword rule; an empty keyword
/// defaults to the recipient, or the description when there is none.
pub fn apply_decisions(
    transactions: &mut [Transaction],
    decisions: &[ClassificationDecision],
    rules: &mut RuleStore,
) -> Result<ClassifyOutcome> {
    let mut outcome = ClassifyOutcome::default();

    for decision in decisions {
        let Some(t) = transactions.get_mut(decision.index) else {
            outcome.invalid.push(decision.index);
            continue;
        };
        let Some(name) = CategoryName::parse(&decision.category) else {
            outcome.invalid.push(decision.index);
            continue;
        };
        let category = Category::for_amount(name, t.amount);
        if !category.agrees_with_sign(t.amount) {
            outcome.invalid.push(decision.index);
            continue;
        }

        t.category = Some(category);
        outcome.reviewed += 1;

        if decision.apply_as_rule {
            let keyword = match decision.rule_keyword.as_deref() {
                Some(k) if !k.trim().is_empty() => k.trim().to_string(),
                _ if !t.recipient.trim().is_empty() => t.recipient.trim().to_string(),
                _ => t.description.trim().to_string(),
            };
            if !keyword.is_empty() {
                rules.add_rule(&keyword, category, true)?;
            }
        }
    }

    Ok(outcome)
}

/// The whole classification phase: rules, then one batch round trip for the
/// rest. `outcome.unresolved` counts transactions that are still unclassified
/// afterwards (skipped prompts, invalid decisions).
pub fn classify_with_handler(
    transactions: &mut [Transaction],
    rules: &mut RuleStore,
    handler: &mut dyn ClassificationHandler,
) -> Result<ClassifyOutcome> {
    let unknown = classify_all(transactions, rules);
    let auto_classified = transactions.len() - unknown.len();

    let mut outcome = if unknown.is_empty() {
        ClassifyOutcome::default()
    } else {
        let requests = build_requests(transactions, &unknown);
        let decisions = handler.resolve_batch(&requests)?;
        apply_decisions(transactions, &decisions, rules)?
    };

    outcome.auto_classified = auto_classified;
    outcome.unresolved = transactions.iter().filter(|t| !t.is_classified()).count();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::EntryKind;

    fn txn(description: &str, recipient: &str, amount: f64) -> Transaction {
        Transaction {
            account: String::new(),
            transaction_date: "2025-03-12".to_string(),
            settlement_date: String::new(),
            kind: String::new(),
            counter_account: String::new(),
            recipient: recipient.to_string(),
            description: description.to_string(),
            amount,
            balance: 0.0,
            currency: "PLN".to_string(),
            category: None,
        }
    }

    fn empty_rules(dir: &std::path::Path) -> RuleStore {
        RuleStore::load(&dir.join("rules.json"))
    }

    struct Scripted(Vec<ClassificationDecision>);

    impl ClassificationHandler for Scripted {
        fn resolve_batch(
            &mut self,
            _requests: &[ClassificationRequest],
        ) -> Result<Vec<ClassificationDecision>> {
            Ok(std::mem::take(&mut self.0))
        }
    }

    fn decision(index: usize, category: &str, apply_as_rule: bool, keyword: Option<&str>) -> ClassificationDecision {
        ClassificationDecision {
            index,
            category: category.to_string(),
            apply_as_rule,
            rule_keyword: keyword.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_requests_only_cover_unknowns_with_sign_subsets() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        rules
            .add_rule("biedronka", Category::for_amount(CategoryName::Jedzenie, -1.0), false)
            .unwrap();

        let mut txs = vec![
            txn("zakupy", "BIEDRONKA", -42.5),
            txn("wyplata", "Pracodawca", 5200.0),
            txn("stacja paliw", "ORLEN", -150.0),
        ];
        let unknown = classify_all(&mut txs, &rules);
        assert_eq!(unknown, vec![1, 2]);

        let requests = build_requests(&txs, &unknown);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].index, 1);
        assert!(requests[0].available_categories.contains(&"Bartek".to_string()));
        assert!(!requests[0].available_categories.contains(&"Jedzenie".to_string()));
        assert!(requests[1].available_categories.contains(&"Paliwo".to_string()));
        assert!(!requests[1].available_categories.contains(&"Gosia".to_string()));
    }

    #[test]
    fn test_decisions_classify_and_create_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        let mut txs = vec![txn("stacja paliw", "ORLEN SA", -150.0)];

        let mut handler = Scripted(vec![decision(0, "paliwo", true, None)]);
        let outcome = classify_with_handler(&mut txs, &mut rules, &mut handler).unwrap();

        assert_eq!(outcome.reviewed, 1);
        assert_eq!(outcome.unresolved, 0);
        let cat = txs[0].category.unwrap();
        assert_eq!(cat.name, CategoryName::Paliwo);
        assert_eq!(cat.kind, EntryKind::Debit);
        // keyword defaulted to the recipient and was persisted
        assert_eq!(rules.rules()[0].keyword, "orlen sa");
        assert!(rules.rules()[0].persist);
    }

    #[test]
    fn test_invalid_category_name_leaves_entry_unclassified() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        let mut txs = vec![txn("cos", "KTOS", -10.0)];

        let mut handler = Scripted(vec![decision(0, "NieMaTakiej", false, None)]);
        let outcome = classify_with_handler(&mut txs, &mut rules, &mut handler).unwrap();

        assert_eq!(outcome.invalid, vec![0]);
        assert_eq!(outcome.unresolved, 1);
        assert!(txs[0].category.is_none());
    }

    #[test]
    fn test_sign_incompatible_category_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        // income category proposed for a debit
        let mut txs = vec![txn("zakupy", "SKLEP", -10.0)];
        let mut handler = Scripted(vec![decision(0, "Bartek", false, None)]);
        let outcome = classify_with_handler(&mut txs, &mut rules, &mut handler).unwrap();
        assert_eq!(outcome.invalid, vec![0]);
        assert!(txs[0].category.is_none());
    }

    #[test]
    fn test_skipped_entries_stay_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        let mut txs = vec![txn("a", "A", -1.0), txn("b", "B", -2.0)];
        let mut handler = Scripted(vec![decision(1, "Jedzenie", false, None)]);
        let outcome = classify_with_handler(&mut txs, &mut rules, &mut handler).unwrap();
        assert_eq!(outcome.reviewed, 1);
        assert_eq!(outcome.unresolved, 1);
        assert!(txs[0].category.is_none());
        assert!(txs[1].category.is_some());
    }

    #[test]
    fn test_no_round_trip_when_rules_cover_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut rules = empty_rules(dir.path());
        rules
            .add_rule("orlen", Category::for_amount(CategoryName::Paliwo, -1.0), false)
            .unwrap();
        let mut txs = vec![txn("paliwo", "ORLEN", -100.0)];

        struct Panicking;
        impl ClassificationHandler for Panicking {
            fn resolve_batch(
                &mut self,
                _requests: &[ClassificationRequest],
            ) -> Result<Vec<ClassificationDecision>> {
                panic!("handler must not be called");
            }
        }

        let outcome = classify_with_handler(&mut txs, &mut rules, &mut Panicking).unwrap();
        assert_eq!(outcome.auto_classified, 1);
        assert_eq!(outcome.unresolved, 0);
    }
}
