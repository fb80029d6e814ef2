//! Merges an amount into whatever a target cell already holds. Cells are
//! only ever written as additive formulas, so repeated merges accumulate
//! losslessly and the document's own recalculation produces the value.

/// Locale-invariant rendering used inside formulas: shortest decimal form,
/// dot separator ("1500", "42.5").
pub fn format_amount(amount: f64) -> String {
    format!("{amount}")
}

/// Produce the new cell formula for `amount` given the cell's current state.
///
/// Priority order:
/// 1. existing formula → canonicalize the leading `=` and append `+amount`;
/// 2. display text parses as a number → `=<existing>+<amount>`;
/// 3. otherwise → `=<amount>`.
pub fn merge(current_formula: &str, current_text: &str, amount: f64) -> String {
    let formula = current_formula.trim();
    if !formula.is_empty() {
        let canonical = if formula.starts_with('=') {
            formula.to_string()
        } else {
            format!("={formula}")
        };
        return format!("{canonical}+{}", format_amount(amount));
    }

    let text = current_text.trim();
    if let Ok(existing) = text.parse::<f64>() {
        return format!("={}+{}", format_amount(existing), format_amount(amount));
    }

    format!("={}", format_amount(amount))
}

/// Numeric value of a cell for running-total purposes. Reads a numeric
/// literal directly and expands the additive formulas this module writes
/// ("=10+20.5"); anything else, including formulas with cell references,
/// is opaque and yields `None`.
pub fn cell_value(current_formula: &str, current_text: &str) -> Option<f64> {
    let formula = current_formula.trim();
    if !formula.is_empty() {
        return formula
            .trim_start_matches('=')
            .split('+')
            .map(|part| part.trim().parse::<f64>().ok())
            .sum::<Option<f64>>();
    }
    current_text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expand an additive formula ("=10+20.5") back into its numeric value.
    fn eval(formula: &str) -> f64 {
        cell_value(formula, "").unwrap()
    }

    #[test]
    fn test_empty_cell_gets_plain_formula() {
        assert_eq!(merge("", "", 1500.0), "=1500");
        assert_eq!(merge("  ", "", 42.5), "=42.5");
    }

    #[test]
    fn test_numeric_literal_becomes_formula() {
        assert_eq!(merge("", "10", 5.0), "=10+5");
        assert_eq!(merge("", " 99.9 ", 0.1), "=99.9+0.1");
    }

    #[test]
    fn test_existing_formula_gets_appended() {
        assert_eq!(merge("=10+20", "", 12.0), "=10+20+12");
        // formulas stored without the marker are canonicalized
        assert_eq!(merge("10+20", "", 12.0), "=10+20+12");
    }

    #[test]
    fn test_non_numeric_text_is_replaced() {
        assert_eq!(merge("", "Czynsz", 100.0), "=100");
    }

    #[test]
    fn test_amount_rendering_is_locale_invariant() {
        assert_eq!(format_amount(1500.0), "1500");
        assert_eq!(format_amount(42.5), "42.5");
        assert_eq!(format_amount(0.001), "0.001");
    }

    #[test]
    fn test_repeated_merges_accumulate() {
        let amounts = [12.5, 100.0, 0.25, 87.25];
        let mut formula = String::new();
        for a in amounts {
            formula = merge(&formula, "", a);
        }
        let total: f64 = amounts.iter().sum();
        assert!((eval(&formula) - total).abs() < 1e-9);
    }

    #[test]
    fn test_accumulation_is_order_independent() {
        let amounts = [3.0, 1.5, 10.0];
        let forward = amounts.iter().fold(String::new(), |f, &a| merge(&f, "", a));
        let backward = amounts.iter().rev().fold(String::new(), |f, &a| merge(&f, "", a));
        assert!((eval(&forward) - eval(&backward)).abs() < 1e-9);
    }

    #[test]
    fn test_cell_value_reads_literals_and_own_formulas() {
        assert_eq!(cell_value("", "42.5"), Some(42.5));
        assert_eq!(cell_value("=10+2.5", ""), Some(12.5));
        assert_eq!(cell_value("=1500", ""), Some(1500.0));
        assert_eq!(cell_value("", ""), None);
        assert_eq!(cell_value("", "Czynsz"), None);
        // foreign formulas are opaque
        assert_eq!(cell_value("=SUM(D8:AH8)", ""), None);
    }

    #[test]
    fn test_literal_seed_counts_once() {
        // a cell that started as the literal 40 then took two merges
        let f1 = merge("", "40", 10.0);
        let f2 = merge(&f1, "", 2.5);
        assert_eq!(f2, "=40+10+2.5");
        assert!((eval(&f2) - 52.5).abs() < 1e-9);
    }
}
