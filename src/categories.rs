use serde::{Deserialize, Serialize};

use crate::fmt::eq_ignore_case;

/// Which part of a budget sheet a category is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Written once per month beside its label, credit side.
    Income,
    /// Recurring expense, written once per month beside its label.
    Fixed,
    /// Day-to-day expense, written into the day column matching the
    /// transaction date.
    Variable,
}

/// The closed set of category labels present on the budget sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryName {
    // Income
    Bartek,
    Gosia,
    Inne,
    // Fixed expenses
    Czynsz,
    Gaz,
    Prad,
    Woda,
    Play,
    Przedszkole,
    Kon,
    UbezpGosia,
    Rata,
    Telefon,
    AbonamentyInne,
    // Variable expenses
    Jedzenie,
    Chemia,
    Paliwo,
    Apteka,
    Rozrywka,
    Ubrania,
    InneWydatki,
}

impl CategoryName {
    pub const ALL: &'static [CategoryName] = &[
        CategoryName::Bartek,
        CategoryName::Gosia,
        CategoryName::Inne,
        CategoryName::Czynsz,
        CategoryName::Gaz,
        CategoryName::Prad,
        CategoryName::Woda,
        CategoryName::Play,
        CategoryName::Przedszkole,
        CategoryName::Kon,
        CategoryName::UbezpGosia,
        CategoryName::Rata,
        CategoryName::Telefon,
        CategoryName::AbonamentyInne,
        CategoryName::Jedzenie,
        CategoryName::Chemia,
        CategoryName::Paliwo,
        CategoryName::Apteka,
        CategoryName::Rozrywka,
        CategoryName::Ubrania,
        CategoryName::InneWydatki,
    ];

    /// The label as it appears on the budget sheets.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryName::Bartek => "Bartek",
            CategoryName::Gosia => "Gosia",
            CategoryName::Inne => "INNE",
            CategoryName::Czynsz => "Czynsz",
            CategoryName::Gaz => "Gaz",
            CategoryName::Prad => "Prąd",
            CategoryName::Woda => "Woda",
            CategoryName::Play => "Play",
            CategoryName::Przedszkole => "Przedszkole",
            CategoryName::Kon => "Koń",
            CategoryName::UbezpGosia => "Ubezp_Gosia",
            CategoryName::Rata => "Rata",
            CategoryName::Telefon => "Telefon",
            CategoryName::AbonamentyInne => "Abonamenty_inne",
            CategoryName::Jedzenie => "Jedzenie",
            CategoryName::Chemia => "Chemia",
            CategoryName::Paliwo => "Paliwo",
            CategoryName::Apteka => "Apteka",
            CategoryName::Rozrywka => "Rozrywka",
            CategoryName::Ubrania => "Ubrania",
            CategoryName::InneWydatki => "Inne_wydatki",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            CategoryName::Bartek | CategoryName::Gosia | CategoryName::Inne => Section::Income,
            CategoryName::Czynsz
            | CategoryName::Gaz
            | CategoryName::Prad
            | CategoryName::Woda
            | CategoryName::Play
            | CategoryName::Przedszkole
            | CategoryName::Kon
            | CategoryName::UbezpGosia
            | CategoryName::Rata
            | CategoryName::Telefon
            | CategoryName::AbonamentyInne => Section::Fixed,
            CategoryName::Jedzenie
            | CategoryName::Chemia
            | CategoryName::Paliwo
            | CategoryName::Apteka
            | CategoryName::Rozrywka
            | CategoryName::Ubrania
            | CategoryName::InneWydatki => Section::Variable,
        }
    }

    pub fn is_income(&self) -> bool {
        self.section() == Section::Income
    }

    /// Case-insensitive lookup by sheet label.
    pub fn parse(s: &str) -> Option<CategoryName> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|c| eq_ignore_case(c.label(), s))
    }

    /// Labels valid for a credit transaction (the income section).
    pub fn credit_labels() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .filter(|c| c.is_income())
            .map(|c| c.label())
            .collect()
    }

    /// Labels valid for a debit transaction (fixed + variable expenses).
    pub fn debit_labels() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .filter(|c| !c.is_income())
            .map(|c| c.label())
            .collect()
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> String {
        name.label().to_string()
    }
}

impl TryFrom<String> for CategoryName {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<CategoryName, String> {
        CategoryName::parse(&s).ok_or_else(|| format!("unknown category '{s}'"))
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Credit / debit tag, always derived from the transaction's sign at
/// assignment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Credit,
    Debit,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Credit => f.write_str("credit"),
            EntryKind::Debit => f.write_str("debit"),
        }
    }
}

/// A category as attached to a transaction: label plus credit/debit tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: CategoryName,
    pub kind: EntryKind,
}

impl Category {
    /// Build a category for a signed amount, deriving the kind from the sign.
    pub fn for_amount(name: CategoryName, amount: f64) -> Category {
        let kind = if amount >= 0.0 {
            EntryKind::Credit
        } else {
            EntryKind::Debit
        };
        Category { name, kind }
    }

    /// Income categories go with credits, expense categories with debits.
    pub fn agrees_with_sign(&self, amount: f64) -> bool {
        if self.name.is_income() {
            amount > 0.0 && self.kind == EntryKind::Credit
        } else {
            amount < 0.0 && self.kind == EntryKind::Debit
        }
    }
}
