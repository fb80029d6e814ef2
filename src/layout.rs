use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GroszError, Result};
use crate::workbook::CellRange;

/// Month-to-sheet mapping and section geometry of the budget workbook.
/// Built once per document and read-only afterwards. Defaults mirror the
/// family budget file this tool was written for; a JSON override file can
/// replace any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Sheet names for January..December.
    pub month_sheets: Vec<String>,
    /// Marker row text that opens the variable-expense section.
    pub variable_header: String,
    /// Day 1 writes at `day_base_col + 1`.
    pub day_base_col: u32,
    /// Running-total column of a variable-expense row.
    pub total_col: u32,
    /// Number of day columns after the base.
    pub day_count: u32,
    /// Autosum and other derived regions that must never be written.
    pub protected: Vec<CellRange>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            month_sheets: [
                "STY", "LUT", "MARZ", "KWIE", "MAJ", "CZERW", "LIP", "SIE", "WRZE", "PAŹDŹ",
                "LIST", "GRU",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            variable_header: "WYDATKI ZMIENNE".to_string(),
            day_base_col: 3,
            total_col: 3,
            day_count: 31,
            protected: ["C8", "C12:C17", "E20:G20", "H20:J20", "G5:I5", "G7:I7"]
                .iter()
                .map(|s| s.parse().expect("valid default address"))
                .collect(),
        }
    }
}

impl SheetLayout {
    pub fn load(path: &Path) -> Result<SheetLayout> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| GroszError::Settings(format!("layout file {}: {e}", path.display())))
    }

    /// Sheet name for a 1-based month number.
    pub fn sheet_for_month(&self, month: u32) -> Option<&str> {
        if month == 0 {
            return None;
        }
        self.month_sheets.get(month as usize - 1).map(|s| s.as_str())
    }

    /// Column for a day-of-month in the variable-expense section.
    pub fn day_col(&self, day: u32) -> u32 {
        self.day_base_col + day
    }

    /// Full day-column span of a variable-expense row.
    pub fn day_cols(&self) -> std::ops::RangeInclusive<u32> {
        self.day_base_col + 1..=self.day_base_col + self.day_count
    }

    pub fn is_protected(&self, row: u32, col: u32) -> bool {
        self.protected.iter().any(|r| r.contains(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_sheet_mapping() {
        let layout = SheetLayout::default();
        assert_eq!(layout.sheet_for_month(1), Some("STY"));
        assert_eq!(layout.sheet_for_month(3), Some("MARZ"));
        assert_eq!(layout.sheet_for_month(10), Some("PAŹDŹ"));
        assert_eq!(layout.sheet_for_month(12), Some("GRU"));
        assert_eq!(layout.sheet_for_month(0), None);
        assert_eq!(layout.sheet_for_month(13), None);
    }

    #[test]
    fn test_day_columns() {
        let layout = SheetLayout::default();
        assert_eq!(layout.day_col(1), 4);
        assert_eq!(layout.day_col(15), 18);
        assert_eq!(layout.day_col(31), 34);
        assert_eq!(layout.day_cols(), 4..=34);
    }

    #[test]
    fn test_protected_defaults() {
        let layout = SheetLayout::default();
        assert!(layout.is_protected(8, 3)); // C8
        assert!(layout.is_protected(14, 3)); // inside C12:C17
        assert!(layout.is_protected(20, 6)); // inside E20:G20
        assert!(!layout.is_protected(8, 4));
        assert!(!layout.is_protected(9, 3));
    }

    #[test]
    fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{ "variable_header": "ZMIENNE", "protected": ["B2:B4"] }"#,
        )
        .unwrap();
        let layout = SheetLayout::load(&path).unwrap();
        assert_eq!(layout.variable_header, "ZMIENNE");
        assert!(layout.is_protected(3, 2));
        assert!(!layout.is_protected(8, 3));
        // untouched fields keep their defaults
        assert_eq!(layout.sheet_for_month(3), Some("MARZ"));
        assert_eq!(layout.day_base_col, 3);
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(SheetLayout::load(&path).is_err());
    }
}
