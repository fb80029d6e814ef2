//! Locates the writable cell for a category inside an arbitrarily laid-out
//! sheet. Category labels are frequently merged across two or three cells, so
//! every match is reported through its merged range's anchor (top-left) cell.

use crate::categories::{Category, Section};
use crate::fmt::eq_ignore_case;
use crate::layout::SheetLayout;
use crate::workbook::Sheet;

/// Where a label was found: anchor coordinates plus the rightmost column of
/// its merged range (equal to `col` for an unmerged label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHit {
    pub row: u32,
    pub col: u32,
    pub end_col: u32,
}

/// A writable target for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Fixed/income: the cell one column right of the label's merged range.
    Beside { row: u32, col: u32 },
    /// Variable expense: the day cell, plus the row's running-total column.
    DayColumn { row: u32, col: u32, total_col: u32 },
}

impl Target {
    pub fn coords(&self) -> (u32, u32) {
        match *self {
            Target::Beside { row, col } => (row, col),
            Target::DayColumn { row, col, .. } => (row, col),
        }
    }
}

/// Why no target could be produced. None of these abort a run; the
/// orchestrator skips the transaction and records the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    LabelNotFound,
    SectionHeaderNotFound,
    Protected { row: u32, col: u32 },
}

/// Row-major scan for a label, starting at `from_row`. Empty cells inside a
/// merged range borrow the anchor's text for comparison; matches report the
/// anchor. Matching is case-insensitive exact equality.
pub fn find_label_from(sheet: &Sheet, label: &str, from_row: u32) -> Option<LabelHit> {
    for row in from_row..=sheet.max_row() {
        for col in 1..=sheet.max_col() {
            let text = sheet.text(row, col).trim();
            if text.is_empty() {
                let Some(range) = sheet.merged_range_at(row, col) else {
                    continue;
                };
                let anchor = sheet.text(range.start_row, range.start_col).trim();
                if !anchor.is_empty() && eq_ignore_case(anchor, label) {
                    return Some(LabelHit {
                        row: range.start_row,
                        col: range.start_col,
                        end_col: range.end_col,
                    });
                }
            } else if eq_ignore_case(text, label) {
                if let Some(range) = sheet.merged_range_at(row, col) {
                    return Some(LabelHit {
                        row: range.start_row,
                        col: range.start_col,
                        end_col: range.end_col,
                    });
                }
                return Some(LabelHit { row, col, end_col: col });
            }
        }
    }
    None
}

pub fn find_label(sheet: &Sheet, label: &str) -> Option<LabelHit> {
    find_label_from(sheet, label, 1)
}

/// Row of the variable-expense section marker, by exact text match.
pub fn find_section_header(sheet: &Sheet, header: &str) -> Option<u32> {
    for row in 1..=sheet.max_row() {
        for col in 1..=sheet.max_col() {
            let text = sheet.text(row, col).trim();
            if !text.is_empty() && eq_ignore_case(text, header) {
                return Some(row);
            }
        }
    }
    None
}

/// Resolve the target cell for a category, applying the placement policy of
/// its section and refusing protected coordinates.
pub fn resolve(
    sheet: &Sheet,
    layout: &SheetLayout,
    category: Category,
    day: u32,
) -> Result<Target, Refusal> {
    match category.name.section() {
        Section::Income | Section::Fixed => {
            let hit = find_label(sheet, category.name.label()).ok_or(Refusal::LabelNotFound)?;
            let (row, col) = (hit.row, hit.end_col + 1);
            if layout.is_protected(row, col) {
                return Err(Refusal::Protected { row, col });
            }
            Ok(Target::Beside { row, col })
        }
        Section::Variable => {
            let header_row = find_section_header(sheet, &layout.variable_header)
                .ok_or(Refusal::SectionHeaderNotFound)?;
            let hit = find_label_from(sheet, category.name.label(), header_row + 1)
                .ok_or(Refusal::LabelNotFound)?;
            let (row, col) = (hit.row, layout.day_col(day));
            if layout.is_protected(row, col) {
                return Err(Refusal::Protected { row, col });
            }
            Ok(Target::DayColumn { row, col, total_col: layout.total_col })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{Category, CategoryName};

    fn layout() -> SheetLayout {
        SheetLayout { protected: Vec::new(), ..SheetLayout::default() }
    }

    fn sheet_with_label(merged: bool) -> Sheet {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(8, 2, "Czynsz");
        if merged {
            sheet.merge("B8:C8".parse().unwrap());
        }
        // widen the scan area a little
        sheet.set_text(12, 6, "x");
        sheet
    }

    #[test]
    fn test_plain_label_hit() {
        let sheet = sheet_with_label(false);
        let hit = find_label(&sheet, "czynsz").unwrap();
        assert_eq!(hit, LabelHit { row: 8, col: 2, end_col: 2 });
    }

    #[test]
    fn test_merged_label_reports_anchor_and_extent() {
        let sheet = sheet_with_label(true);
        let hit = find_label(&sheet, "CZYNSZ").unwrap();
        assert_eq!(hit, LabelHit { row: 8, col: 2, end_col: 3 });
    }

    #[test]
    fn test_merged_cell_equivalence() {
        // the visible text may sit in any constituent cell of the range;
        // the anchor is reported either way
        for text_col in [2, 3] {
            let mut sheet = Sheet::new("MARZ");
            sheet.set_text(8, text_col, "Czynsz");
            sheet.merge("B8:C8".parse().unwrap());
            let hit = find_label(&sheet, "Czynsz").unwrap();
            assert_eq!((hit.row, hit.col), (8, 2), "text in col {text_col}");
        }
    }

    #[test]
    fn test_match_is_exact_not_substring() {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(4, 2, "Czynsz zaległy");
        assert!(find_label(&sheet, "Czynsz").is_none());
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(9, 1, "Gaz");
        sheet.set_text(3, 5, "Gaz");
        let hit = find_label(&sheet, "Gaz").unwrap();
        assert_eq!((hit.row, hit.col), (3, 5));
    }

    #[test]
    fn test_fixed_category_targets_right_of_merged_range() {
        let sheet = sheet_with_label(true);
        let cat = Category::for_amount(CategoryName::Czynsz, -1500.0);
        let target = resolve(&sheet, &layout(), cat, 12).unwrap();
        assert_eq!(target, Target::Beside { row: 8, col: 4 });
    }

    #[test]
    fn test_fixed_category_without_merge_targets_next_column() {
        let sheet = sheet_with_label(false);
        let cat = Category::for_amount(CategoryName::Czynsz, -1500.0);
        let target = resolve(&sheet, &layout(), cat, 12).unwrap();
        assert_eq!(target, Target::Beside { row: 8, col: 3 });
    }

    #[test]
    fn test_variable_category_uses_day_column() {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(20, 1, "WYDATKI ZMIENNE");
        sheet.set_text(22, 1, "Jedzenie");
        let cat = Category::for_amount(CategoryName::Jedzenie, -42.5);
        let target = resolve(&sheet, &layout(), cat, 15).unwrap();
        assert_eq!(target, Target::DayColumn { row: 22, col: 18, total_col: 3 });
    }

    #[test]
    fn test_variable_label_above_header_is_ignored() {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(5, 1, "Jedzenie"); // decoy above the section
        sheet.set_text(20, 1, "WYDATKI ZMIENNE");
        sheet.set_text(23, 1, "Jedzenie");
        let cat = Category::for_amount(CategoryName::Jedzenie, -10.0);
        let target = resolve(&sheet, &layout(), cat, 1).unwrap();
        assert_eq!(target.coords(), (23, 4));
    }

    #[test]
    fn test_variable_without_header_is_refused() {
        let mut sheet = Sheet::new("MARZ");
        sheet.set_text(22, 1, "Jedzenie");
        let cat = Category::for_amount(CategoryName::Jedzenie, -10.0);
        assert_eq!(resolve(&sheet, &layout(), cat, 1), Err(Refusal::SectionHeaderNotFound));
    }

    #[test]
    fn test_missing_label_is_refused_not_fatal() {
        let sheet = Sheet::new("MARZ");
        let cat = Category::for_amount(CategoryName::Gaz, -50.0);
        assert_eq!(resolve(&sheet, &layout(), cat, 1), Err(Refusal::LabelNotFound));
    }

    #[test]
    fn test_protected_target_is_refused() {
        let sheet = sheet_with_label(false); // label at B8, target C8
        let mut layout = layout();
        layout.protected = vec!["C8".parse().unwrap()];
        let cat = Category::for_amount(CategoryName::Czynsz, -1500.0);
        assert_eq!(
            resolve(&sheet, &layout, cat, 1),
            Err(Refusal::Protected { row: 8, col: 3 })
        );
    }
}
