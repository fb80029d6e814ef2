use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GroszError, Result};
use crate::fmt::eq_ignore_case;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Spreadsheet column letters for a 1-based column index: 1 → "A", 27 → "AA".
pub fn column_letters(col: u32) -> String {
    let mut col = col;
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn parse_cell_ref(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, col))
}

/// Inclusive rectangular cell region with 1-based rows and columns.
/// Serialized in A1 notation ("C8", "C12:C17") for readable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> CellRange {
        CellRange { start_row, start_col, end_row, end_col }
    }

    pub fn cell(row: u32, col: u32) -> CellRange {
        CellRange::new(row, col, row, col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start_row == self.end_row && self.start_col == self.end_col {
            write!(f, "{}{}", column_letters(self.start_col), self.start_row)
        } else {
            write!(
                f,
                "{}{}:{}{}",
                column_letters(self.start_col),
                self.start_row,
                column_letters(self.end_col),
                self.end_row
            )
        }
    }
}

impl std::str::FromStr for CellRange {
    type Err = GroszError;

    fn from_str(s: &str) -> Result<CellRange> {
        let bad = || GroszError::BadAddress(s.to_string());
        match s.split_once(':') {
            Some((a, b)) => {
                let (sr, sc) = parse_cell_ref(a).ok_or_else(bad)?;
                let (er, ec) = parse_cell_ref(b).ok_or_else(bad)?;
                if er < sr || ec < sc {
                    return Err(bad());
                }
                Ok(CellRange::new(sr, sc, er, ec))
            }
            None => {
                let (r, c) = parse_cell_ref(s).ok_or_else(bad)?;
                Ok(CellRange::cell(r, c))
            }
        }
    }
}

impl Serialize for CellRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<CellRange, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Cells and sheets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub formula: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
}

impl Cell {
    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.formula.is_empty() && self.format.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CellRecord {
    row: u32,
    col: u32,
    #[serde(flatten)]
    cell: Cell,
}

/// One worksheet: a sparse grid of cells plus merged-range metadata.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    max_row: u32,
    max_col: u32,
    cells: HashMap<(u32, u32), Cell>,
    merged: Vec<CellRange>,
}

impl Sheet {
    pub fn new(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            max_row: 0,
            max_col: 0,
            cells: HashMap::new(),
            merged: Vec::new(),
        }
    }

    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    pub fn text(&self, row: u32, col: u32) -> &str {
        self.cells.get(&(row, col)).map(|c| c.text.as_str()).unwrap_or("")
    }

    pub fn formula(&self, row: u32, col: u32) -> &str {
        self.cells.get(&(row, col)).map(|c| c.formula.as_str()).unwrap_or("")
    }

    fn cell_mut(&mut self, row: u32, col: u32) -> &mut Cell {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.entry((row, col)).or_default()
    }

    pub fn set_text(&mut self, row: u32, col: u32, text: &str) {
        let cell = self.cell_mut(row, col);
        cell.text = text.to_string();
        cell.formula.clear();
    }

    /// Display text is produced by external recalculation, so a cell holding
    /// a formula carries none of its own.
    pub fn set_formula(&mut self, row: u32, col: u32, formula: &str) {
        let cell = self.cell_mut(row, col);
        cell.formula = formula.to_string();
        cell.text.clear();
    }

    pub fn set_number(&mut self, row: u32, col: u32, value: f64) {
        let cell = self.cell_mut(row, col);
        cell.text = format!("{value}");
        cell.formula.clear();
    }

    pub fn set_format(&mut self, row: u32, col: u32, format: &str) {
        self.cell_mut(row, col).format = format.to_string();
    }

    pub fn merge(&mut self, range: CellRange) {
        self.max_row = self.max_row.max(range.end_row);
        self.max_col = self.max_col.max(range.end_col);
        self.merged.push(range);
    }

    pub fn merged_range_at(&self, row: u32, col: u32) -> Option<CellRange> {
        self.merged.iter().copied().find(|r| r.contains(row, col))
    }
}

// ---------------------------------------------------------------------------
// Workbook and its document file
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SheetFile {
    name: String,
    #[serde(default)]
    merged: Vec<CellRange>,
    #[serde(default)]
    cells: Vec<CellRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkbookFile {
    sheets: Vec<SheetFile>,
}

/// The budget document: a JSON-backed grid workbook.
#[derive(Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    path: PathBuf,
}

impl Workbook {
    pub fn new(path: &Path) -> Workbook {
        Workbook { sheets: Vec::new(), path: path.to_path_buf() }
    }

    pub fn open(path: &Path) -> Result<Workbook> {
        if !path.exists() {
            return Err(GroszError::DocumentMissing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| GroszError::DocumentRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: WorkbookFile = serde_json::from_str(&content).map_err(|e| GroszError::DocumentRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut sheets = Vec::with_capacity(file.sheets.len());
        for sf in file.sheets {
            let mut sheet = Sheet::new(&sf.name);
            for range in sf.merged {
                sheet.merge(range);
            }
            for rec in sf.cells {
                if rec.row == 0 || rec.col == 0 {
                    continue;
                }
                sheet.max_row = sheet.max_row.max(rec.row);
                sheet.max_col = sheet.max_col.max(rec.col);
                sheet.cells.insert((rec.row, rec.col), rec.cell);
            }
            sheets.push(sheet);
        }
        Ok(Workbook { sheets, path: path.to_path_buf() })
    }

    pub fn save(&self) -> Result<()> {
        let file = WorkbookFile {
            sheets: self
                .sheets
                .iter()
                .map(|s| {
                    let mut cells: Vec<CellRecord> = s
                        .cells
                        .iter()
                        .filter(|(_, cell)| !cell.is_empty())
                        .map(|(&(row, col), cell)| CellRecord { row, col, cell: cell.clone() })
                        .collect();
                    cells.sort_by_key(|r| (r.row, r.col));
                    SheetFile { name: s.name.clone(), merged: s.merged.clone(), cells }
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| GroszError::DocumentSave {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, format!("{json}\n")).map_err(|e| GroszError::DocumentSave {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| eq_ignore_case(&s.name, name))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| eq_ignore_case(&s.name, name))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Copy the on-disk document into `backups/` beside it, with a timestamped
    /// name. The in-memory state is not written; this preserves the file as it
    /// was before the run.
    pub fn write_backup(&self) -> Result<PathBuf> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new(".")).join("backups");
        std::fs::create_dir_all(&dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("budget");
        let ext = self.path.extension().and_then(|s| s.to_str()).unwrap_or("json");
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup = dir.join(format!("{stem}_backup_{stamp}.{ext}"));
        std::fs::copy(&self.path, &backup)?;
        Ok(backup)
    }
}
