use std::path::PathBuf;

use colored::Colorize;

use crate::categories::{Category, CategoryName};
use crate::error::Result;
use crate::rules::RuleStore;
use crate::workbook::{CellRange, Sheet, Workbook};

const DEMO_STATEMENT: &str = "\
Numer konta,Data transakcji,Data rozliczenia,Rodzaj transakcji,Z numeru konta,Odbiorca,Opis,Obciążenia,Uznania,Saldo,Waluta
PL45 1160 2202,2025-03-12,2025-03-12,Przelew,PL10 1020,Wspólnota Mieszkaniowa,Czynsz za marzec,\"-1500,00\",0,\"4 200,00\",PLN
PL45 1160 2202,2025-03-15,2025-03-16,Karta,,BIEDRONKA 123 WARSZAWA,Zakupy spożywcze,\"-42,50\",0,\"4 157,50\",PLN
PL45 1160 2202,2025-03-18,2025-03-18,Karta,,ORLEN STACJA 44,Paliwo,\"-150,00\",0,\"4 007,50\",PLN
PL45 1160 2202,2025-03-20,2025-03-20,Karta,,KWIACIARNIA RÓŻA,Kwiaty,\"-35,00\",0,\"3 972,50\",PLN
PL45 1160 2202,2025-03-28,2025-03-28,Przelew,PL99 2030,Pracodawca Sp. z o.o.,Wynagrodzenie za marzec,0,\"5 200,00\",\"9 172,50\",PLN
";

const DEMO_LAYOUT: &str = "{\n  \"protected\": [\"C29\"]\n}\n";

const INCOME_ROWS: &[(u32, CategoryName)] = &[
    (3, CategoryName::Bartek),
    (4, CategoryName::Gosia),
    (5, CategoryName::Inne),
];

const FIXED_ROWS: &[(u32, CategoryName)] = &[
    (8, CategoryName::Czynsz),
    (9, CategoryName::Gaz),
    (10, CategoryName::Prad),
    (11, CategoryName::Woda),
    (12, CategoryName::Play),
    (13, CategoryName::Przedszkole),
    (14, CategoryName::Kon),
    (15, CategoryName::UbezpGosia),
    (16, CategoryName::Rata),
    (17, CategoryName::Telefon),
    (18, CategoryName::AbonamentyInne),
];

const VARIABLE_ROWS: &[(u32, CategoryName)] = &[
    (21, CategoryName::Jedzenie),
    (22, CategoryName::Chemia),
    (23, CategoryName::Paliwo),
    (24, CategoryName::Apteka),
    (25, CategoryName::Rozrywka),
    (26, CategoryName::Ubrania),
    (27, CategoryName::InneWydatki),
];

fn demo_sheet(name: &str) -> Sheet {
    let mut sheet = Sheet::new(name);
    for &(row, category) in INCOME_ROWS.iter().chain(FIXED_ROWS) {
        sheet.set_text(row, 1, category.label());
        sheet.merge(CellRange::new(row, 1, row, 2));
    }
    sheet.set_text(20, 1, "WYDATKI ZMIENNE");
    for &(row, category) in VARIABLE_ROWS {
        sheet.set_text(row, 1, category.label());
        sheet.merge(CellRange::new(row, 1, row, 2));
    }
    sheet.set_text(29, 1, "RAZEM");
    sheet.set_formula(29, 3, "=SUM(C21:C27)");
    sheet
}

pub fn run(out_dir: Option<&str>) -> Result<()> {
    let dir = PathBuf::from(out_dir.unwrap_or("."));
    std::fs::create_dir_all(&dir)?;

    let budget_path = dir.join("budget.json");
    let mut workbook = Workbook::new(&budget_path);
    for month in ["STY", "LUT", "MARZ", "KWIE"] {
        workbook.add_sheet(demo_sheet(month));
    }
    workbook.save()?;

    let statement_path = dir.join("statement.csv");
    std::fs::write(&statement_path, DEMO_STATEMENT)?;

    let layout_path = dir.join("layout.json");
    std::fs::write(&layout_path, DEMO_LAYOUT)?;

    let rules_path = dir.join("rules.json");
    let mut rules = RuleStore::load(&rules_path);
    rules.add_rule("czynsz", Category::for_amount(CategoryName::Czynsz, -1.0), true)?;
    rules.add_rule("biedronka", Category::for_amount(CategoryName::Jedzenie, -1.0), true)?;
    rules.add_rule("orlen", Category::for_amount(CategoryName::Paliwo, -1.0), true)?;
    rules.add_rule("wynagrodzenie", Category::for_amount(CategoryName::Bartek, 1.0), true)?;

    println!("{}", "Demo data written:".green());
    println!("  {}", budget_path.display());
    println!("  {}", statement_path.display());
    println!("  {}", rules_path.display());
    println!("  {}", layout_path.display());
    println!();
    println!("Try:");
    println!(
        "  grosz update {} --budget {} --rules {} --journal {} --layout {}",
        statement_path.display(),
        budget_path.display(),
        rules_path.display(),
        dir.join("journal.json").display(),
        layout_path.display()
    );
    println!("(no rule matches the flower shop yet; grosz will ask about it)");
    Ok(())
}
