use assert_cmd::Command;
use predicates::prelude::*;

fn grosz() -> Command {
    Command::cargo_bin("grosz").unwrap()
}

#[test]
fn test_help_describes_the_tool() {
    grosz()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconcile a statement"));
}

#[test]
fn test_demo_then_update_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_str().unwrap().to_string();

    grosz()
        .args(["demo", "--out-dir", &dir_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data written"));

    let statement = dir.path().join("statement.csv");
    let budget = dir.path().join("budget.json");
    let rules = dir.path().join("rules.json");
    let journal = dir.path().join("journal.json");
    let layout = dir.path().join("layout.json");
    let update_args = [
        "update",
        statement.to_str().unwrap(),
        "--budget",
        budget.to_str().unwrap(),
        "--rules",
        rules.to_str().unwrap(),
        "--journal",
        journal.to_str().unwrap(),
        "--layout",
        layout.to_str().unwrap(),
        "--no-review",
    ];

    // 4 of the 5 demo transactions have rules; the flower shop stays unknown
    grosz()
        .args(update_args)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 auto-classified, 0 reviewed, 1 unresolved"))
        .stdout(predicate::str::contains("4 written"));

    let after_first = std::fs::read_to_string(&budget).unwrap();
    assert!(after_first.contains("=1500"));

    // overlapping re-run: nothing is double-counted
    grosz()
        .args(update_args)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 written"))
        .stdout(predicate::str::contains("4 already applied"));

    let after_second = std::fs::read_to_string(&budget).unwrap();
    assert_eq!(after_first, after_second);

    grosz()
        .args(["journal", "list", "--journal", journal.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Czynsz"))
        .stdout(predicate::str::contains("4 entries"));
}

#[test]
fn test_rules_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    let rules_arg = rules.to_str().unwrap();

    grosz()
        .args(["rules", "add", "Lidl", "--category", "jedzenie", "--rules", rules_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("'lidl'"));

    grosz()
        .args(["rules", "list", "--rules", rules_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("lidl"))
        .stdout(predicate::str::contains("Jedzenie"));

    grosz()
        .args(["rules", "add", "x", "--category", "NieMaTakiej", "--rules", rules_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_update_with_missing_budget_fails() {
    let dir = tempfile::tempdir().unwrap();
    grosz()
        .args(["demo", "--out-dir", dir.path().to_str().unwrap()])
        .assert()
        .success();
    grosz()
        .args([
            "update",
            dir.path().join("statement.csv").to_str().unwrap(),
            "--budget",
            dir.path().join("nope.json").to_str().unwrap(),
            "--rules",
            dir.path().join("rules.json").to_str().unwrap(),
            "--journal",
            dir.path().join("journal.json").to_str().unwrap(),
            "--no-review",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
