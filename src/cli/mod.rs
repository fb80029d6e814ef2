pub mod classify;
pub mod demo;
pub mod init;
pub mod journal;
pub mod review;
pub mod rules;
pub mod update;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "grosz",
    about = "Bank-statement reconciliation CLI for spreadsheet monthly budgets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up grosz: choose a data directory for rules and the journal.
    Init {
        /// Path for grosz data (default: ~/Documents/grosz)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Load a statement, classify transactions and preview the result.
    Classify {
        /// Path to the bank-statement CSV export
        file: String,
        /// Rule file (default: <data_dir>/rules.json)
        #[arg(long)]
        rules: Option<String>,
        /// Leave unknown transactions unclassified instead of prompting
        #[arg(long = "no-review")]
        no_review: bool,
    },
    /// Reconcile a statement into the budget document.
    Update {
        /// Path to the bank-statement CSV export
        file: String,
        /// Path to the budget document
        #[arg(long)]
        budget: String,
        /// Rule file (default: <data_dir>/rules.json)
        #[arg(long)]
        rules: Option<String>,
        /// Journal file (default: <data_dir>/journal.json)
        #[arg(long)]
        journal: Option<String>,
        /// Sheet-layout overrides file
        #[arg(long)]
        layout: Option<String>,
        /// Leave unknown transactions unclassified instead of prompting
        #[arg(long = "no-review")]
        no_review: bool,
    },
    /// Manage classification rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Inspect the applied-transaction journal.
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },
    /// Write a sample budget, statement and rules to explore grosz.
    Demo {
        /// Output directory (default: current directory)
        #[arg(long = "out-dir")]
        out_dir: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Add a keyword rule.
    Add {
        /// Keyword matched against descriptions and recipients
        keyword: String,
        /// Category to assign, e.g. 'Jedzenie'
        #[arg(long)]
        category: String,
        /// Rule file (default: <data_dir>/rules.json)
        #[arg(long)]
        rules: Option<String>,
    },
    /// List rules in match order.
    List {
        /// Rule file (default: <data_dir>/rules.json)
        #[arg(long)]
        rules: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum JournalCommands {
    /// List applied-transaction entries.
    List {
        /// Journal file (default: <data_dir>/journal.json)
        #[arg(long)]
        journal: Option<String>,
    },
}
