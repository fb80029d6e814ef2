mod accumulator;
mod categories;
mod categorizer;
mod cli;
mod error;
mod fmt;
mod journal;
mod layout;
mod loader;
mod models;
mod reconciler;
mod resolver;
mod rules;
mod settings;
mod workbook;

use clap::Parser;

use cli::{Cli, Commands, JournalCommands, RulesCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Classify { file, rules, no_review } => {
            cli::classify::run(&file, rules.as_deref(), no_review)
        }
        Commands::Update { file, budget, rules, journal, layout, no_review } => cli::update::run(
            &file,
            &budget,
            rules.as_deref(),
            journal.as_deref(),
            layout.as_deref(),
            no_review,
        ),
        Commands::Rules { command } => match command {
            RulesCommands::Add { keyword, category, rules } => {
                cli::rules::add(&keyword, &category, rules.as_deref())
            }
            RulesCommands::List { rules } => cli::rules::list(rules.as_deref()),
        },
        Commands::Journal { command } => match command {
            JournalCommands::List { journal } => cli::journal::list(journal.as_deref()),
        },
        Commands::Demo { out_dir } => cli::demo::run(out_dir.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
