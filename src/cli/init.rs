use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::settings::{save_settings, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let settings = match data_dir {
        Some(dir) => Settings { data_dir: dir },
        None => Settings::default(),
    };
    std::fs::create_dir_all(PathBuf::from(&settings.data_dir))?;
    save_settings(&settings)?;
    println!("{}", "grosz is ready.".green());
    println!("Rules and the journal will live in {}", settings.data_dir);
    println!("Try `grosz demo --out-dir demo` for a sample budget to play with.");
    Ok(())
}
