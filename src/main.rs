mod cli;
mod commands;
mod config;
mod cursor;
mod index;
mod kanban;
mod logging;
mod model;
mod ordering;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let mut config = config::Config::load(args.config.as_deref())?;
    if let Some(file) = args.file {
        config.data_file = Some(file);
    }
    if let Err(err) = logging::init(&config) {
        eprintln!("kagoban: logging disabled: {:#}", err);
    }
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Tui => commands::tui(&config),
        cli::Command::List { section } => commands::list(&config, section),
        cli::Command::Add { content, section } => commands::add(&config, content, section),
        cli::Command::Path => commands::path(&config),
    }
}
