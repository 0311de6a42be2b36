use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kagoban", version, about = "Terminal kanban board of notes")]
pub struct Cli {
    /// Save file to use instead of the configured one
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive board
    Tui,
    /// List sections and their notes
    List {
        /// Only show the section with this name
        #[arg(long)]
        section: Option<String>,
    },
    /// Append a note to a section
    Add {
        /// Content of the note
        content: String,
        /// Section name (defaults to the first section)
        #[arg(long)]
        section: Option<String>,
    },
    /// Print the path of the save file
    Path,
}
