use crate::config::Config;
use crate::index::OrderIndex;
use crate::model::{Board, Note};
use crate::storage::{load_board, save_board, LoadSource};
use crate::ui;
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

pub fn tui(config: &Config) -> Result<()> {
    let (board, path, source) = load_current_board(config)?;
    ui::run(board, path, source, config)
}

pub fn list(config: &Config, section: Option<String>) -> Result<()> {
    let (board, path, source) = load_current_board(config)?;
    println!("Board: {} ({})", path.display(), source_label(source));
    let index = OrderIndex::rebuild(&board);
    let mut shown = 0;
    for sec in board.sections_in_order() {
        if let Some(ref filter) = section {
            if !sec.name.eq_ignore_ascii_case(filter.trim()) {
                continue;
            }
        }
        shown += 1;
        println!("{}", sec.name);
        let notes = index.sorted_notes(&board, sec.id).unwrap_or_default();
        if notes.is_empty() {
            println!("  (empty)");
        }
        for note in notes {
            print_note(note);
        }
        println!();
    }
    if shown == 0 {
        if let Some(filter) = section {
            bail!("section {} not found", filter);
        }
    }
    if !index.orphans().is_empty() {
        println!(
            "{} note(s) belong to missing sections and are hidden",
            index.orphans().len()
        );
    }
    Ok(())
}

pub fn add(config: &Config, content: String, section: Option<String>) -> Result<()> {
    let content = content.trim();
    if content.is_empty() {
        bail!("note content is empty");
    }
    let (mut board, path, source) = load_current_board(config)?;
    if source == LoadSource::Sample {
        bail!("{} could not be read; refusing to overwrite it", path.display());
    }
    let target = match section {
        Some(name) => board
            .find_section_by_name(&name)
            .map(|s| (s.id, s.name.clone()))
            .ok_or_else(|| anyhow!("section {} not found", name))?,
        None => board
            .sections_in_order()
            .first()
            .map(|s| (s.id, s.name.clone()))
            .ok_or_else(|| anyhow!("board has no sections"))?,
    };
    let id = board
        .insert_note(target.0, content)
        .with_context(|| format!("adding note to section {}", target.1))?;
    save_board(&path, &board)?;
    println!("Added note {} to {}", id, target.1);
    Ok(())
}

pub fn path(config: &Config) -> Result<()> {
    println!("{}", config.data_path()?.display());
    Ok(())
}

fn load_current_board(config: &Config) -> Result<(Board, PathBuf, LoadSource)> {
    let path = config.data_path()?;
    let loaded = load_board(&path);
    Ok((loaded.board, path, loaded.source))
}

pub fn source_label(source: LoadSource) -> &'static str {
    match source {
        LoadSource::File => "loaded",
        LoadSource::Blank => "new",
        LoadSource::Sample => "unreadable, showing sample data",
    }
}

fn print_note(note: &Note) {
    let check = if note.checked { "x" } else { " " };
    println!("  [{}] {}: {}", check, note.id, note.content);
}
