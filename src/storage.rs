use crate::model::{Board, BoardError, Note, Section};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SAVE_FILE_NAME: &str = "save_file.json";

/// On-disk shape of the board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateFile {
    #[serde(rename = "SectionData")]
    pub sections: Vec<Section>,
    #[serde(rename = "Notes")]
    pub notes: Vec<Note>,
}

impl From<&Board> for StateFile {
    fn from(board: &Board) -> Self {
        StateFile {
            sections: board.sections_in_order().into_iter().cloned().collect(),
            notes: board.notes().to_vec(),
        }
    }
}

impl TryFrom<StateFile> for Board {
    type Error = BoardError;

    fn try_from(state: StateFile) -> Result<Self, Self::Error> {
        Board::from_parts(state.sections, state.notes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the save file.
    File,
    /// No save file yet.
    Blank,
    /// The save file could not be read or parsed.
    Sample,
}

#[derive(Debug)]
pub struct Loaded {
    pub board: Board,
    pub source: LoadSource,
}

/// Loads the board, never failing: a missing file yields a blank board and an
/// unreadable one the sample board.
pub fn load_board(path: &Path) -> Loaded {
    match read_board(path) {
        Ok(Some(board)) => {
            info!(path = %path.display(), "loaded board");
            Loaded {
                board,
                source: LoadSource::File,
            }
        }
        Ok(None) => {
            info!(path = %path.display(), "no save file, starting blank");
            Loaded {
                board: Board::blank(),
                source: LoadSource::Blank,
            }
        }
        Err(err) => {
            warn!(path = %path.display(), "falling back to sample data: {:#}", err);
            Loaded {
                board: Board::sample(),
                source: LoadSource::Sample,
            }
        }
    }
}

pub fn read_state(path: &Path) -> Result<Option<StateFile>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("reading {:?}", path)),
    };
    let state = serde_json::from_str(&data).context("parsing save file")?;
    Ok(Some(state))
}

/// Reads and validates the save file. `Ok(None)` means there is no file yet.
pub fn read_board(path: &Path) -> Result<Option<Board>> {
    let Some(state) = read_state(path)? else {
        return Ok(None);
    };
    let board = Board::try_from(state).context("validating save file")?;
    Ok(Some(board))
}

/// Writes a snapshot of `board` as pretty JSON. The file is written next to
/// the target first and renamed over it, so readers never see a partial file.
pub fn save_board(path: &Path, board: &Board) -> Result<()> {
    let snapshot = StateFile::from(board);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_json::to_string_pretty(&snapshot).context("serializing board")?;
    let tmp = tmp_path(path);
    write_private(&tmp, serialized.as_bytes()).with_context(|| format!("writing {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {:?}", path))?;
    info!(
        path = %path.display(),
        sections = snapshot.sections.len(),
        notes = snapshot.notes.len(),
        "saved board"
    );
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| SAVE_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban::Kanban;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_starts_blank() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join(SAVE_FILE_NAME);
        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::Blank);
        assert_eq!(loaded.board.sections().len(), 1);
        assert_eq!(loaded.board.sections()[0].name, "Inbox");
        assert!(loaded.board.notes().is_empty());
    }

    #[test]
    fn malformed_file_falls_back_to_sample() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::Sample);
        let names: Vec<&str> = loaded
            .board
            .sections_in_order()
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Uncategorized", "Inbox"]);
        assert_eq!(loaded.board.notes().len(), 6);
        loaded.board.verify().unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(SAVE_FILE_NAME);
        let mut kanban = Kanban::new(Board::blank());
        kanban.add_note("buy milk");
        kanban.add_note("walk dog");
        kanban.toggle_check();
        kanban.add_section("Done");
        kanban.add_note("ship it");
        kanban.move_note_left();
        save_board(&path, kanban.board()).unwrap();

        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::File);
        assert_eq!(
            StateFile::from(&loaded.board),
            StateFile::from(kanban.board())
        );
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn file_uses_expected_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        let mut board = Board::blank();
        board.insert_note(0, "hello").unwrap();
        save_board(&path, &board).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let section = &raw["SectionData"][0];
        assert_eq!(section["ID"], 0);
        assert_eq!(section["Order"], 0);
        assert_eq!(section["Name"], "Inbox");
        let note = &raw["Notes"][0];
        assert_eq!(note["Content"], "hello");
        assert_eq!(note["SectionID"], 0);
        assert_eq!(note["IsChecked"], false);
        assert_eq!(note["IsDeleted"], false);
        assert!(note["DateCreated"].as_str().unwrap().contains('T'));
        assert!(note["DateUpdated"].is_string());
    }

    #[test]
    fn loads_hand_written_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        let json = r#"{
            "SectionData": [
                {"ID": 4, "Order": 1, "Name": "Later"},
                {"ID": 2, "Order": 0, "Name": "Now"}
            ],
            "Notes": [
                {"ID": 8, "Order": 3, "Content": "b", "SectionID": 2,
                 "DateUpdated": "2024-05-01T10:00:00Z", "DateCreated": "2024-05-01T10:00:00Z",
                 "IsChecked": true, "IsDeleted": false},
                {"ID": 3, "Order": 1, "Content": "a", "SectionID": 2,
                 "DateUpdated": "2024-05-01T10:00:00+02:00", "DateCreated": "2024-05-01T09:00:00Z",
                 "IsChecked": false, "IsDeleted": false}
            ]
        }"#;
        fs::write(&path, json).unwrap();
        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::File);
        let board = loaded.board;
        board.verify().unwrap();
        assert_eq!(board.note(3).map(|n| n.order), Some(0));
        assert_eq!(board.note(8).map(|n| (n.order, n.checked)), Some((1, true)));
        let names: Vec<&str> = board
            .sections_in_order()
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Now", "Later"]);
    }

    fn note_json(id: &str, section_id: u64) -> String {
        format!(
            r#"{{"ID": {}, "Order": 0, "Content": "x", "SectionID": {},
                "DateUpdated": "2024-05-01T10:00:00Z", "DateCreated": "2024-05-01T10:00:00Z"}}"#,
            id, section_id
        )
    }

    #[test]
    fn id_at_limit_falls_back_to_sample() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        let json = format!(
            r#"{{"SectionData": [{{"ID": 0, "Order": 0, "Name": "A"}}], "Notes": [{}]}}"#,
            note_json("18446744073709551615", 0)
        );
        fs::write(&path, json).unwrap();
        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::Sample);
        loaded.board.verify().unwrap();
    }

    #[test]
    fn duplicate_section_ids_fall_back_to_sample() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        let json = format!(
            r#"{{"SectionData": [
                {{"ID": 0, "Order": 0, "Name": "A"}},
                {{"ID": 0, "Order": 1, "Name": "B"}}
            ], "Notes": [{}]}}"#,
            note_json("1", 0)
        );
        fs::write(&path, json).unwrap();
        let loaded = load_board(&path);
        assert_eq!(loaded.source, LoadSource::Sample);
        let kanban = Kanban::new(loaded.board);
        assert_eq!(kanban.index().section_count(), kanban.board().sections().len());
    }

    #[test]
    fn duplicate_note_ids_fall_back_to_sample() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        let json = format!(
            r#"{{"SectionData": [{{"ID": 0, "Order": 0, "Name": "A"}}], "Notes": [{}, {}]}}"#,
            note_json("7", 0),
            note_json("7", 0)
        );
        fs::write(&path, json).unwrap();
        assert_eq!(load_board(&path).source, LoadSource::Sample);
        assert!(read_board(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn save_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SAVE_FILE_NAME);
        save_board(&path, &Board::blank()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
