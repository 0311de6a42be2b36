use crate::ordering::{self, Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type NoteId = u64;
pub type SectionId = u64;

pub const INBOX_NAME: &str = "Inbox";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Note {
    #[serde(rename = "ID")]
    pub id: NoteId,
    #[serde(rename = "Order")]
    pub order: usize,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "SectionID")]
    pub section_id: SectionId,
    #[serde(rename = "DateUpdated")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DateCreated")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "IsChecked", default)]
    pub checked: bool,
    /// Reserved soft-delete flag. Deletion currently always removes the note.
    #[serde(rename = "IsDeleted", default)]
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Section {
    #[serde(rename = "ID")]
    pub id: SectionId,
    #[serde(rename = "Order")]
    pub order: usize,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("refusing to delete the last section")]
    LastSection,
    #[error("order values are not dense: {0}")]
    Corrupt(String),
    #[error("invalid board data: {0}")]
    Invalid(String),
    #[error("no ids left to allocate")]
    IdsExhausted,
}

impl Note {
    pub fn new(id: NoteId, content: String, order: usize, section_id: SectionId) -> Self {
        let now = Utc::now();
        Note {
            id,
            order,
            content,
            section_id,
            updated_at: now,
            created_at: now,
            checked: false,
            deleted: false,
        }
    }
}

impl Section {
    pub fn new(id: SectionId, name: impl Into<String>, order: usize) -> Self {
        Section {
            id,
            order,
            name: name.into(),
        }
    }
}

impl Ordered for Note {
    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn tie_key(&self) -> u64 {
        self.id
    }
}

impl Ordered for Section {
    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn tie_key(&self) -> u64 {
        self.id
    }
}

/// The entity store: canonical, flat lists of sections and notes.
///
/// Ids come from two store-owned monotonic counters. Every structural change
/// renumbers the affected group before returning, so section orders and each
/// section's note orders stay dense.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    sections: Vec<Section>,
    notes: Vec<Note>,
    next_note_id: NoteId,
    next_section_id: SectionId,
}

impl Board {
    /// A board with a single empty "Inbox" section.
    pub fn blank() -> Self {
        Board {
            sections: vec![Section::new(0, INBOX_NAME, 0)],
            notes: Vec::new(),
            next_note_id: 0,
            next_section_id: 1,
        }
    }

    /// The built-in sample board used when the save file cannot be parsed.
    pub fn sample() -> Self {
        let mut board = Board {
            sections: vec![
                Section::new(0, "Uncategorized", 0),
                Section::new(1, INBOX_NAME, 1),
            ],
            notes: Vec::new(),
            next_note_id: 0,
            next_section_id: 2,
        };
        for (section_id, count) in [(0, 4), (1, 2)] {
            for i in 0..count {
                let id = board.next_note_id;
                board
                    .notes
                    .push(Note::new(id, format!("test{}", i), i, section_id));
                board.next_note_id += 1;
            }
        }
        board
    }

    /// Builds a board from loaded data, restoring what the store relies on:
    /// at least one section, dense order values, and id counters past every
    /// id in use. Notes pointing at unknown sections are kept untouched.
    ///
    /// Duplicate ids and ids with no successor cannot be repaired and are
    /// rejected.
    pub fn from_parts(
        mut sections: Vec<Section>,
        mut notes: Vec<Note>,
    ) -> Result<Self, BoardError> {
        if let Some(id) = first_duplicate(sections.iter().map(|s| s.id)) {
            return Err(BoardError::Invalid(format!("duplicate section id {}", id)));
        }
        if let Some(id) = first_duplicate(notes.iter().map(|n| n.id)) {
            return Err(BoardError::Invalid(format!("duplicate note id {}", id)));
        }
        if sections.is_empty() {
            let id = next_id(notes.iter().map(|n| n.section_id))?;
            sections.push(Section::new(id, INBOX_NAME, 0));
        }
        ordering::renumber(&mut sections, |_| ());
        ordering::renumber(&mut notes, |n| n.section_id);
        let next_note_id = next_id(notes.iter().map(|n| n.id))?;
        let next_section_id = next_id(sections.iter().map(|s| s.id))?;
        Ok(Board {
            sections,
            notes,
            next_note_id,
            next_section_id,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Sections sorted left to right.
    pub fn sections_in_order(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by(|a, b| ordering::rank(*a, *b));
        sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn find_section_by_name(&self, name: &str) -> Option<&Section> {
        let wanted = name.trim().to_lowercase();
        self.sections_in_order()
            .into_iter()
            .find(|s| s.name.to_lowercase() == wanted)
    }

    pub fn notes_in(&self, section_id: SectionId) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(move |n| n.section_id == section_id)
    }

    /// Appends a note after the highest order in the section.
    pub fn insert_note(
        &mut self,
        section_id: SectionId,
        content: impl Into<String>,
    ) -> Result<NoteId, BoardError> {
        if self.section(section_id).is_none() {
            return Err(BoardError::SectionNotFound(section_id));
        }
        let order = self.next_note_order(section_id);
        let id = self.allocate_note_id()?;
        self.notes
            .push(Note::new(id, content.into(), order, section_id));
        Ok(id)
    }

    /// Appends a section after the highest order.
    pub fn insert_section(
        &mut self,
        name: impl Into<String>,
    ) -> Result<SectionId, BoardError> {
        let order = ordering::max_order(&self.sections).map_or(0, |max| max + 1);
        let id = self.allocate_section_id()?;
        self.sections.push(Section::new(id, name, order));
        Ok(id)
    }

    pub fn update_note<F>(&mut self, note_id: NoteId, f: F) -> Result<(), BoardError>
    where
        F: FnOnce(&mut Note),
    {
        let note = self.note_mut(note_id)?;
        f(note);
        note.updated_at = Utc::now();
        Ok(())
    }

    pub fn toggle_checked(&mut self, note_id: NoteId) -> Result<bool, BoardError> {
        let note = self.note_mut(note_id)?;
        note.checked = !note.checked;
        Ok(note.checked)
    }

    pub fn rename_section(
        &mut self,
        section_id: SectionId,
        name: impl Into<String>,
    ) -> Result<(), BoardError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(BoardError::SectionNotFound(section_id))?;
        section.name = name.into();
        Ok(())
    }

    /// Removes a note and closes the gap it leaves in its section.
    pub fn remove_note(&mut self, note_id: NoteId) -> Result<Note, BoardError> {
        let idx = self
            .notes
            .iter()
            .position(|n| n.id == note_id)
            .ok_or(BoardError::NoteNotFound(note_id))?;
        let note = self.notes.remove(idx);
        self.renumber_notes(note.section_id);
        Ok(note)
    }

    /// Removes a section together with its notes. Returns how many notes went
    /// with it.
    pub fn remove_section(&mut self, section_id: SectionId) -> Result<usize, BoardError> {
        let idx = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or(BoardError::SectionNotFound(section_id))?;
        if self.sections.len() <= 1 {
            return Err(BoardError::LastSection);
        }
        self.sections.remove(idx);
        let before = self.notes.len();
        self.notes.retain(|n| n.section_id != section_id);
        ordering::renumber(&mut self.sections, |_| ());
        Ok(before - self.notes.len())
    }

    /// Exchanges the order values of two notes of the same section.
    pub fn swap_note_order(&mut self, a: NoteId, b: NoteId) -> Result<(), BoardError> {
        let ia = self
            .notes
            .iter()
            .position(|n| n.id == a)
            .ok_or(BoardError::NoteNotFound(a))?;
        let ib = self
            .notes
            .iter()
            .position(|n| n.id == b)
            .ok_or(BoardError::NoteNotFound(b))?;
        let order_a = self.notes[ia].order;
        self.notes[ia].order = self.notes[ib].order;
        self.notes[ib].order = order_a;
        Ok(())
    }

    /// Moves a note to the end of another section, renumbering both sides.
    pub fn reassign_note(
        &mut self,
        note_id: NoteId,
        dest: SectionId,
    ) -> Result<usize, BoardError> {
        if self.section(dest).is_none() {
            return Err(BoardError::SectionNotFound(dest));
        }
        let source = self
            .note(note_id)
            .map(|n| n.section_id)
            .ok_or(BoardError::NoteNotFound(note_id))?;
        if source == dest {
            return self
                .note(note_id)
                .map(|n| n.order)
                .ok_or(BoardError::NoteNotFound(note_id));
        }
        let order = self.next_note_order(dest);
        self.update_note(note_id, |note| {
            note.section_id = dest;
            note.order = order;
        })?;
        self.renumber_notes(source);
        self.renumber_notes(dest);
        self.note(note_id)
            .map(|n| n.order)
            .ok_or(BoardError::NoteNotFound(note_id))
    }

    pub fn renumber_notes(&mut self, section_id: SectionId) -> usize {
        ordering::renumber_group(&mut self.notes, |n| n.section_id == section_id)
    }

    /// Checks that section orders and every section's note orders are dense.
    pub fn verify(&self) -> Result<(), BoardError> {
        if self.sections.is_empty() {
            return Err(BoardError::Corrupt("no sections".into()));
        }
        if !ordering::is_dense(self.sections.iter().map(|s| s.order)) {
            return Err(BoardError::Corrupt("section orders".into()));
        }
        for section in &self.sections {
            if !ordering::is_dense(self.notes_in(section.id).map(|n| n.order)) {
                return Err(BoardError::Corrupt(format!(
                    "notes of section {}",
                    section.id
                )));
            }
        }
        Ok(())
    }

    fn note_mut(&mut self, note_id: NoteId) -> Result<&mut Note, BoardError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or(BoardError::NoteNotFound(note_id))
    }

    fn next_note_order(&self, section_id: SectionId) -> usize {
        ordering::max_order(self.notes_in(section_id)).map_or(0, |max| max + 1)
    }

    fn allocate_note_id(&mut self) -> Result<NoteId, BoardError> {
        let id = self.next_note_id;
        self.next_note_id = id.checked_add(1).ok_or(BoardError::IdsExhausted)?;
        Ok(id)
    }

    fn allocate_section_id(&mut self) -> Result<SectionId, BoardError> {
        let id = self.next_section_id;
        self.next_section_id = id.checked_add(1).ok_or(BoardError::IdsExhausted)?;
        Ok(id)
    }
}

/// One past the highest id, or 0 when there are none.
fn next_id(ids: impl Iterator<Item = u64>) -> Result<u64, BoardError> {
    ids.map(|id| {
        id.checked_add(1)
            .ok_or_else(|| BoardError::Invalid(format!("id {} out of range", id)))
    })
    .try_fold(0, |acc, next| next.map(|n| acc.max(n)))
}

fn first_duplicate(mut ids: impl Iterator<Item = u64>) -> Option<u64> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sections() -> (Board, SectionId, SectionId) {
        let mut board = Board::blank();
        let a = board.sections()[0].id;
        let b = board.insert_section("Done").unwrap();
        (board, a, b)
    }

    fn orders(board: &Board, section_id: SectionId) -> Vec<(NoteId, usize)> {
        let mut out: Vec<(NoteId, usize)> =
            board.notes_in(section_id).map(|n| (n.id, n.order)).collect();
        out.sort_by_key(|&(_, order)| order);
        out
    }

    #[test]
    fn blank_board_has_inbox() {
        let board = Board::blank();
        assert_eq!(board.sections().len(), 1);
        assert_eq!(board.sections()[0].name, INBOX_NAME);
        assert!(board.notes().is_empty());
        board.verify().unwrap();
    }

    #[test]
    fn sample_board_is_dense() {
        let board = Board::sample();
        assert_eq!(board.sections().len(), 2);
        assert_eq!(board.notes_in(0).count(), 4);
        assert_eq!(board.notes_in(1).count(), 2);
        board.verify().unwrap();
    }

    #[test]
    fn ids_are_never_reused() {
        let (mut board, a, _) = two_sections();
        let first = board.insert_note(a, "one").unwrap();
        board.remove_note(first).unwrap();
        let second = board.insert_note(a, "two").unwrap();
        assert!(second > first);
    }

    #[test]
    fn insert_into_unknown_section_fails() {
        let mut board = Board::blank();
        assert_eq!(
            board.insert_note(42, "x"),
            Err(BoardError::SectionNotFound(42))
        );
        assert!(board.notes().is_empty());
    }

    #[test]
    fn remove_note_closes_gap() {
        let (mut board, a, _) = two_sections();
        let n0 = board.insert_note(a, "n0").unwrap();
        let n1 = board.insert_note(a, "n1").unwrap();
        let n2 = board.insert_note(a, "n2").unwrap();
        board.remove_note(n1).unwrap();
        assert_eq!(orders(&board, a), vec![(n0, 0), (n2, 1)]);
        board.verify().unwrap();
    }

    #[test]
    fn last_section_cannot_be_removed() {
        let mut board = Board::blank();
        let id = board.sections()[0].id;
        assert_eq!(board.remove_section(id), Err(BoardError::LastSection));
        assert_eq!(board.sections().len(), 1);
    }

    #[test]
    fn remove_section_drops_its_notes_and_renumbers() {
        let (mut board, a, b) = two_sections();
        let c = board.insert_section("Later").unwrap();
        board.insert_note(a, "x").unwrap();
        board.insert_note(a, "y").unwrap();
        board.insert_note(b, "z").unwrap();
        assert_eq!(board.remove_section(a), Ok(2));
        assert_eq!(board.section(b).map(|s| s.order), Some(0));
        assert_eq!(board.section(c).map(|s| s.order), Some(1));
        assert_eq!(board.notes().len(), 1);
        board.verify().unwrap();
    }

    #[test]
    fn reassign_appends_and_renumbers_both_sides() {
        let (mut board, a, b) = two_sections();
        let n0 = board.insert_note(a, "n0").unwrap();
        let n1 = board.insert_note(a, "n1").unwrap();
        let m0 = board.insert_note(b, "m0").unwrap();
        let before = board.note(n0).unwrap().updated_at;
        assert_eq!(board.reassign_note(n0, b), Ok(1));
        assert_eq!(orders(&board, a), vec![(n1, 0)]);
        assert_eq!(orders(&board, b), vec![(m0, 0), (n0, 1)]);
        assert!(board.note(n0).unwrap().updated_at >= before);
        board.verify().unwrap();
    }

    #[test]
    fn swap_exchanges_orders_only() {
        let (mut board, a, _) = two_sections();
        let n0 = board.insert_note(a, "n0").unwrap();
        let n1 = board.insert_note(a, "n1").unwrap();
        board.swap_note_order(n0, n1).unwrap();
        assert_eq!(orders(&board, a), vec![(n1, 0), (n0, 1)]);
    }

    #[test]
    fn toggle_does_not_touch_timestamp() {
        let (mut board, a, _) = two_sections();
        let n0 = board.insert_note(a, "n0").unwrap();
        let stamp = board.note(n0).unwrap().updated_at;
        assert_eq!(board.toggle_checked(n0), Ok(true));
        assert_eq!(board.note(n0).unwrap().updated_at, stamp);
        assert_eq!(board.toggle_checked(n0), Ok(false));
    }

    #[test]
    fn from_parts_repairs_orders_and_counters() {
        let sections = vec![Section::new(3, "A", 5), Section::new(7, "B", 5)];
        let mut n1 = Note::new(10, "a".into(), 2, 3);
        n1.checked = true;
        let n2 = Note::new(4, "b".into(), 2, 3);
        let orphan = Note::new(11, "c".into(), 0, 99);
        let mut board = Board::from_parts(sections, vec![n1, n2, orphan]).unwrap();
        board.verify().unwrap();
        assert_eq!(board.section(3).map(|s| s.order), Some(0));
        assert_eq!(board.section(7).map(|s| s.order), Some(1));
        assert_eq!(orders(&board, 3), vec![(4, 0), (10, 1)]);
        assert!(board.note(11).is_some());
        assert_eq!(board.insert_note(7, "d"), Ok(12));
        assert_eq!(board.insert_section("C"), Ok(8));
    }

    #[test]
    fn from_parts_without_sections_adds_inbox() {
        let board = Board::from_parts(Vec::new(), Vec::new()).unwrap();
        assert_eq!(board.sections().len(), 1);
        assert_eq!(board.sections()[0].name, INBOX_NAME);
    }

    #[test]
    fn from_parts_rejects_duplicate_ids() {
        let sections = vec![Section::new(0, "A", 0), Section::new(0, "B", 1)];
        assert_eq!(
            Board::from_parts(sections, Vec::new()),
            Err(BoardError::Invalid("duplicate section id 0".into()))
        );
        let sections = vec![Section::new(0, "A", 0)];
        let notes = vec![Note::new(4, "a".into(), 0, 0), Note::new(4, "b".into(), 1, 0)];
        assert_eq!(
            Board::from_parts(sections, notes),
            Err(BoardError::Invalid("duplicate note id 4".into()))
        );
    }

    #[test]
    fn from_parts_rejects_ids_without_successor() {
        let sections = vec![Section::new(0, "A", 0)];
        let notes = vec![Note::new(u64::MAX, "a".into(), 0, 0)];
        assert!(matches!(
            Board::from_parts(sections, notes),
            Err(BoardError::Invalid(_))
        ));
        let orphan = vec![Note::new(0, "a".into(), 0, u64::MAX)];
        assert!(Board::from_parts(Vec::new(), orphan).is_err());
    }

    #[test]
    fn allocation_stops_at_the_last_id() {
        let sections = vec![Section::new(0, "A", 0)];
        let notes = vec![Note::new(u64::MAX - 1, "a".into(), 0, 0)];
        let mut board = Board::from_parts(sections, notes).unwrap();
        assert_eq!(board.insert_note(0, "b"), Err(BoardError::IdsExhausted));
        assert_eq!(board.notes().len(), 1);
    }
}
