use crate::model::{Board, Note, NoteId, Section, SectionId};
use crate::ordering;
use std::collections::BTreeMap;

/// Per-section grouping of note ids, derived from a [`Board`].
///
/// The index is never patched in place: callers rebuild it after mutating the
/// board. Groups keep store order; sorting by `order` happens at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderIndex {
    groups: BTreeMap<SectionId, Vec<NoteId>>,
    orphans: Vec<NoteId>,
}

impl OrderIndex {
    pub fn rebuild(board: &Board) -> Self {
        let mut groups: BTreeMap<SectionId, Vec<NoteId>> = board
            .sections()
            .iter()
            .map(|s| (s.id, Vec::new()))
            .collect();
        let mut orphans = Vec::new();
        for note in board.notes() {
            match groups.get_mut(&note.section_id) {
                Some(group) => group.push(note.id),
                None => orphans.push(note.id),
            }
        }
        OrderIndex { groups, orphans }
    }

    pub fn note_ids(&self, section_id: SectionId) -> Option<&[NoteId]> {
        self.groups.get(&section_id).map(Vec::as_slice)
    }

    pub fn count(&self, section_id: SectionId) -> usize {
        self.note_ids(section_id).map_or(0, <[NoteId]>::len)
    }

    pub fn section_count(&self) -> usize {
        self.groups.len()
    }

    /// Notes whose section is unknown to the board. They stay in the store but
    /// are never shown or navigated to.
    pub fn orphans(&self) -> &[NoteId] {
        &self.orphans
    }

    /// Notes of a section sorted by order.
    pub fn sorted_notes<'a>(
        &self,
        board: &'a Board,
        section_id: SectionId,
    ) -> Option<Vec<&'a Note>> {
        let ids = self.groups.get(&section_id)?;
        let mut notes: Vec<&Note> = ids.iter().filter_map(|id| board.note(*id)).collect();
        notes.sort_by(|a, b| ordering::rank(*a, *b));
        Some(notes)
    }

    /// Notes of the section at `section_order`, sorted by order.
    pub fn notes_in_section<'a>(
        &self,
        board: &'a Board,
        section_order: usize,
    ) -> Option<(&'a Section, Vec<&'a Note>)> {
        let section = find_section_by_order(board.sections(), section_order)?;
        let notes = self.sorted_notes(board, section.id)?;
        Some((section, notes))
    }

    /// The note at (`section_order`, `note_order`).
    pub fn note_at<'a>(
        &self,
        board: &'a Board,
        section_order: usize,
        note_order: usize,
    ) -> Option<&'a Note> {
        let (_, notes) = self.notes_in_section(board, section_order)?;
        find_note_by_order(&notes, note_order)
    }
}

pub fn find_section_by_order(sections: &[Section], order: usize) -> Option<&Section> {
    sections.iter().find(|s| s.order == order)
}

pub fn find_note_by_order<'a>(notes: &[&'a Note], order: usize) -> Option<&'a Note> {
    notes.iter().copied().find(|n| n.order == order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_gets_an_entry() {
        let mut board = Board::blank();
        let inbox = board.sections()[0].id;
        let done = board.insert_section("Done").unwrap();
        board.insert_note(inbox, "a").unwrap();
        let index = OrderIndex::rebuild(&board);
        assert_eq!(index.section_count(), 2);
        assert_eq!(index.count(inbox), 1);
        assert_eq!(index.note_ids(done), Some(&[][..]));
        assert!(index.orphans().is_empty());
    }

    #[test]
    fn orphans_are_left_out() {
        let sections = vec![Section::new(0, "A", 0)];
        let notes = vec![
            Note::new(0, "kept".into(), 0, 0),
            Note::new(1, "lost".into(), 0, 5),
        ];
        let board = Board::from_parts(sections, notes).unwrap();
        let index = OrderIndex::rebuild(&board);
        assert_eq!(index.note_ids(0), Some(&[0][..]));
        assert_eq!(index.orphans(), &[1]);
        assert!(index.note_ids(5).is_none());
    }

    #[test]
    fn reads_are_sorted_by_order() {
        let mut board = Board::blank();
        let inbox = board.sections()[0].id;
        let a = board.insert_note(inbox, "a").unwrap();
        let b = board.insert_note(inbox, "b").unwrap();
        board.swap_note_order(a, b).unwrap();
        let index = OrderIndex::rebuild(&board);
        let (section, notes) = index.notes_in_section(&board, 0).unwrap();
        assert_eq!(section.id, inbox);
        let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "a"]);
        assert_eq!(index.note_at(&board, 0, 1).map(|n| n.id), Some(a));
    }

    #[test]
    fn lookups_miss_quietly() {
        let board = Board::blank();
        let index = OrderIndex::rebuild(&board);
        assert!(index.notes_in_section(&board, 3).is_none());
        assert!(index.note_at(&board, 0, 0).is_none());
        assert!(find_section_by_order(board.sections(), 1).is_none());
    }
}
