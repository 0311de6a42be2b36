use crate::cursor::{Cursor, Direction};
use crate::index::{find_section_by_order, OrderIndex};
use crate::model::{Board, BoardError, Note, NoteId, Section};
use tracing::{debug, warn};

pub const DEFAULT_SECTION_NAME: &str = "Unnamed Section";

/// The single live model: entity store, derived order index and cursor.
///
/// Every operation is one synchronous transition. It either applies fully and
/// returns `true`, or leaves data and cursor untouched and returns `false`.
/// Afterwards the index is rebuilt and the cursor clamped.
#[derive(Debug, Clone)]
pub struct Kanban {
    board: Board,
    index: OrderIndex,
    cursor: Cursor,
    default_section_name: String,
}

impl Kanban {
    pub fn new(board: Board) -> Self {
        let index = OrderIndex::rebuild(&board);
        if !index.orphans().is_empty() {
            warn!(
                orphans = index.orphans().len(),
                "notes reference missing sections and will not be shown"
            );
        }
        let mut kanban = Kanban {
            board,
            index,
            cursor: Cursor::default(),
            default_section_name: DEFAULT_SECTION_NAME.to_string(),
        };
        kanban.settle();
        kanban
    }

    pub fn with_default_section_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.default_section_name = name.trim().to_string();
        }
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Replaces the whole store, as on reload.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.cursor = Cursor::default();
        self.refresh();
    }

    /// Sections left to right, each with its notes in order.
    pub fn columns(&self) -> Vec<(&Section, Vec<&Note>)> {
        self.board
            .sections_in_order()
            .into_iter()
            .map(|section| {
                let notes = self
                    .index
                    .sorted_notes(&self.board, section.id)
                    .unwrap_or_default();
                (section, notes)
            })
            .collect()
    }

    pub fn current_section(&self) -> Option<&Section> {
        find_section_by_order(self.board.sections(), self.cursor.section)
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.index
            .note_at(&self.board, self.cursor.section, self.cursor.row)
    }

    pub fn row_count(&self, section_order: usize) -> usize {
        find_section_by_order(self.board.sections(), section_order)
            .map_or(0, |s| self.index.count(s.id))
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        let Kanban {
            board,
            index,
            cursor,
            ..
        } = self;
        let rows_in = |order: usize| {
            find_section_by_order(board.sections(), order).map_or(0, |s| index.count(s.id))
        };
        cursor.step(direction, index.section_count(), rows_in)
    }

    pub fn toggle_check(&mut self) -> bool {
        let Some(id) = self.current_note_id() else {
            return false;
        };
        let applied = self.board.toggle_checked(id).is_ok();
        self.finish("toggle_check", applied)
    }

    pub fn add_note(&mut self, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        let Some(section_id) = self.current_section().map(|s| s.id) else {
            return false;
        };
        let applied = match self.board.insert_note(section_id, content) {
            Ok(id) => {
                if let Some(order) = self.board.note(id).map(|n| n.order) {
                    self.cursor.row = order;
                }
                true
            }
            Err(err) => skip(err),
        };
        self.finish("add_note", applied)
    }

    pub fn edit_note(&mut self, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        let Some(id) = self.current_note_id() else {
            return false;
        };
        let applied = self
            .board
            .update_note(id, |note| note.content = content.to_string())
            .map_or_else(skip, |_| true);
        self.finish("edit_note", applied)
    }

    pub fn delete_note(&mut self) -> bool {
        let Some(id) = self.current_note_id() else {
            return false;
        };
        let applied = self.board.remove_note(id).map_or_else(skip, |_| true);
        if applied {
            self.cursor.row = self.cursor.row.saturating_sub(1);
        }
        self.finish("delete_note", applied)
    }

    pub fn add_section(&mut self, name: &str) -> bool {
        let name = self.section_name(name);
        let id = match self.board.insert_section(name) {
            Ok(id) => id,
            Err(err) => return skip(err),
        };
        if let Some(order) = self.board.section(id).map(|s| s.order) {
            self.cursor = Cursor::new(order, 0);
        }
        self.finish("add_section", true)
    }

    pub fn edit_section(&mut self, name: &str) -> bool {
        let name = self.section_name(name);
        let Some(id) = self.current_section().map(|s| s.id) else {
            return false;
        };
        let applied = self
            .board
            .rename_section(id, name)
            .map_or_else(skip, |_| true);
        self.finish("edit_section", applied)
    }

    pub fn delete_section(&mut self) -> bool {
        let Some(id) = self.current_section().map(|s| s.id) else {
            return false;
        };
        let applied = match self.board.remove_section(id) {
            Ok(removed) => {
                debug!(section = id, removed, "section deleted");
                self.cursor.section = self.cursor.section.saturating_sub(1);
                true
            }
            Err(err) => skip(err),
        };
        self.finish("delete_section", applied)
    }

    pub fn move_note_up(&mut self) -> bool {
        self.move_within(-1)
    }

    pub fn move_note_down(&mut self) -> bool {
        self.move_within(1)
    }

    pub fn move_note_left(&mut self) -> bool {
        self.move_across(-1)
    }

    pub fn move_note_right(&mut self) -> bool {
        self.move_across(1)
    }

    fn move_within(&mut self, delta: isize) -> bool {
        let Some(target_row) = self.cursor.row.checked_add_signed(delta) else {
            return false;
        };
        let (Some(current), Some(neighbor)) = (
            self.current_note_id(),
            self.index
                .note_at(&self.board, self.cursor.section, target_row)
                .map(|n| n.id),
        ) else {
            return false;
        };
        let applied = self
            .board
            .swap_note_order(current, neighbor)
            .map_or_else(skip, |_| true);
        if applied {
            self.cursor.row = target_row;
        }
        self.finish("move_note_vertical", applied)
    }

    fn move_across(&mut self, delta: isize) -> bool {
        let Some(target_section) = self.cursor.section.checked_add_signed(delta) else {
            return false;
        };
        let Some(dest) = find_section_by_order(self.board.sections(), target_section).map(|s| s.id)
        else {
            return false;
        };
        let Some(id) = self.current_note_id() else {
            return false;
        };
        let applied = match self.board.reassign_note(id, dest) {
            Ok(order) => {
                self.cursor = Cursor::new(target_section, order);
                true
            }
            Err(err) => skip(err),
        };
        self.finish("move_note_across", applied)
    }

    fn current_note_id(&self) -> Option<NoteId> {
        self.current_note().map(|n| n.id)
    }

    fn section_name(&self, input: &str) -> String {
        let name = input.trim();
        if name.is_empty() {
            self.default_section_name.clone()
        } else {
            name.to_string()
        }
    }

    fn finish(&mut self, op: &'static str, applied: bool) -> bool {
        if applied {
            debug!(op, "applied");
            self.refresh();
        }
        applied
    }

    fn refresh(&mut self) {
        self.index = OrderIndex::rebuild(&self.board);
        self.settle();
        debug_assert!(self.board.verify().is_ok(), "{:?}", self.board.verify());
    }

    fn settle(&mut self) {
        let Kanban {
            board,
            index,
            cursor,
            ..
        } = self;
        cursor.clamp(index.section_count(), |order| {
            find_section_by_order(board.sections(), order).map_or(0, |s| index.count(s.id))
        });
    }
}

fn skip(err: BoardError) -> bool {
    debug!(%err, "operation skipped");
    false
}
