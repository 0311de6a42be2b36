/// Focus position expressed in order values: `section` is a section order,
/// `row` a note order within that section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub section: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Cursor {
    pub fn new(section: usize, row: usize) -> Self {
        Cursor { section, row }
    }

    /// Pulls the section into `0..section_count`, then the row into the rows
    /// of whatever section that lands on.
    pub fn clamp<F>(&mut self, section_count: usize, rows_in: F)
    where
        F: Fn(usize) -> usize,
    {
        self.section = clamp_index(self.section, section_count);
        self.row = clamp_index(self.row, rows_in(self.section));
    }

    /// Applies one navigation step. Returns whether the cursor moved.
    pub fn step<F>(&mut self, direction: Direction, section_count: usize, rows_in: F) -> bool
    where
        F: Fn(usize) -> usize,
    {
        let before = *self;
        match direction {
            Direction::Up => self.row = self.row.saturating_sub(1),
            Direction::Down => self.row += 1,
            Direction::Left => self.section = self.section.saturating_sub(1),
            Direction::Right => self.section += 1,
        }
        self.clamp(section_count, rows_in);
        *self != before
    }
}

/// Largest valid index for a sequence of `len`, or 0 when it is empty.
pub fn clamp_index(idx: usize, len: usize) -> usize {
    idx.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three sections with 2, 0 and 5 rows.
    fn rows(section: usize) -> usize {
        [2, 0, 5].get(section).copied().unwrap_or(0)
    }

    #[test]
    fn vertical_moves_stay_in_bounds() {
        let mut cursor = Cursor::new(0, 0);
        assert!(!cursor.step(Direction::Up, 3, rows));
        assert!(cursor.step(Direction::Down, 3, rows));
        assert_eq!(cursor.row, 1);
        assert!(!cursor.step(Direction::Down, 3, rows));
        assert_eq!(cursor.row, 1);
    }

    #[test]
    fn horizontal_move_reclamps_row() {
        let mut cursor = Cursor::new(2, 4);
        cursor.step(Direction::Left, 3, rows);
        assert_eq!(cursor, Cursor::new(1, 0));
        cursor.step(Direction::Left, 3, rows);
        assert_eq!(cursor, Cursor::new(0, 0));
        assert!(!cursor.step(Direction::Left, 3, rows));
    }

    #[test]
    fn right_edge_is_sticky() {
        let mut cursor = Cursor::new(2, 3);
        assert!(!cursor.step(Direction::Right, 3, rows));
        assert_eq!(cursor, Cursor::new(2, 3));
    }

    #[test]
    fn clamp_handles_shrunk_board() {
        let mut cursor = Cursor::new(7, 9);
        cursor.clamp(3, rows);
        assert_eq!(cursor, Cursor::new(2, 4));
        cursor.clamp(0, |_| 0);
        assert_eq!(cursor, Cursor::new(0, 0));
    }
}
