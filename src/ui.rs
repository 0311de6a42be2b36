use crate::commands::source_label;
use crate::config::Config;
use crate::cursor::Direction as Nav;
use crate::kanban::Kanban;
use crate::model::{Board, Note};
use crate::storage::{save_board, LoadSource};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListState;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

pub fn run(board: Board, path: PathBuf, source: LoadSource, config: &Config) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(board, path, source, config);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    kanban: Kanban,
    path: PathBuf,
    last_save: Option<Instant>,
    dirty: bool,
    autosave: bool,
    // Set while the board shown is sample data standing in for an unreadable
    // file; autosave stays off until the user saves explicitly.
    sample_guard: bool,
    char_limit: usize,
    scroll_offsets: Vec<usize>,
    status: String,
    mode: Mode,
}

enum Mode {
    Normal,
    Input { op: InputOp, field: FieldValue },
    ConfirmDeleteSection,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum InputOp {
    AddNote,
    EditNote,
    AddSection,
    EditSection,
}

impl InputOp {
    fn title(&self) -> &'static str {
        match self {
            InputOp::AddNote => "New Note",
            InputOp::EditNote => "Edit Note",
            InputOp::AddSection => "New Section",
            InputOp::EditSection => "Rename Section",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            InputOp::AddNote | InputOp::EditNote => "What is the content of the note?",
            InputOp::AddSection | InputOp::EditSection => "What is the name of this section?",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            InputOp::AddNote | InputOp::EditNote => "Type note content here",
            InputOp::AddSection | InputOp::EditSection => "Type the section's name here",
        }
    }
}

/// Single-line text field; `cursor` is a byte offset on a char boundary.
#[derive(Clone, Debug)]
struct FieldValue {
    value: String,
    cursor: usize,
    limit: usize,
}

impl FieldValue {
    fn new(value: &str, limit: usize) -> Self {
        let value: String = value.chars().take(limit).collect();
        FieldValue {
            cursor: value.len(),
            value,
            limit,
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_char(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_char(self.cursor, &self.value);
    }

    fn home(&mut self) {
        self.cursor = 0;
    }

    fn end(&mut self) {
        self.cursor = self.value.len();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        let next = next_char(self.cursor, &self.value);
        self.value.drain(self.cursor..next);
    }

    fn insert_char(&mut self, ch: char) {
        if self.value.chars().count() >= self.limit {
            return;
        }
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl App {
    fn new(board: Board, path: PathBuf, source: LoadSource, config: &Config) -> Self {
        let kanban = Kanban::new(board).with_default_section_name(&config.default_section_name);
        let mut status = format!("Board {} ({})", path.display(), source_label(source));
        let hidden = kanban.index().orphans().len();
        if hidden > 0 {
            status.push_str(&format!(", {} note(s) hidden: their section is missing", hidden));
        }
        let column_count = kanban.board().sections().len();
        App {
            kanban,
            path,
            last_save: None,
            dirty: false,
            autosave: config.autosave,
            sample_guard: source == LoadSource::Sample,
            char_limit: config.input_char_limit.max(1),
            scroll_offsets: vec![0; column_count],
            status,
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        if self.dirty {
            info!("quit with unsaved changes");
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Input { .. } => {
                self.handle_input_key(key);
                false
            }
            Mode::ConfirmDeleteSection => {
                self.handle_confirm_key(key);
                false
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('s') => self.save(),
                KeyCode::Char('r') => self.reload_sample(),
                _ => {}
            }
            return false;
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Up => {
                    let applied = self.kanban.move_note_up();
                    self.after(applied, "Moved note up", "Nothing to move up");
                }
                KeyCode::Down => {
                    let applied = self.kanban.move_note_down();
                    self.after(applied, "Moved note down", "Nothing to move down");
                }
                KeyCode::Left => {
                    let applied = self.kanban.move_note_left();
                    self.after_move_across(applied);
                }
                KeyCode::Right => {
                    let applied = self.kanban.move_note_right();
                    self.after_move_across(applied);
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.kanban.navigate(Nav::Up);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.kanban.navigate(Nav::Down);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.kanban.navigate(Nav::Left);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.kanban.navigate(Nav::Right);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let applied = self.kanban.toggle_check();
                self.after(applied, "Toggled note", "No note selected");
            }
            KeyCode::Char('a') => self.open_input(InputOp::AddNote, ""),
            KeyCode::Char('e') => match self.kanban.current_note().map(|n| n.content.clone()) {
                Some(content) => self.open_input(InputOp::EditNote, &content),
                None => self.status = "No note selected to edit".into(),
            },
            KeyCode::Char('d') => {
                let applied = self.kanban.delete_note();
                self.after(applied, "Deleted note", "No note selected to delete");
            }
            KeyCode::Char('A') => self.open_input(InputOp::AddSection, ""),
            KeyCode::Char('E') => match self.kanban.current_section().map(|s| s.name.clone()) {
                Some(name) => self.open_input(InputOp::EditSection, &name),
                None => self.status = "No section selected".into(),
            },
            KeyCode::Char('D') => {
                if self.kanban.board().sections().len() <= 1 {
                    self.status = "Cannot delete the last section".into();
                } else if let Some(name) = self.kanban.current_section().map(|s| s.name.clone()) {
                    self.status = format!("Delete section {}? (y to confirm, n/Esc to cancel)", name);
                    self.mode = Mode::ConfirmDeleteSection;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Mode::Input { op, field } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Canceled".into();
            }
            KeyCode::Enter => {
                let op = *op;
                let value = field.value.clone();
                self.mode = Mode::Normal;
                self.submit(op, &value);
            }
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.home(),
            KeyCode::End => field.end(),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    field.insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = Mode::Normal;
                let applied = self.kanban.delete_section();
                self.after(applied, "Deleted section", "Cannot delete the last section");
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Delete canceled".into();
            }
            _ => {}
        }
    }

    fn open_input(&mut self, op: InputOp, initial: &str) {
        self.mode = Mode::Input {
            op,
            field: FieldValue::new(initial, self.char_limit),
        };
        self.status = format!("{} (Enter to confirm, Esc to cancel)", op.title());
    }

    fn submit(&mut self, op: InputOp, value: &str) {
        match op {
            InputOp::AddNote => {
                let applied = self.kanban.add_note(value);
                self.after(applied, "Added note", "Note content is empty");
            }
            InputOp::EditNote => {
                let applied = self.kanban.edit_note(value);
                self.after(applied, "Updated note", "Note unchanged");
            }
            InputOp::AddSection => {
                let applied = self.kanban.add_section(value);
                self.after(applied, "Added section", "Section not added");
            }
            InputOp::EditSection => {
                let applied = self.kanban.edit_section(value);
                self.after(applied, "Renamed section", "Section unchanged");
            }
        }
    }

    fn after_move_across(&mut self, applied: bool) {
        let dest = self
            .kanban
            .current_section()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.after(applied, &format!("Moved to {}", dest), "Nothing to move there");
    }

    fn after(&mut self, applied: bool, done: &str, skipped: &str) {
        if !applied {
            self.status = skipped.to_string();
            return;
        }
        self.dirty = true;
        self.status = done.to_string();
        if self.autosave && !self.sample_guard {
            self.save();
        }
    }

    /// Save failures are reported but leave the in-memory board as it is.
    fn save(&mut self) {
        match save_board(&self.path, self.kanban.board()) {
            Ok(()) => {
                self.last_save = Some(Instant::now());
                self.dirty = false;
                self.sample_guard = false;
                self.status = format!("Saved to {}", self.path.display());
            }
            Err(err) => {
                error!("save failed: {:#}", err);
                self.status = format!("Save failed: {:#}", err);
            }
        }
    }

    fn reload_sample(&mut self) {
        self.kanban.replace_board(Board::sample());
        self.sample_guard = true;
        self.after(true, "Loaded sample data (ctrl+s to keep it)", "");
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_board(f, layout[1]);
        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::Input { op, field } => self.draw_input(f, *op, field),
            Mode::ConfirmDeleteSection => self.draw_confirm(f),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let saved = match self.last_save {
            Some(at) => format!("saved {}", format_elapsed(at)),
            None => "not saved this session".to_string(),
        };
        let mut spans = vec![
            Span::styled(
                "kagoban ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}", self.path.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(saved, Style::default().fg(Color::Gray)),
        ];
        if self.dirty {
            spans.push(Span::raw("  •  "));
            spans.push(Span::styled(
                "unsaved changes",
                Style::default().fg(Color::LightRed),
            ));
        }
        if self.autosave {
            spans.push(Span::raw("  •  "));
            spans.push(Span::styled("autosave", Style::default().fg(Color::Green)));
        }

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_board(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = self.kanban.columns();
        if columns.is_empty() {
            let msg = Paragraph::new("No sections defined")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("kagoban"));
            f.render_widget(Clear, area);
            f.render_widget(msg, area);
            return;
        }

        if self.scroll_offsets.len() != columns.len() {
            self.scroll_offsets.resize(columns.len(), 0);
        }

        let chunk_constraints = columns
            .iter()
            .map(|_| Constraint::Percentage(column_share(columns.len())))
            .collect::<Vec<_>>();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(chunk_constraints)
            .split(area);

        let cursor = self.kanban.cursor();
        for (idx, (section, notes)) in columns.iter().enumerate() {
            let active = section.order == cursor.section;
            let accent = color_for_index(idx);
            let note_width = chunks[idx].width.saturating_sub(2);
            let items = notes
                .iter()
                .map(|note| note_item(note, note_width, active && note.order == cursor.row))
                .collect::<Vec<_>>();

            let mut state = ListState::default();
            let viewport = (chunks[idx].height.saturating_sub(2) / CARD_HEIGHT) as usize;
            let mut offset = self.scroll_offsets[idx];
            if active && !items.is_empty() {
                offset = adjust_offset(cursor.row, offset, viewport, 1, items.len());
                state.select(Some(cursor.row));
            } else {
                offset = offset.min(items.len().saturating_sub(1));
            }
            self.scroll_offsets[idx] = offset;
            *state.offset_mut() = offset;

            let title = format!("{} ({})", section.name, notes.len());
            let block = Block::default()
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(accent)
                        .add_modifier(if active {
                            Modifier::BOLD | Modifier::UNDERLINED
                        } else {
                            Modifier::BOLD
                        }),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .style(Style::default().bg(Color::Rgb(16, 18, 24)));

            let list = List::new(items).block(block);
            f.render_stateful_widget(list, chunks[idx], &mut state);
        }
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let detail_line = match self.kanban.current_note() {
            Some(note) => selected_note_detail(note),
            None => Line::from("No note selected"),
        };
        let detail = Paragraph::new(detail_line).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Selected"),
        );
        f.render_widget(detail, bottom[1]);
    }

    fn draw_input(&self, f: &mut ratatui::Frame<'_>, op: InputOp, field: &FieldValue) {
        let area = centered_rect(60, 30, f.size());
        let value = if field.value.is_empty() {
            Span::styled(
                format!("▌{}", op.placeholder()),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(field.with_caret(), Style::default().fg(Color::Cyan))
        };
        let body = vec![
            Line::from(Span::styled(
                op.prompt(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(value),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "{}/{} • Enter to confirm • Esc to cancel",
                    field.value.chars().count(),
                    field.limit
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let dialog = Paragraph::new(body)
            .block(
                Block::default()
                    .title(Span::styled(
                        op.title(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>) {
        let area = centered_rect(50, 30, f.size());
        let (name, count) = self
            .kanban
            .current_section()
            .map(|s| (s.name.clone(), self.kanban.row_count(s.order)))
            .unwrap_or_default();
        let body = vec![
            Line::from(Span::styled(
                format!("Delete section \"{}\" and its {} note(s)?", name, count),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

const CARD_HEIGHT: u16 = 3;

fn footer_help_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("←↑↓→ / h j k l", Style::default().fg(Color::LightCyan)),
        Span::raw(" move  "),
        Span::styled("alt+arrows", Style::default().fg(Color::LightGreen)),
        Span::raw(" carry note  "),
        Span::styled("space", Style::default().fg(Color::LightCyan)),
        Span::raw(" check  "),
        Span::styled("a/e/d", Style::default().fg(Color::LightMagenta)),
        Span::raw(" note  "),
        Span::styled("A/E/D", Style::default().fg(Color::LightYellow)),
        Span::raw(" section  "),
        Span::styled("ctrl+s", Style::default().fg(Color::LightGreen)),
        Span::raw(" save  "),
        Span::styled("ctrl+r", Style::default().fg(Color::LightYellow)),
        Span::raw(" sample  "),
        Span::styled("q", Style::default().fg(Color::LightRed)),
        Span::raw(" quit"),
    ])
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Width of one column as a percentage of the board.
fn column_share(columns: usize) -> u16 {
    let columns = u16::try_from(columns).unwrap_or(u16::MAX).max(1);
    (100 / columns).max(1)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn color_for_index(idx: usize) -> Color {
    let palette = [
        Color::Cyan,
        Color::LightGreen,
        Color::LightMagenta,
        Color::LightBlue,
        Color::LightYellow,
        Color::LightRed,
    ];
    palette[idx % palette.len()]
}

/// First visible row so that `selected` stays `scrolloff` rows from the edges.
fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn prev_char(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map_or(0, |(idx, _)| idx)
}

fn next_char(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map_or(text.len(), |ch| cursor + ch.len_utf8())
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out.chars().take(max).collect()
}

fn note_item(note: &Note, width: u16, selected: bool) -> ListItem<'static> {
    let inner_width = width.saturating_sub(4).max(10) as usize;
    let border_char = if selected { "=" } else { "-" };
    let edge = format!("+{}+", border_char.repeat(inner_width));
    let check = if note.checked { "x" } else { " " };
    let text = truncate_text(
        &format!("[{}] {}", check, note.content),
        inner_width.saturating_sub(2),
    );
    let lines = vec![
        Line::raw(edge.clone()),
        Line::raw(format!("| {:width$} |", text, width = inner_width.saturating_sub(2))),
        Line::raw(edge),
    ];
    let mut base = Style::default().bg(Color::Rgb(22, 24, 30)).fg(Color::Gray);
    if note.checked {
        base = base.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
    }
    let mut item = ListItem::new(lines).style(base);
    if selected {
        item = item.style(
            Style::default()
                .bg(Color::Rgb(255, 215, 95))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    }
    item
}

fn selected_note_detail(note: &Note) -> Line<'static> {
    let mut spans = vec![Span::styled(
        truncate_text(&note.content, 30),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("created {}", note.created_at.format("%Y-%m-%d %H:%M")),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("updated {}", note.updated_at.format("%Y-%m-%d %H:%M")),
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));
    if note.checked {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("done", Style::default().fg(Color::LightGreen)));
    }
    Line::from(spans)
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
