//! Single-line text editing shared by the sheet editor and CLI prompts.
//!
//! The cursor is measured in grapheme clusters so accented names and emoji
//! move and delete as one unit.

use crate::utils::input::sanitize_field_input;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditorState {
    pub text: String,
    /// Cursor position in graphemes.
    pub cursor: usize,
}

impl LineEditorState {
    pub fn with_text(text: String) -> Self {
        let cursor = text.graphemes(true).count();
        Self { text, cursor }
    }

    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display columns before the cursor, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        let byte_idx = grapheme_to_byte_index(&self.text, self.cursor);
        UnicodeWidthStr::width(&self.text[..byte_idx])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    DeleteToEnd,
    DeleteWord,
    ClearAll,
    Paste(String),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditOutcome {
    Continue { changed: bool },
    Submit(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LineEditorError {
    message: String,
}

impl LineEditorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LineEditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LineEditorError {}

/// Read one line from the terminal in raw mode, starting from `initial`.
pub fn prompt_line(prompt: &str, initial: &str) -> Result<String, LineEditorError> {
    let io_err = |err: io::Error| LineEditorError::new(err.to_string());

    enable_raw_mode().map_err(io_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste).map_err(io_err)?;

    let result = (|| -> Result<String, LineEditorError> {
        let mut state = LineEditorState::with_text(initial.to_string());
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                redraw_line(prompt, &state).map_err(io_err)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(io_err)? {
                continue;
            }
            let action = match event::read().map_err(io_err)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => map_key_event_to_action(&key),
                Event::Paste(text) => Some(LineEditAction::Paste(text)),
                _ => None,
            };
            let Some(action) = action else {
                continue;
            };
            match apply_line_edit_action(&mut state, action) {
                LineEditOutcome::Continue { changed } => needs_redraw = changed,
                LineEditOutcome::Submit(value) => break Ok(value),
                LineEditOutcome::Cancelled => break Err(LineEditorError::new("Cancelled by user")),
            }
        }
    })();

    let restore_raw = disable_raw_mode().map_err(io_err);
    let restore_paste = execute!(stdout, event::DisableBracketedPaste).map_err(io_err);
    println!();

    let value = result?;
    restore_raw?;
    restore_paste?;
    Ok(value)
}

fn redraw_line(prompt: &str, state: &LineEditorState) -> io::Result<()> {
    print!("\r\x1b[K{}{}", prompt, state.text);
    let columns = UnicodeWidthStr::width(prompt) + state.cursor_column();
    if columns > 0 {
        print!("\r\x1b[{}C", columns);
    } else {
        print!("\r");
    }
    io::stdout().flush()
}

pub fn map_key_event_to_action(key: &event::KeyEvent) -> Option<LineEditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(LineEditAction::Submit),
        KeyCode::Esc => Some(LineEditAction::Cancel),
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Delete => Some(LineEditAction::Delete),
        KeyCode::Left => Some(LineEditAction::MoveLeft),
        KeyCode::Right => Some(LineEditAction::MoveRight),
        KeyCode::Home => Some(LineEditAction::MoveStart),
        KeyCode::End => Some(LineEditAction::MoveEnd),
        KeyCode::Char('a') if ctrl => Some(LineEditAction::MoveStart),
        KeyCode::Char('e') if ctrl => Some(LineEditAction::MoveEnd),
        KeyCode::Char('k') if ctrl => Some(LineEditAction::DeleteToEnd),
        KeyCode::Char('w') if ctrl => Some(LineEditAction::DeleteWord),
        KeyCode::Char('u') if ctrl => Some(LineEditAction::ClearAll),
        KeyCode::Char('c') if ctrl => Some(LineEditAction::Cancel),
        KeyCode::Char(c) if !ctrl => Some(LineEditAction::Insert(c)),
        _ => None,
    }
}

pub fn apply_line_edit_action(
    state: &mut LineEditorState,
    action: LineEditAction,
) -> LineEditOutcome {
    let changed = match action {
        LineEditAction::Insert(c) => {
            if c.is_control() {
                false
            } else {
                let before = state.len();
                let byte_idx = grapheme_to_byte_index(&state.text, state.cursor);
                state.text.insert(byte_idx, c);
                // A combining mark joins the previous grapheme.
                state.cursor = (state.cursor + state.len()).saturating_sub(before);
                true
            }
        }
        LineEditAction::Backspace => {
            if state.cursor == 0 {
                false
            } else {
                remove_graphemes(&mut state.text, state.cursor - 1, state.cursor);
                state.cursor -= 1;
                true
            }
        }
        LineEditAction::Delete => {
            if state.cursor >= state.len() {
                false
            } else {
                remove_graphemes(&mut state.text, state.cursor, state.cursor + 1);
                true
            }
        }
        LineEditAction::MoveLeft => {
            let moved = state.cursor > 0;
            state.cursor = state.cursor.saturating_sub(1);
            moved
        }
        LineEditAction::MoveRight => {
            let moved = state.cursor < state.len();
            if moved {
                state.cursor += 1;
            }
            moved
        }
        LineEditAction::MoveStart => std::mem::replace(&mut state.cursor, 0) != 0,
        LineEditAction::MoveEnd => {
            let end = state.len();
            std::mem::replace(&mut state.cursor, end) != end
        }
        LineEditAction::DeleteToEnd => {
            let byte_idx = grapheme_to_byte_index(&state.text, state.cursor);
            let changed = byte_idx < state.text.len();
            state.text.truncate(byte_idx);
            changed
        }
        LineEditAction::DeleteWord => {
            if state.cursor == 0 {
                false
            } else {
                state.cursor = delete_word_before_cursor(&mut state.text, state.cursor);
                true
            }
        }
        LineEditAction::ClearAll => {
            let changed = !state.text.is_empty();
            state.text.clear();
            state.cursor = 0;
            changed
        }
        LineEditAction::Paste(text) => {
            let cleaned = sanitize_field_input(&text);
            if cleaned.is_empty() {
                false
            } else {
                let byte_idx = grapheme_to_byte_index(&state.text, state.cursor);
                let before = state.len();
                state.text.insert_str(byte_idx, &cleaned);
                state.cursor = (state.cursor + state.len()).saturating_sub(before);
                true
            }
        }
        LineEditAction::Submit => return LineEditOutcome::Submit(state.text.clone()),
        LineEditAction::Cancel => return LineEditOutcome::Cancelled,
    };
    LineEditOutcome::Continue { changed }
}

fn remove_graphemes(input: &mut String, start: usize, end: usize) {
    let start_byte = grapheme_to_byte_index(input, start);
    let end_byte = grapheme_to_byte_index(input, end);
    input.replace_range(start_byte..end_byte, "");
}

fn delete_word_before_cursor(input: &mut String, cursor: usize) -> usize {
    let graphemes: Vec<&str> = input.graphemes(true).collect();
    let end = cursor.min(graphemes.len());
    let mut idx = end;
    while idx > 0 && graphemes[idx - 1].trim().is_empty() {
        idx -= 1;
    }
    while idx > 0 && !graphemes[idx - 1].trim().is_empty() {
        idx -= 1;
    }
    let remaining: String = graphemes[..idx]
        .iter()
        .chain(graphemes[end..].iter())
        .copied()
        .collect();
    *input = remaining;
    idx
}

fn grapheme_to_byte_index(input: &str, grapheme_index: usize) -> usize {
    input
        .grapheme_indices(true)
        .nth(grapheme_index)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn insert_and_move_cursor() {
        let mut state = LineEditorState::default();
        assert_eq!(
            apply_line_edit_action(&mut state, LineEditAction::Insert('a')),
            LineEditOutcome::Continue { changed: true }
        );
        apply_line_edit_action(&mut state, LineEditAction::MoveLeft);
        apply_line_edit_action(&mut state, LineEditAction::Insert('b'));
        assert_eq!(state.text, "ba");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut state = LineEditorState::with_text("Zoë".to_string());
        assert_eq!(state.cursor, 3);
        apply_line_edit_action(&mut state, LineEditAction::Backspace);
        assert_eq!(state.text, "Zo");

        let mut combined = LineEditorState::with_text("Zoe\u{0308}".to_string());
        assert_eq!(combined.len(), 3);
        apply_line_edit_action(&mut combined, LineEditAction::Backspace);
        assert_eq!(combined.text, "Zo");
    }

    #[test]
    fn ctrl_k_deletes_to_end() {
        let mut state = LineEditorState::with_text("Chain Mail +1".to_string());
        state.cursor = 10;
        apply_line_edit_action(&mut state, LineEditAction::DeleteToEnd);
        assert_eq!(state.text, "Chain Mail");
        assert_eq!(
            apply_line_edit_action(&mut state, LineEditAction::DeleteToEnd),
            LineEditOutcome::Continue { changed: false }
        );
    }

    #[test]
    fn delete_word_stops_at_whitespace() {
        let mut state = LineEditorState::with_text("Potion of Healing".to_string());
        apply_line_edit_action(&mut state, LineEditAction::DeleteWord);
        assert_eq!(state.text, "Potion of ");
        assert_eq!(state.cursor, 10);
    }

    #[test]
    fn paste_is_flattened_to_one_line() {
        let mut state = LineEditorState::default();
        let outcome =
            apply_line_edit_action(&mut state, LineEditAction::Paste("Bag of\nHolding".into()));
        assert_eq!(outcome, LineEditOutcome::Continue { changed: true });
        assert_eq!(state.text, "Bag of Holding");
        assert_eq!(state.cursor, 14);
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut state = LineEditorState::with_text("日本".to_string());
        assert_eq!(state.cursor_column(), 4);
        state.cursor = 1;
        assert_eq!(state.cursor_column(), 2);
    }

    #[test]
    fn control_shortcuts_map_to_actions() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let plain_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(map_key_event_to_action(&ctrl_a), Some(LineEditAction::MoveStart));
        assert_eq!(map_key_event_to_action(&plain_a), Some(LineEditAction::Insert('a')));
        assert_eq!(map_key_event_to_action(&esc), Some(LineEditAction::Cancel));
    }
}
