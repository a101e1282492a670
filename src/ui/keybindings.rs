//! Mode-aware key mapping for the sheet editor.
//!
//! The same key means different things depending on what the keyboard is
//! driving: Tab switches character while browsing but accepts a suggestion
//! while editing a looked-up field.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{App, AppAction, Mode};
use crate::utils::line_editor::{map_key_event_to_action, LineEditAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Browse,
    EditField,
    NameCharacter,
    ConfirmDelete,
}

impl KeyContext {
    pub fn from_mode(mode: &Mode) -> Self {
        match mode {
            Mode::Browse => KeyContext::Browse,
            Mode::EditField { .. } => KeyContext::EditField,
            Mode::NameCharacter { .. } => KeyContext::NameCharacter,
            Mode::ConfirmDelete { .. } => KeyContext::ConfirmDelete,
        }
    }
}

pub fn map_key_event(app: &App, key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppAction::Quit);
    }

    match KeyContext::from_mode(&app.ui.mode) {
        KeyContext::Browse => map_browse_key(key, ctrl),
        KeyContext::EditField => map_field_edit_key(app, key),
        KeyContext::NameCharacter => map_key_event_to_action(key).map(AppAction::Edit),
        KeyContext::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppAction::ConfirmDelete(true)),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => {
                Some(AppAction::ConfirmDelete(false))
            }
            _ => None,
        },
    }
}

fn map_browse_key(key: &KeyEvent, ctrl: bool) -> Option<AppAction> {
    let action = match key.code {
        KeyCode::Char('n') if ctrl => AppAction::BeginCreate,
        KeyCode::Char('r') if ctrl => AppAction::BeginRename,
        KeyCode::Char('d') if ctrl => AppAction::BeginDelete,
        _ if ctrl => return None,
        KeyCode::Up | KeyCode::Char('k') => AppAction::SelectPrevious,
        KeyCode::Down | KeyCode::Char('j') => AppAction::SelectNext,
        KeyCode::Home | KeyCode::Char('g') => AppAction::SelectFirst,
        KeyCode::End | KeyCode::Char('G') => AppAction::SelectLast,
        KeyCode::Tab | KeyCode::Right => AppAction::NextCharacter,
        KeyCode::BackTab | KeyCode::Left => AppAction::PreviousCharacter,
        KeyCode::Enter => AppAction::BeginEdit,
        KeyCode::Delete | KeyCode::Backspace => AppAction::ClearField,
        KeyCode::Char('q') => AppAction::Quit,
        _ => return None,
    };
    Some(action)
}

fn map_field_edit_key(app: &App, key: &KeyEvent) -> Option<AppAction> {
    let picker = app.ui.suggestions.as_ref().filter(|picker| !picker.is_empty());
    if let Some(picker) = picker {
        match key.code {
            KeyCode::Down => return Some(AppAction::SuggestionNext),
            KeyCode::Up => return Some(AppAction::SuggestionPrevious),
            KeyCode::Tab => return Some(AppAction::AcceptSuggestion),
            KeyCode::Enter if picker.selected.is_some() => {
                return Some(AppAction::AcceptSuggestion)
            }
            _ => {}
        }
    }
    map_key_event_to_action(key).map(AppAction::Edit)
}

/// Pasted text goes into whichever inline editor is open.
pub fn map_paste(app: &App, text: String) -> Option<AppAction> {
    app.ui
        .mode
        .editor()
        .map(|_| AppAction::Edit(LineEditAction::Paste(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::roster::Roster;
    use crate::core::app::{apply_action, AppOptions};
    use crate::ui::picker::PickerState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        let mut roster = Roster::new();
        roster.create("Tess").unwrap();
        roster.create("Brom").unwrap();
        App::new(
            roster,
            AppOptions {
                enrich: true,
                max_suggestions: 5,
                default_character: None,
            },
        )
    }

    fn select_slot(app: &mut App) {
        let index = app
            .fields()
            .iter()
            .position(|(_, field)| field.lookup_kind().is_some())
            .unwrap();
        app.ui.selected = index;
    }

    #[test]
    fn browse_keys_navigate_and_switch_characters() {
        let app = app();
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Down)),
            Some(AppAction::SelectNext)
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Tab)),
            Some(AppAction::NextCharacter)
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::BackTab)),
            Some(AppAction::PreviousCharacter)
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Enter)),
            Some(AppAction::BeginEdit)
        ));
        assert!(matches!(
            map_key_event(&app, &ctrl('n')),
            Some(AppAction::BeginCreate)
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Char('q'))),
            Some(AppAction::Quit)
        ));
        assert!(map_key_event(&app, &ctrl('x')).is_none());
    }

    #[test]
    fn typing_q_while_editing_inserts_text() {
        let mut app = app();
        apply_action(&mut app, AppAction::BeginEdit);
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Char('q'))),
            Some(AppAction::Edit(LineEditAction::Insert('q')))
        ));
        assert!(matches!(
            map_key_event(&app, &ctrl('c')),
            Some(AppAction::Quit)
        ));
    }

    #[test]
    fn suggestion_keys_only_apply_with_candidates() {
        let mut app = app();
        select_slot(&mut app);
        apply_action(&mut app, AppAction::BeginEdit);
        assert!(map_key_event(&app, &key(KeyCode::Tab)).is_none());

        app.ui.suggestions = Some(PickerState::new(
            "",
            vec!["Shield".to_string(), "Shortbow".to_string()],
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Down)),
            Some(AppAction::SuggestionNext)
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Enter)),
            Some(AppAction::Edit(LineEditAction::Submit))
        ));
        apply_action(&mut app, AppAction::SuggestionNext);
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Enter)),
            Some(AppAction::AcceptSuggestion)
        ));
    }

    #[test]
    fn delete_confirmation_defaults_to_no() {
        let mut app = app();
        apply_action(&mut app, AppAction::BeginDelete);
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Char('y'))),
            Some(AppAction::ConfirmDelete(true))
        ));
        assert!(matches!(
            map_key_event(&app, &key(KeyCode::Enter)),
            Some(AppAction::ConfirmDelete(false))
        ));
        assert!(map_key_event(&app, &key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn paste_needs_an_open_editor() {
        let mut app = app();
        assert!(map_paste(&app, "Rope".to_string()).is_none());
        apply_action(&mut app, AppAction::BeginCreate);
        assert!(matches!(
            map_paste(&app, "Rope".to_string()),
            Some(AppAction::Edit(LineEditAction::Paste(_)))
        ));
    }
}
