use std::time::{Duration, Instant};

use crate::core::app::fields::SheetField;
use crate::ui::picker::PickerState;
use crate::utils::line_editor::LineEditorState;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePurpose {
    Create,
    Rename { from: String },
}

/// What the keyboard is currently driving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    EditField {
        field: SheetField,
        editor: LineEditorState,
    },
    NameCharacter {
        purpose: NamePurpose,
        editor: LineEditorState,
    },
    ConfirmDelete {
        name: String,
    },
}

impl Mode {
    pub fn editor(&self) -> Option<&LineEditorState> {
        match self {
            Mode::EditField { editor, .. } | Mode::NameCharacter { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut LineEditorState> {
        match self {
            Mode::EditField { editor, .. } | Mode::NameCharacter { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self, Mode::Browse)
    }
}

pub struct UiState {
    /// Index into the active character's field list.
    pub selected: usize,
    pub mode: Mode,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
    /// Autocomplete candidates for the field being edited.
    pub suggestions: Option<PickerState>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            mode: Mode::Browse,
            status: None,
            status_set_at: None,
            suggestions: None,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    /// Drop the status line once it has been visible long enough.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_set_at {
            Some(set_at) if now.duration_since(set_at) >= STATUS_TTL => {
                self.clear_status();
                true
            }
            _ => false,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
