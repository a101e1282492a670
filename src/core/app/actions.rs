use tokio_util::sync::CancellationToken;

use super::fields::SheetField;
use super::ui_state::{Mode, NamePurpose};
use super::App;
use crate::api::enrich::{FieldKey, Tooltip, TooltipRequest};
use crate::api::LookupKind;
use crate::character::roster::Roster;
use crate::character::sync::SyncStatus;
use crate::ui::picker::PickerState;
use crate::utils::input::squash_whitespace;
use crate::utils::line_editor::{
    apply_line_edit_action, LineEditAction, LineEditOutcome, LineEditorState,
};

#[derive(Debug)]
pub enum AppAction {
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    NextCharacter,
    PreviousCharacter,
    BeginEdit,
    ClearField,
    BeginCreate,
    BeginRename,
    BeginDelete,
    ConfirmDelete(bool),
    Edit(LineEditAction),
    SuggestionNext,
    SuggestionPrevious,
    AcceptSuggestion,
    SuggestionsLoaded {
        prefix: String,
        items: Vec<String>,
    },
    TooltipsLoaded {
        batch_id: u64,
        tooltips: Vec<(FieldKey, Tooltip)>,
    },
    SyncReported(SyncStatus),
    Quit,
}

/// Work the event loop performs on behalf of the app.
#[derive(Debug)]
pub enum AppCommand {
    /// Hand a roster snapshot to the debounced writer.
    Persist(Roster),
    Enrich {
        requests: Vec<TooltipRequest>,
        cancel_token: CancellationToken,
        batch_id: u64,
    },
    Suggest {
        prefix: String,
        kind: LookupKind,
        limit: usize,
    },
    Quit,
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        commands.extend(apply_action(app, action));
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::SelectNext => move_selection(app, 1),
        AppAction::SelectPrevious => move_selection(app, -1),
        AppAction::SelectFirst => {
            app.ui.selected = 0;
            Vec::new()
        }
        AppAction::SelectLast => {
            app.ui.selected = app.fields().len().saturating_sub(1);
            Vec::new()
        }
        AppAction::NextCharacter => switch_character(app, 1),
        AppAction::PreviousCharacter => switch_character(app, -1),
        AppAction::BeginEdit => begin_edit(app),
        AppAction::ClearField => clear_field(app),
        AppAction::BeginCreate => {
            app.ui.mode = Mode::NameCharacter {
                purpose: NamePurpose::Create,
                editor: LineEditorState::default(),
            };
            Vec::new()
        }
        AppAction::BeginRename => {
            if let Some(name) = app.roster.active_name().map(str::to_string) {
                app.ui.mode = Mode::NameCharacter {
                    purpose: NamePurpose::Rename { from: name.clone() },
                    editor: LineEditorState::with_text(name),
                };
            }
            Vec::new()
        }
        AppAction::BeginDelete => {
            if let Some(name) = app.roster.active_name().map(str::to_string) {
                app.ui.mode = Mode::ConfirmDelete { name };
            }
            Vec::new()
        }
        AppAction::ConfirmDelete(confirmed) => confirm_delete(app, confirmed),
        AppAction::Edit(edit) => handle_edit(app, edit),
        AppAction::SuggestionNext => {
            if let Some(picker) = app.ui.suggestions.as_mut() {
                picker.move_down();
            }
            Vec::new()
        }
        AppAction::SuggestionPrevious => {
            if let Some(picker) = app.ui.suggestions.as_mut() {
                picker.move_up();
            }
            Vec::new()
        }
        AppAction::AcceptSuggestion => {
            accept_suggestion(app);
            Vec::new()
        }
        AppAction::SuggestionsLoaded { prefix, items } => {
            let current = app.ui.mode.editor().map(|editor| editor.text.as_str());
            if current == Some(prefix.as_str()) {
                app.ui.suggestions = if items.is_empty() {
                    None
                } else {
                    Some(PickerState::new(prefix, items))
                };
            }
            Vec::new()
        }
        AppAction::TooltipsLoaded { batch_id, tooltips } => {
            if app.tooltips.finish_batch(batch_id, tooltips) && app.learn_from_tooltips() > 0 {
                app.ui.set_status("Armor class updated from rules data");
            }
            Vec::new()
        }
        AppAction::SyncReported(status) => {
            if let SyncStatus::Failed(message) = status {
                app.ui.set_status(format!("⚠️ Save failed: {message}"));
            }
            Vec::new()
        }
        AppAction::Quit => {
            app.tooltips.cancel();
            app.should_quit = true;
            vec![AppCommand::Quit]
        }
    }
}

fn move_selection(app: &mut App, delta: isize) -> Vec<AppCommand> {
    let len = app.fields().len();
    if len > 0 {
        let next = (app.ui.selected as isize + delta).clamp(0, len as isize - 1);
        app.ui.selected = next as usize;
    }
    Vec::new()
}

fn switch_character(app: &mut App, delta: isize) -> Vec<AppCommand> {
    if app.roster.len() < 2 {
        return Vec::new();
    }
    app.roster.cycle_active(delta);
    app.tooltips.reset();
    app.clamp_selection();
    app.enrichment_command().into_iter().collect()
}

fn begin_edit(app: &mut App) -> Vec<AppCommand> {
    let Some(record) = app.active() else {
        app.ui.mode = Mode::NameCharacter {
            purpose: NamePurpose::Create,
            editor: LineEditorState::default(),
        };
        return Vec::new();
    };
    let Some(field) = app.selected_field() else {
        return Vec::new();
    };
    let editor = LineEditorState::with_text(field.edit_value(record));
    app.ui.mode = Mode::EditField { field, editor };
    app.ui.suggestions = None;
    Vec::new()
}

fn clear_field(app: &mut App) -> Vec<AppCommand> {
    let Some(field) = app.selected_field() else {
        return Vec::new();
    };
    let Some(record) = app.roster.active_mut() else {
        return Vec::new();
    };
    match field.clear(record) {
        Ok(true) => after_record_change(app, field),
        Ok(false) => Vec::new(),
        Err(err) => {
            app.ui.set_status(format!("❌ {err}"));
            Vec::new()
        }
    }
}

fn handle_edit(app: &mut App, edit: LineEditAction) -> Vec<AppCommand> {
    let Some(editor) = app.ui.mode.editor_mut() else {
        return Vec::new();
    };
    match apply_line_edit_action(editor, edit) {
        LineEditOutcome::Continue { changed: false } => Vec::new(),
        LineEditOutcome::Continue { changed: true } => suggestion_command(app).into_iter().collect(),
        LineEditOutcome::Cancelled => {
            app.ui.mode = Mode::Browse;
            app.ui.suggestions = None;
            Vec::new()
        }
        LineEditOutcome::Submit(value) => submit(app, value),
    }
}

fn suggestion_command(app: &mut App) -> Option<AppCommand> {
    let Mode::EditField { field, editor } = &app.ui.mode else {
        return None;
    };
    let kind = field.lookup_kind();
    let prefix = editor.text.clone();
    match kind {
        Some(kind) if app.tooltips.enabled && !prefix.trim().is_empty() => {
            Some(AppCommand::Suggest {
                prefix,
                kind,
                limit: app.max_suggestions,
            })
        }
        _ => {
            app.ui.suggestions = None;
            None
        }
    }
}

fn accept_suggestion(app: &mut App) {
    let Some(choice) = app
        .ui
        .suggestions
        .as_ref()
        .and_then(|picker| picker.selected_item().or_else(|| picker.items.first().map(String::as_str)))
        .map(str::to_string)
    else {
        return;
    };
    if let Some(editor) = app.ui.mode.editor_mut() {
        *editor = LineEditorState::with_text(choice);
    }
    app.ui.suggestions = None;
}

fn submit(app: &mut App, value: String) -> Vec<AppCommand> {
    let mode = std::mem::replace(&mut app.ui.mode, Mode::Browse);
    app.ui.suggestions = None;
    match mode {
        Mode::EditField { field, editor } => submit_field(app, field, editor, value),
        Mode::NameCharacter { purpose, editor } => submit_name(app, purpose, editor, value),
        other => {
            app.ui.mode = other;
            Vec::new()
        }
    }
}

fn submit_field(
    app: &mut App,
    field: SheetField,
    editor: LineEditorState,
    value: String,
) -> Vec<AppCommand> {
    let Some(record) = app.roster.active_mut() else {
        return Vec::new();
    };
    if let Err(err) = field.apply(record, &value) {
        app.ui.set_status(format!("❌ {err}"));
        app.ui.mode = Mode::EditField { field, editor };
        return Vec::new();
    }
    if let SheetField::AddEntry(_) = field {
        if !value.trim().is_empty() {
            // Keep the cursor on the add row, which moved down by one.
            app.ui.selected += 1;
        }
    }
    after_record_change(app, field)
}

fn submit_name(
    app: &mut App,
    purpose: NamePurpose,
    editor: LineEditorState,
    value: String,
) -> Vec<AppCommand> {
    let name = squash_whitespace(&value);
    let result = match &purpose {
        NamePurpose::Create => app.roster.create(&name).map(|_| ()),
        NamePurpose::Rename { from } => app.roster.rename(from, &name),
    };
    if let Err(err) = result {
        app.ui.set_status(format!("❌ {err}"));
        app.ui.mode = Mode::NameCharacter { purpose, editor };
        return Vec::new();
    }

    match purpose {
        NamePurpose::Create => {
            let _ = app.roster.set_active(&name);
            app.ui.selected = 0;
            app.tooltips.reset();
            app.ui.set_status(format!("Created {name}"));
        }
        NamePurpose::Rename { from } => {
            app.ui.set_status(format!("Renamed {from} to {name}"));
        }
    }

    let mut commands = vec![app.persist_command()];
    commands.extend(app.enrichment_command());
    commands
}

fn confirm_delete(app: &mut App, confirmed: bool) -> Vec<AppCommand> {
    let mode = std::mem::replace(&mut app.ui.mode, Mode::Browse);
    let Mode::ConfirmDelete { name } = mode else {
        app.ui.mode = mode;
        return Vec::new();
    };
    if !confirmed {
        return Vec::new();
    }
    match app.roster.remove(&name) {
        Ok(_) => {
            app.ui.set_status(format!("Deleted {name}"));
            app.tooltips.reset();
            app.clamp_selection();
            let mut commands = vec![app.persist_command()];
            commands.extend(app.enrichment_command());
            commands
        }
        Err(err) => {
            app.ui.set_status(format!("❌ {err}"));
            Vec::new()
        }
    }
}

/// Every record edit is persisted; edits to looked-up rows also refresh
/// tooltips.
fn after_record_change(app: &mut App, field: SheetField) -> Vec<AppCommand> {
    app.clamp_selection();
    let mut commands = vec![app.persist_command()];
    if field.lookup_kind().is_some() {
        commands.extend(app.enrichment_command());
    }
    commands
}
