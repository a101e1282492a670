//! State of the interactive sheet editor.
//!
//! `App` is plain data: key handling turns input into [`AppAction`]s, and
//! applying an action may yield [`AppCommand`]s (persist, enrich, suggest)
//! that the event loop carries out asynchronously.

use crate::api::enrich::{learn_armor, record_requests, Tooltip};
use crate::character::armor::{derive_armor_class, ArmorBreakdown, ArmorCatalog};
use crate::character::record::CharacterRecord;
use crate::character::roster::Roster;
use crate::core::config::Config;

pub mod actions;
pub mod fields;
pub mod tooltips;
pub mod ui_state;


pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use fields::{sheet_fields, Section, SheetField};
pub use tooltips::TooltipState;
pub use ui_state::{Mode, NamePurpose, UiState};

/// Startup options for the editor.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub enrich: bool,
    pub max_suggestions: usize,
    pub default_character: Option<String>,
}

impl AppOptions {
    pub fn from_config(config: &Config, offline: bool) -> Self {
        Self {
            enrich: config.enrich_enabled() && !offline,
            max_suggestions: config.max_suggestions(),
            default_character: config.default_character.clone(),
        }
    }
}

pub struct App {
    pub roster: Roster,
    pub catalog: ArmorCatalog,
    pub ui: UiState,
    pub tooltips: TooltipState,
    pub max_suggestions: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(mut roster: Roster, options: AppOptions) -> Self {
        if let Some(name) = options.default_character.as_deref() {
            // A stale default is not worth failing startup over.
            let _ = roster.set_active(name);
        }
        Self {
            roster,
            catalog: ArmorCatalog::builtin(),
            ui: UiState::new(),
            tooltips: TooltipState::new(options.enrich),
            max_suggestions: options.max_suggestions,
            should_quit: false,
        }
    }

    pub fn active(&self) -> Option<&CharacterRecord> {
        self.roster.active()
    }

    pub fn fields(&self) -> Vec<(Section, SheetField)> {
        self.active().map(sheet_fields).unwrap_or_default()
    }

    pub fn selected_field(&self) -> Option<SheetField> {
        self.fields()
            .get(self.ui.selected)
            .map(|(_, field)| *field)
    }

    pub fn armor_class(&self) -> Option<ArmorBreakdown> {
        self.active()
            .map(|record| derive_armor_class(record, &self.catalog))
    }

    /// Tooltip for the selected row. Rows with a lookup kind always get
    /// one; the placeholder stands in until (or unless) a lookup succeeds.
    pub fn selected_tooltip(&self) -> Option<Tooltip> {
        let record = self.active()?;
        let field = self.selected_field()?;
        field.lookup_kind()?;
        let name = field.edit_value(record);
        if name.trim().is_empty() {
            return None;
        }
        let tooltip = field
            .tooltip_key()
            .and_then(|key| self.tooltips.get(&key))
            .filter(|tooltip| tooltip.describes(&name))
            .cloned();
        Some(tooltip.unwrap_or_else(|| Tooltip::placeholder(&name)))
    }

    /// Keep the selection inside the current field list.
    pub fn clamp_selection(&mut self) {
        let len = self.fields().len();
        if len == 0 {
            self.ui.selected = 0;
        } else if self.ui.selected >= len {
            self.ui.selected = len - 1;
        }
    }

    /// Command to refresh tooltips for the active character, if enrichment
    /// is on and there is anything to look up.
    pub fn enrichment_command(&mut self) -> Option<AppCommand> {
        if !self.tooltips.enabled {
            return None;
        }
        let requests = record_requests(self.active()?);
        if requests.is_empty() {
            self.tooltips.reset();
            return None;
        }
        let (cancel_token, batch_id) = self.tooltips.start_batch();
        Some(AppCommand::Enrich {
            requests,
            cancel_token,
            batch_id,
        })
    }

    /// Teach the armor catalog from the current tooltips.
    pub fn learn_from_tooltips(&mut self) -> usize {
        learn_armor(&mut self.catalog, self.tooltips.values())
    }

    pub fn persist_command(&self) -> AppCommand {
        AppCommand::Persist(self.roster.clone())
    }
}
