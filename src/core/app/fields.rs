//! The editable rows of a character sheet, in display order.

use crate::api::enrich::FieldKey;
use crate::api::LookupKind;
use crate::character::record::{
    format_modifier, Ability, CharacterRecord, EquipmentSlot, FieldError, ListKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Details,
    Abilities,
    Vitals,
    Equipment,
    List(ListKind),
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Details => "Details",
            Section::Abilities => "Abilities",
            Section::Vitals => "Vitals",
            Section::Equipment => "Equipment",
            Section::List(kind) => kind.label(),
        }
    }
}

/// One selectable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetField {
    /// A scalar addressed by its `set_field` key.
    Scalar(&'static str),
    Slot(EquipmentSlot),
    Entry(ListKind, usize),
    /// The trailing "add" row of a list.
    AddEntry(ListKind),
}

const DETAIL_FIELDS: &[(&str, &str)] = &[
    ("race", "Race"),
    ("class", "Class"),
    ("subclass", "Subclass"),
    ("background", "Background"),
    ("alignment", "Alignment"),
    ("player", "Player"),
    ("bio", "Bio"),
    ("notes", "Notes"),
];

const VITAL_FIELDS: &[(&str, &str)] = &[
    ("level", "Level"),
    ("hp", "Hit points"),
    ("hp-max", "Max HP"),
    ("hp-temp", "Temp HP"),
    ("base-ac", "Base AC"),
    ("dex-cap", "Dex cap"),
];

fn ability_key(ability: Ability) -> &'static str {
    match ability {
        Ability::Strength => "str",
        Ability::Dexterity => "dex",
        Ability::Constitution => "con",
        Ability::Intelligence => "int",
        Ability::Wisdom => "wis",
        Ability::Charisma => "cha",
    }
}

/// Every row for `record`, grouped by section.
pub fn sheet_fields(record: &CharacterRecord) -> Vec<(Section, SheetField)> {
    let mut fields = Vec::new();
    for (key, _) in DETAIL_FIELDS {
        fields.push((Section::Details, SheetField::Scalar(*key)));
    }
    for ability in Ability::all() {
        fields.push((Section::Abilities, SheetField::Scalar(ability_key(ability))));
    }
    for (key, _) in VITAL_FIELDS {
        fields.push((Section::Vitals, SheetField::Scalar(*key)));
    }
    for slot in EquipmentSlot::all() {
        fields.push((Section::Equipment, SheetField::Slot(slot)));
    }
    for kind in ListKind::all() {
        let section = Section::List(kind);
        for index in 0..record.list(kind).len() {
            fields.push((section, SheetField::Entry(kind, index)));
        }
        fields.push((section, SheetField::AddEntry(kind)));
    }
    fields
}

impl SheetField {
    pub fn label(&self) -> String {
        match self {
            SheetField::Scalar(key) => DETAIL_FIELDS
                .iter()
                .chain(VITAL_FIELDS)
                .find(|(k, _)| k == key)
                .map(|(_, label)| label.to_string())
                .or_else(|| {
                    Ability::all()
                        .into_iter()
                        .find(|a| ability_key(*a) == *key)
                        .map(|a| a.abbreviation().to_string())
                })
                .unwrap_or_else(|| key.to_string()),
            SheetField::Slot(slot) => slot.label().to_string(),
            SheetField::Entry(_, index) => format!("#{}", index + 1),
            SheetField::AddEntry(_) => "+ add".to_string(),
        }
    }

    /// Text shown in the row, including derived hints like modifiers.
    pub fn display_value(&self, record: &CharacterRecord) -> String {
        match self {
            SheetField::Scalar(key) => {
                let value = self.edit_value(record);
                match Ability::all().into_iter().find(|a| ability_key(*a) == *key) {
                    Some(ability) => format!(
                        "{value} ({})",
                        format_modifier(record.abilities.modifier(ability))
                    ),
                    None => value,
                }
            }
            SheetField::AddEntry(_) => String::new(),
            _ => self.edit_value(record),
        }
    }

    /// Raw value used to seed the inline editor.
    pub fn edit_value(&self, record: &CharacterRecord) -> String {
        match self {
            SheetField::Scalar(key) => record.field_value(key).unwrap_or_default(),
            SheetField::Slot(slot) => record.equipped(*slot).unwrap_or_default().to_string(),
            SheetField::Entry(kind, index) => record
                .list(*kind)
                .get(*index)
                .cloned()
                .unwrap_or_default(),
            SheetField::AddEntry(_) => String::new(),
        }
    }

    /// Write an edited value back. Clearing a list entry removes it.
    pub fn apply(&self, record: &mut CharacterRecord, value: &str) -> Result<(), FieldError> {
        match self {
            SheetField::Scalar(key) => record.set_field(key, value),
            SheetField::Slot(slot) => {
                record.equip(*slot, value);
                Ok(())
            }
            SheetField::Entry(kind, index) => {
                if value.trim().is_empty() {
                    record.remove_entry(*kind, *index).map(|_| ())
                } else {
                    record.replace_entry(*kind, *index, value)
                }
            }
            SheetField::AddEntry(kind) => {
                record.push_entry(*kind, value);
                Ok(())
            }
        }
    }

    /// Remove what the row holds: an entry is deleted, a slot emptied,
    /// and a text field blanked. Numeric scalars are left alone.
    pub fn clear(&self, record: &mut CharacterRecord) -> Result<bool, FieldError> {
        match self {
            SheetField::Scalar(key) if record_text_field(key) => {
                record.set_field(key, "")?;
                Ok(true)
            }
            SheetField::Scalar("dex-cap") => {
                record.set_field("dex-cap", "")?;
                Ok(true)
            }
            SheetField::Slot(slot) => Ok(record.equip(*slot, "").is_some()),
            SheetField::Entry(kind, index) => record.remove_entry(*kind, *index).map(|_| true),
            _ => Ok(false),
        }
    }

    /// Rules category used for autocomplete and tooltips, if any.
    pub fn lookup_kind(&self) -> Option<LookupKind> {
        match self {
            SheetField::Slot(_) => Some(LookupKind::Item),
            SheetField::Entry(kind, _) | SheetField::AddEntry(kind) => {
                Some(LookupKind::for_list(*kind))
            }
            SheetField::Scalar(_) => None,
        }
    }

    pub fn tooltip_key(&self) -> Option<FieldKey> {
        match self {
            SheetField::Slot(slot) => Some(FieldKey::Slot(*slot)),
            SheetField::Entry(kind, index) => Some(FieldKey::Entry(*kind, *index)),
            _ => None,
        }
    }
}

fn record_text_field(key: &str) -> bool {
    crate::character::record::TEXT_FIELDS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_end_with_add_rows() {
        let mut record = CharacterRecord::new("Tess");
        record.push_entry(ListKind::Spells, "Aid");
        let fields = sheet_fields(&record);
        let spells: Vec<_> = fields
            .iter()
            .filter(|(section, _)| *section == Section::List(ListKind::Spells))
            .map(|(_, field)| *field)
            .collect();
        assert_eq!(
            spells,
            vec![
                SheetField::Entry(ListKind::Spells, 0),
                SheetField::AddEntry(ListKind::Spells)
            ]
        );
        assert_eq!(
            fields.len(),
            DETAIL_FIELDS.len() + 6 + VITAL_FIELDS.len() + 11 + 1 + 3
        );
    }

    #[test]
    fn ability_rows_show_modifier() {
        let mut record = CharacterRecord::new("Tess");
        record.abilities.dexterity = 15;
        let field = SheetField::Scalar("dex");
        assert_eq!(field.label(), "DEX");
        assert_eq!(field.display_value(&record), "15 (+2)");
        assert_eq!(field.edit_value(&record), "15");
    }

    #[test]
    fn clearing_entry_text_removes_it() {
        let mut record = CharacterRecord::new("Tess");
        record.push_entry(ListKind::Inventory, "Rope");
        record.push_entry(ListKind::Inventory, "Torch");
        SheetField::Entry(ListKind::Inventory, 0)
            .apply(&mut record, "  ")
            .unwrap();
        assert_eq!(record.inventory, vec!["Torch"]);
    }

    #[test]
    fn add_row_appends() {
        let mut record = CharacterRecord::new("Tess");
        SheetField::AddEntry(ListKind::Feats)
            .apply(&mut record, "Alert")
            .unwrap();
        assert_eq!(record.feats, vec!["Alert"]);
    }

    #[test]
    fn clear_only_touches_clearable_rows() {
        let mut record = CharacterRecord::new("Tess");
        record.race = "Halfling".to_string();
        record.equip(EquipmentSlot::Head, "Circlet");
        assert!(SheetField::Scalar("race").clear(&mut record).unwrap());
        assert!(record.race.is_empty());
        assert!(SheetField::Slot(EquipmentSlot::Head).clear(&mut record).unwrap());
        assert!(!SheetField::Scalar("level").clear(&mut record).unwrap());
        assert_eq!(record.level, 1);
    }

    #[test]
    fn lookup_kinds_follow_rows() {
        assert_eq!(
            SheetField::Slot(EquipmentSlot::Armor).lookup_kind(),
            Some(LookupKind::Item)
        );
        assert_eq!(
            SheetField::AddEntry(ListKind::Spells).lookup_kind(),
            Some(LookupKind::Spell)
        );
        assert_eq!(SheetField::Scalar("race").lookup_kind(), None);
    }
}
