//! The persisted character record and the field-level edits the sheet applies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MIN_ABILITY_SCORE: i32 = 1;
pub const MAX_ABILITY_SCORE: i32 = 30;
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;
pub const DEFAULT_BASE_ARMOR_CLASS: i32 = 10;

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "str" | "strength" => Some(Ability::Strength),
            "dex" | "dexterity" => Some(Ability::Dexterity),
            "con" | "constitution" => Some(Ability::Constitution),
            "int" | "intelligence" => Some(Ability::Intelligence),
            "wis" | "wisdom" => Some(Ability::Wisdom),
            "cha" | "charisma" => Some(Ability::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Ability modifier, rounded toward negative infinity (a score of 9 is -1).
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{modifier}")
    } else {
        modifier.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
    #[serde(default)]
    pub temporary: i32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self {
            current: 10,
            max: 10,
            temporary: 0,
        }
    }
}

/// Named positions on the body, each holding at most one item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentSlot {
    Head,
    Neck,
    Cloak,
    Armor,
    MainHand,
    OffHand,
    Hands,
    RingLeft,
    RingRight,
    Belt,
    Feet,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 11] {
        [
            EquipmentSlot::Head,
            EquipmentSlot::Neck,
            EquipmentSlot::Cloak,
            EquipmentSlot::Armor,
            EquipmentSlot::MainHand,
            EquipmentSlot::OffHand,
            EquipmentSlot::Hands,
            EquipmentSlot::RingLeft,
            EquipmentSlot::RingRight,
            EquipmentSlot::Belt,
            EquipmentSlot::Feet,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Neck => "neck",
            EquipmentSlot::Cloak => "cloak",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::MainHand => "main-hand",
            EquipmentSlot::OffHand => "off-hand",
            EquipmentSlot::Hands => "hands",
            EquipmentSlot::RingLeft => "ring-left",
            EquipmentSlot::RingRight => "ring-right",
            EquipmentSlot::Belt => "belt",
            EquipmentSlot::Feet => "feet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "Head",
            EquipmentSlot::Neck => "Neck",
            EquipmentSlot::Cloak => "Cloak",
            EquipmentSlot::Armor => "Armor",
            EquipmentSlot::MainHand => "Main hand",
            EquipmentSlot::OffHand => "Off hand",
            EquipmentSlot::Hands => "Hands",
            EquipmentSlot::RingLeft => "Ring (left)",
            EquipmentSlot::RingRight => "Ring (right)",
            EquipmentSlot::Belt => "Belt",
            EquipmentSlot::Feet => "Feet",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EquipmentSlot {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        EquipmentSlot::all()
            .into_iter()
            .find(|slot| slot.key() == normalized)
            .ok_or_else(|| FieldError::UnknownSlot(s.to_string()))
    }
}

/// The open-ended free-text lists on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Feats,
    Spells,
    Inventory,
}

impl ListKind {
    pub fn all() -> [ListKind; 3] {
        [ListKind::Feats, ListKind::Spells, ListKind::Inventory]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Feats => "Feats",
            ListKind::Spells => "Skills & spells",
            ListKind::Inventory => "Inventory",
        }
    }
}

impl FromStr for ListKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feat" | "feats" => Ok(ListKind::Feats),
            "spell" | "spells" | "skill" | "skills" => Ok(ListKind::Spells),
            "item" | "items" | "inventory" => Ok(ListKind::Inventory),
            _ => Err(FieldError::UnknownList(s.to_string())),
        }
    }
}

/// Errors raised when an edit cannot be applied to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    UnknownField(String),
    UnknownSlot(String),
    UnknownList(String),
    NotANumber { field: String, value: String },
    OutOfRange { field: String, min: i32, max: i32 },
    IndexOutOfRange { list: ListKind, index: usize },
    UnknownEntry { list: ListKind, entry: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::UnknownField(field) => write!(f, "Unknown field '{field}'"),
            FieldError::UnknownSlot(slot) => write!(f, "Unknown equipment slot '{slot}'"),
            FieldError::UnknownList(list) => write!(f, "Unknown list '{list}'"),
            FieldError::NotANumber { field, value } => {
                write!(f, "Field '{field}' expects a number, got '{value}'")
            }
            FieldError::OutOfRange { field, min, max } => {
                write!(f, "Field '{field}' must be between {min} and {max}")
            }
            FieldError::IndexOutOfRange { list, index } => {
                write!(f, "{} has no entry #{}", list.label(), index + 1)
            }
            FieldError::UnknownEntry { list, entry } => {
                write!(f, "{} has no entry '{entry}'", list.label())
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// One persona on the sheet. The name is the unique key within a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub subclass: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub hit_points: HitPoints,
    #[serde(default = "default_base_armor_class")]
    pub base_armor_class: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dex_cap: Option<i32>,
    #[serde(default)]
    pub equipment: BTreeMap<EquipmentSlot, String>,
    #[serde(default)]
    pub feats: Vec<String>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

fn default_level() -> u8 {
    MIN_LEVEL
}

fn default_base_armor_class() -> i32 {
    DEFAULT_BASE_ARMOR_CLASS
}

/// Text fields addressable by name from the CLI and the editor.
pub const TEXT_FIELDS: &[&str] = &[
    "race",
    "class",
    "subclass",
    "background",
    "alignment",
    "player",
    "bio",
    "notes",
];

impl CharacterRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            race: String::new(),
            class: String::new(),
            subclass: String::new(),
            background: String::new(),
            alignment: String::new(),
            player: String::new(),
            bio: String::new(),
            abilities: AbilityScores::default(),
            level: MIN_LEVEL,
            hit_points: HitPoints::default(),
            base_armor_class: DEFAULT_BASE_ARMOR_CLASS,
            dex_cap: None,
            equipment: BTreeMap::new(),
            feats: Vec::new(),
            spells: Vec::new(),
            inventory: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&str> {
        self.equipment.get(&slot).map(String::as_str)
    }

    /// Put an item in a slot. An empty name clears the slot.
    /// Returns the item previously held there.
    pub fn equip(&mut self, slot: EquipmentSlot, item: &str) -> Option<String> {
        let item = item.trim();
        if item.is_empty() {
            self.equipment.remove(&slot)
        } else {
            self.equipment.insert(slot, item.to_string())
        }
    }

    pub fn list(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Feats => &self.feats,
            ListKind::Spells => &self.spells,
            ListKind::Inventory => &self.inventory,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<String> {
        match kind {
            ListKind::Feats => &mut self.feats,
            ListKind::Spells => &mut self.spells,
            ListKind::Inventory => &mut self.inventory,
        }
    }

    /// Append a free-text entry. Blank entries are ignored.
    pub fn push_entry(&mut self, kind: ListKind, entry: &str) -> bool {
        let entry = entry.trim();
        if entry.is_empty() {
            return false;
        }
        self.list_mut(kind).push(entry.to_string());
        true
    }

    pub fn replace_entry(
        &mut self,
        kind: ListKind,
        index: usize,
        entry: &str,
    ) -> Result<(), FieldError> {
        let list = self.list_mut(kind);
        match list.get_mut(index) {
            Some(slot) => {
                *slot = entry.trim().to_string();
                Ok(())
            }
            None => Err(FieldError::IndexOutOfRange { list: kind, index }),
        }
    }

    pub fn remove_entry(&mut self, kind: ListKind, index: usize) -> Result<String, FieldError> {
        let list = self.list_mut(kind);
        if index < list.len() {
            Ok(list.remove(index))
        } else {
            Err(FieldError::IndexOutOfRange { list: kind, index })
        }
    }

    /// Current value of a scalar field, formatted for display and editing.
    pub fn field_value(&self, field: &str) -> Result<String, FieldError> {
        let key = field.trim().to_ascii_lowercase();
        if let Some(ability) = Ability::from_key(&key) {
            return Ok(self.abilities.get(ability).to_string());
        }
        let value = match key.as_str() {
            "race" => self.race.clone(),
            "class" => self.class.clone(),
            "subclass" => self.subclass.clone(),
            "background" => self.background.clone(),
            "alignment" => self.alignment.clone(),
            "player" => self.player.clone(),
            "bio" => self.bio.clone(),
            "notes" => self.notes.clone(),
            "level" => self.level.to_string(),
            "hp" | "hp-current" => self.hit_points.current.to_string(),
            "hp-max" => self.hit_points.max.to_string(),
            "hp-temp" => self.hit_points.temporary.to_string(),
            "base-ac" => self.base_armor_class.to_string(),
            "dex-cap" => self.dex_cap.map(|cap| cap.to_string()).unwrap_or_default(),
            _ => return Err(FieldError::UnknownField(field.to_string())),
        };
        Ok(value)
    }

    /// Apply a scalar edit by field name. Numeric fields are validated;
    /// the record is left untouched when validation fails.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let key = field.trim().to_ascii_lowercase();
        if let Some(ability) = Ability::from_key(&key) {
            let score = parse_number(&key, value)?;
            check_range(&key, score, MIN_ABILITY_SCORE, MAX_ABILITY_SCORE)?;
            self.abilities.set(ability, score);
            return Ok(());
        }

        match key.as_str() {
            "race" => self.race = value.trim().to_string(),
            "class" => self.class = value.trim().to_string(),
            "subclass" => self.subclass = value.trim().to_string(),
            "background" => self.background = value.trim().to_string(),
            "alignment" => self.alignment = value.trim().to_string(),
            "player" => self.player = value.trim().to_string(),
            "bio" => self.bio = value.to_string(),
            "notes" => self.notes = value.to_string(),
            "level" => {
                let level = parse_number(&key, value)?;
                check_range(&key, level, MIN_LEVEL as i32, MAX_LEVEL as i32)?;
                self.level = level as u8;
            }
            "hp" | "hp-current" => {
                let current = parse_number(&key, value)?;
                check_range(&key, current, 0, i32::MAX)?;
                self.hit_points.current = current;
            }
            "hp-max" => {
                let max = parse_number(&key, value)?;
                check_range(&key, max, 0, i32::MAX)?;
                self.hit_points.max = max;
            }
            "hp-temp" => {
                let temporary = parse_number(&key, value)?;
                check_range(&key, temporary, 0, i32::MAX)?;
                self.hit_points.temporary = temporary;
            }
            "base-ac" => {
                let base = parse_number(&key, value)?;
                check_range(&key, base, 0, 40)?;
                self.base_armor_class = base;
            }
            "dex-cap" => {
                if value.trim().is_empty() {
                    self.dex_cap = None;
                } else {
                    let cap = parse_number(&key, value)?;
                    check_range(&key, cap, 0, 10)?;
                    self.dex_cap = Some(cap);
                }
            }
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

pub fn proficiency_bonus(level: u8) -> i32 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL) as i32;
    2 + (level - 1) / 4
}

fn parse_number(field: &str, value: &str) -> Result<i32, FieldError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| FieldError::NotANumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), FieldError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FieldError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_rounds_down_for_odd_low_scores() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(20), 5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn format_modifier_signs_positive_values() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn proficiency_bonus_follows_level_bands() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn set_field_accepts_ability_aliases() {
        let mut record = CharacterRecord::new("Vex");
        record.set_field("DEX", "16").unwrap();
        record.set_field("wisdom", "8").unwrap();
        assert_eq!(record.abilities.dexterity, 16);
        assert_eq!(record.abilities.wisdom, 8);
        assert_eq!(record.abilities.modifier(Ability::Wisdom), -1);
    }

    #[test]
    fn set_field_rejects_out_of_range_and_leaves_record_untouched() {
        let mut record = CharacterRecord::new("Vex");
        let err = record.set_field("str", "31").unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { .. }));
        assert_eq!(record.abilities.strength, 10);

        let err = record.set_field("level", "many").unwrap_err();
        assert!(matches!(err, FieldError::NotANumber { .. }));
        assert_eq!(record.level, 1);

        assert!(record.set_field("level", "0").is_err());
        assert!(record.set_field("hp", "-1").is_err());
    }

    #[test]
    fn set_field_handles_text_and_optional_fields() {
        let mut record = CharacterRecord::new("Vex");
        record.set_field("race", "  Half-Elf ").unwrap();
        record.set_field("dex-cap", "2").unwrap();
        assert_eq!(record.race, "Half-Elf");
        assert_eq!(record.dex_cap, Some(2));
        assert_eq!(record.field_value("dex-cap").unwrap(), "2");

        record.set_field("dex-cap", "").unwrap();
        assert_eq!(record.dex_cap, None);

        let err = record.set_field("charm", "yes").unwrap_err();
        assert_eq!(err, FieldError::UnknownField("charm".to_string()));
    }

    #[test]
    fn equip_with_empty_name_clears_slot() {
        let mut record = CharacterRecord::new("Vex");
        assert_eq!(record.equip(EquipmentSlot::Armor, "Leather Armor"), None);
        assert_eq!(record.equipped(EquipmentSlot::Armor), Some("Leather Armor"));

        let previous = record.equip(EquipmentSlot::Armor, "Studded Leather Armor");
        assert_eq!(previous.as_deref(), Some("Leather Armor"));

        let previous = record.equip(EquipmentSlot::Armor, "   ");
        assert_eq!(previous.as_deref(), Some("Studded Leather Armor"));
        assert_eq!(record.equipped(EquipmentSlot::Armor), None);
    }

    #[test]
    fn list_entries_skip_blanks_and_report_bad_indices() {
        let mut record = CharacterRecord::new("Vex");
        assert!(record.push_entry(ListKind::Inventory, "Rope (50 ft)"));
        assert!(!record.push_entry(ListKind::Inventory, "  "));
        assert_eq!(record.list(ListKind::Inventory).len(), 1);

        record
            .replace_entry(ListKind::Inventory, 0, "Rope (hempen)")
            .unwrap();
        assert_eq!(record.inventory[0], "Rope (hempen)");

        let err = record.remove_entry(ListKind::Inventory, 3).unwrap_err();
        assert_eq!(
            err,
            FieldError::IndexOutOfRange {
                list: ListKind::Inventory,
                index: 3
            }
        );
        assert_eq!(
            record.remove_entry(ListKind::Inventory, 0).unwrap(),
            "Rope (hempen)"
        );
    }

    #[test]
    fn slot_and_list_names_parse_loosely() {
        assert_eq!("Main Hand".parse::<EquipmentSlot>(), Ok(EquipmentSlot::MainHand));
        assert_eq!("off_hand".parse::<EquipmentSlot>(), Ok(EquipmentSlot::OffHand));
        assert!("tail".parse::<EquipmentSlot>().is_err());
        assert_eq!("skills".parse::<ListKind>(), Ok(ListKind::Spells));
        assert_eq!("item".parse::<ListKind>(), Ok(ListKind::Inventory));
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let record: CharacterRecord =
            serde_json::from_str(r#"{"name":"Bare","equipment":{"off-hand":"Shield"}}"#)
                .unwrap();
        assert_eq!(record.level, 1);
        assert_eq!(record.base_armor_class, 10);
        assert_eq!(record.equipped(EquipmentSlot::OffHand), Some("Shield"));
        assert!(record.feats.is_empty());
    }
}
