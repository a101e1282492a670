//! Armor class derivation.
//!
//! Armor class is never stored: it is recomputed from the record every time
//! the sheet is drawn, so any change to dexterity or to the armor/off-hand
//! slots is reflected immediately.

use std::collections::HashMap;

use crate::character::record::{format_modifier, Ability, CharacterRecord, EquipmentSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

impl ArmorCategory {
    pub fn from_api(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ArmorCategory::Light),
            "medium" => Some(ArmorCategory::Medium),
            "heavy" => Some(ArmorCategory::Heavy),
            "shield" => Some(ArmorCategory::Shield),
            _ => None,
        }
    }
}

/// How much of the dexterity modifier an armor lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexRule {
    Full,
    Capped(i32),
    Ignored,
}

impl DexRule {
    fn apply(self, modifier: i32) -> i32 {
        match self {
            DexRule::Full => modifier,
            DexRule::Capped(cap) => modifier.min(cap),
            DexRule::Ignored => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorProfile {
    pub category: ArmorCategory,
    /// Base armor class for body armor, flat bonus for shields.
    pub base: i32,
    pub dex: DexRule,
}

impl ArmorProfile {
    const fn light(base: i32) -> Self {
        Self {
            category: ArmorCategory::Light,
            base,
            dex: DexRule::Full,
        }
    }

    const fn medium(base: i32) -> Self {
        Self {
            category: ArmorCategory::Medium,
            base,
            dex: DexRule::Capped(2),
        }
    }

    const fn heavy(base: i32) -> Self {
        Self {
            category: ArmorCategory::Heavy,
            base,
            dex: DexRule::Ignored,
        }
    }

    const fn shield(bonus: i32) -> Self {
        Self {
            category: ArmorCategory::Shield,
            base: bonus,
            dex: DexRule::Ignored,
        }
    }
}

const BUILTIN_ARMOR: &[(&str, ArmorProfile)] = &[
    ("padded armor", ArmorProfile::light(11)),
    ("leather armor", ArmorProfile::light(11)),
    ("studded leather armor", ArmorProfile::light(12)),
    ("hide armor", ArmorProfile::medium(12)),
    ("chain shirt", ArmorProfile::medium(13)),
    ("scale mail", ArmorProfile::medium(14)),
    ("breastplate", ArmorProfile::medium(14)),
    ("half plate armor", ArmorProfile::medium(15)),
    ("ring mail", ArmorProfile::heavy(14)),
    ("chain mail", ArmorProfile::heavy(16)),
    ("splint armor", ArmorProfile::heavy(17)),
    ("plate armor", ArmorProfile::heavy(18)),
    ("shield", ArmorProfile::shield(2)),
];

/// Worn items that add to armor class wherever they are equipped.
/// The flag marks items that only work without armor and shield.
const WORN_BONUSES: &[(&str, i32, bool)] = &[
    ("ring of protection", 1, false),
    ("cloak of protection", 1, false),
    ("bracers of defense", 2, true),
];

/// Lookup table from normalized armor name to its rules profile.
#[derive(Debug, Clone)]
pub struct ArmorCatalog {
    entries: HashMap<String, ArmorProfile>,
}

impl Default for ArmorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ArmorCatalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_ARMOR
            .iter()
            .map(|(name, profile)| (name.to_string(), *profile))
            .collect();
        Self { entries }
    }

    /// Record a profile learned at runtime, e.g. from a rules lookup.
    pub fn learn(&mut self, name: &str, profile: ArmorProfile) {
        self.entries.insert(normalize_item_name(name), profile);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<ArmorProfile> {
        let key = normalize_item_name(name);
        if let Some(profile) = self.entries.get(&key) {
            return Some(*profile);
        }
        // "Plate" and "Leather" are common shorthand for the SRD names.
        self.entries.get(&format!("{key} armor")).copied()
    }
}

/// Largest `+N` read as an enchantment. Anything bigger stays in the name.
pub const MAX_ENCHANTMENT: i32 = 10;

fn parse_enchantment(digits: &str) -> Option<i32> {
    digits
        .parse::<i32>()
        .ok()
        .filter(|bonus| (1..=MAX_ENCHANTMENT).contains(bonus))
}

/// Split a magic bonus off an item name: "+1 Chain Mail", "Chain Mail +1"
/// and "Shield, +2" all carry an enchantment.
pub fn split_enchantment(name: &str) -> (&str, i32) {
    let trimmed = name.trim();

    if let Some(rest) = trimmed.strip_prefix('+') {
        let len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if let Some(bonus) = parse_enchantment(&rest[..len]) {
            let remainder = rest[len..].trim_start_matches([' ', ',']);
            if !remainder.is_empty() {
                return (remainder.trim(), bonus);
            }
        }
    }

    if let Some(pos) = trimmed.rfind('+') {
        let digits = &trimmed[pos + 1..];
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Some(bonus) = parse_enchantment(digits) {
                let head = trimmed[..pos].trim_end_matches([' ', ',']).trim();
                if !head.is_empty() {
                    return (head, bonus);
                }
            }
        }
    }

    (trimmed, 0)
}

pub fn normalize_item_name(name: &str) -> String {
    let (base, _) = split_enchantment(name);
    base.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Every term that went into an armor class, for display next to the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorBreakdown {
    pub base: i32,
    pub armor: Option<String>,
    pub dex_modifier: i32,
    pub dex_applied: i32,
    pub shield_bonus: i32,
    pub magic_bonus: i32,
    pub worn_bonus: i32,
    pub total: i32,
}

impl ArmorBreakdown {
    /// The non-zero terms, e.g. `["Chain Mail 16", "shield +2"]`.
    pub fn terms(&self) -> Vec<String> {
        let mut terms = vec![match &self.armor {
            Some(armor) => format!("{armor} {}", self.base),
            None => format!("base {}", self.base),
        }];
        let signed = |label: &str, value: i32| format!("{label} {}", format_modifier(value));
        if self.dex_applied != 0 || self.dex_modifier != 0 {
            if self.dex_applied == self.dex_modifier {
                terms.push(signed("dex", self.dex_applied));
            } else {
                terms.push(format!(
                    "dex {} (of {})",
                    format_modifier(self.dex_applied),
                    format_modifier(self.dex_modifier)
                ));
            }
        }
        if self.shield_bonus != 0 {
            terms.push(signed("shield", self.shield_bonus));
        }
        if self.magic_bonus != 0 {
            terms.push(signed("magic", self.magic_bonus));
        }
        if self.worn_bonus != 0 {
            terms.push(signed("worn", self.worn_bonus));
        }
        terms
    }
}

pub fn derive_armor_class(record: &CharacterRecord, catalog: &ArmorCatalog) -> ArmorBreakdown {
    let dex_modifier = record.abilities.modifier(Ability::Dexterity);

    let mut base = record.base_armor_class;
    let mut dex_rule = DexRule::Full;
    let mut armor = None;
    let mut magic_bonus = 0;

    if let Some(item) = record.equipped(EquipmentSlot::Armor) {
        let (_, enchantment) = split_enchantment(item);
        if let Some(profile) = catalog
            .get(item)
            .filter(|p| p.category != ArmorCategory::Shield)
        {
            base = profile.base;
            dex_rule = profile.dex;
            magic_bonus = enchantment;
            armor = Some(item.to_string());
        }
    }

    if let Some(cap) = record.dex_cap {
        dex_rule = match dex_rule {
            DexRule::Ignored => DexRule::Ignored,
            DexRule::Capped(existing) => DexRule::Capped(existing.min(cap)),
            DexRule::Full => DexRule::Capped(cap),
        };
    }

    let mut shield_bonus = 0;
    if let Some(item) = record.equipped(EquipmentSlot::OffHand) {
        if let Some(profile) = catalog
            .get(item)
            .filter(|p| p.category == ArmorCategory::Shield)
        {
            let (_, enchantment) = split_enchantment(item);
            shield_bonus = profile.base;
            magic_bonus = magic_bonus.saturating_add(enchantment);
        }
    }

    let unarmored = armor.is_none() && shield_bonus == 0;
    let worn_bonus: i32 = record
        .equipment
        .values()
        .map(|item| normalize_item_name(item))
        .filter_map(|name| {
            WORN_BONUSES
                .iter()
                .find(|(worn, _, _)| *worn == name)
                .filter(|(_, _, needs_unarmored)| !needs_unarmored || unarmored)
                .map(|(_, bonus, _)| *bonus)
        })
        .fold(0, i32::saturating_add);

    let dex_applied = dex_rule.apply(dex_modifier);
    let total = [dex_applied, shield_bonus, magic_bonus, worn_bonus]
        .into_iter()
        .fold(base, i32::saturating_add);

    ArmorBreakdown {
        base,
        armor,
        dex_modifier,
        dex_applied,
        shield_bonus,
        magic_bonus,
        worn_bonus,
        total,
    }
}
