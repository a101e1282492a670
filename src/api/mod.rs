//! Client-side view of the public rules API.
//!
//! Only the handful of fields the sheet displays are modelled; everything
//! else in a response is ignored so schema additions upstream don't matter.

pub mod cache;
pub mod client;
pub mod enrich;
pub mod lookup;
pub mod suggest;

use serde::Deserialize;
use std::fmt;

use crate::character::armor::{ArmorCategory, ArmorProfile, DexRule};

pub use client::{RulesClient, RulesSource};
pub use enrich::{Tooltip, TooltipSource};
pub use lookup::{LookupKind, RulesService};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiReference {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub results: Vec<ApiReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArmorClassInfo {
    pub base: i32,
    #[serde(default)]
    pub dex_bonus: bool,
    #[serde(default)]
    pub max_bonus: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedReference {
    pub name: String,
}

/// A single rules resource (equipment, spell, feat, magic item...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesResource {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
    #[serde(default)]
    pub higher_level: Vec<String>,
    #[serde(default)]
    pub equipment_category: Option<NamedReference>,
    #[serde(default)]
    pub armor_category: Option<String>,
    #[serde(default)]
    pub armor_class: Option<ArmorClassInfo>,
    #[serde(default)]
    pub rarity: Option<NamedReference>,
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub school: Option<NamedReference>,
}

/// What the sheet keeps from a resolved resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesEntry {
    pub index: String,
    pub name: String,
    pub category: String,
    pub summary: Option<String>,
    pub description: Vec<String>,
    pub armor: Option<ArmorProfile>,
}

impl RulesEntry {
    pub fn from_resource(category: &str, resource: RulesResource) -> Self {
        let summary = resource_summary(&resource);
        let armor = armor_profile(&resource);
        let mut description = resource.desc;
        description.extend(resource.higher_level);
        Self {
            index: resource.index,
            name: resource.name,
            category: category.to_string(),
            summary,
            description,
            armor,
        }
    }
}

impl fmt::Display for RulesEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(summary) = &self.summary {
            write!(f, " ({summary})")?;
        }
        Ok(())
    }
}

fn resource_summary(resource: &RulesResource) -> Option<String> {
    if let Some(level) = resource.level {
        let school = resource
            .school
            .as_ref()
            .map(|s| s.name.to_lowercase())
            .unwrap_or_else(|| "spell".to_string());
        return Some(match level {
            0 => format!("{school} cantrip"),
            n => format!("level {n} {school}"),
        });
    }
    if let Some(rarity) = &resource.rarity {
        return Some(format!("magic item, {}", rarity.name.to_lowercase()));
    }
    if let Some(category) = &resource.armor_category {
        return Some(format!("{} armor", category.to_lowercase()));
    }
    resource
        .equipment_category
        .as_ref()
        .map(|c| c.name.to_lowercase())
}

fn armor_profile(resource: &RulesResource) -> Option<ArmorProfile> {
    let category = ArmorCategory::from_api(resource.armor_category.as_deref()?)?;
    let armor_class = resource.armor_class.as_ref()?;
    let dex = match (category, armor_class.dex_bonus, armor_class.max_bonus) {
        (ArmorCategory::Shield, _, _) | (_, false, _) => DexRule::Ignored,
        (_, true, Some(max)) => DexRule::Capped(max),
        (_, true, None) => DexRule::Full,
    };
    Some(ArmorProfile {
        category,
        base: armor_class.base,
        dex,
    })
}
