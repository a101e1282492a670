//! Plain-text rendering of a character sheet for `sheetkeep show`.

use std::error::Error;

use crate::api::enrich::armor_catalog_for;
use crate::api::RulesService;
use crate::character::armor::{derive_armor_class, ArmorCatalog};
use crate::character::record::{format_modifier, Ability, CharacterRecord, EquipmentSlot, ListKind};
use crate::character::RosterError;
use crate::cli::CliContext;

/// Armor missing from the built-in table is looked up unless offline.
pub async fn show_character(
    ctx: &CliContext,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let roster = ctx.load_roster()?;
    let record = roster
        .get(name)
        .ok_or_else(|| RosterError::NotFound(name.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        let rules = RulesService::from_config(&ctx.config, ctx.offline);
        let catalog = armor_catalog_for(&rules, record).await;
        for line in sheet_lines(record, &catalog) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn sheet_lines(record: &CharacterRecord, catalog: &ArmorCatalog) -> Vec<String> {
    let mut lines = vec![record.name.clone()];

    let identity: Vec<&str> = [&record.race, &record.class, &record.subclass]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    let mut headline = format!("Level {}", record.level);
    if !identity.is_empty() {
        headline.push(' ');
        headline.push_str(&identity.join(" "));
    }
    lines.push(headline);

    for (label, value) in [
        ("Background", &record.background),
        ("Alignment", &record.alignment),
        ("Player", &record.player),
    ] {
        if !value.trim().is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines.push(String::new());

    let abilities: Vec<String> = Ability::all()
        .into_iter()
        .map(|ability| {
            format!(
                "{} {} ({})",
                ability,
                record.abilities.get(ability),
                format_modifier(record.abilities.modifier(ability))
            )
        })
        .collect();
    lines.push(abilities.join("  "));

    let ac = derive_armor_class(record, catalog);
    let hp = &record.hit_points;
    let mut vitals = format!("HP {}/{}", hp.current, hp.max);
    if hp.temporary > 0 {
        vitals.push_str(&format!(" (+{} temp)", hp.temporary));
    }
    vitals.push_str(&format!(
        "  Proficiency {}",
        format_modifier(record.proficiency_bonus())
    ));
    lines.push(vitals);
    lines.push(format!("AC {} = {}", ac.total, ac.terms().join(" + ")));

    let equipped: Vec<String> = EquipmentSlot::all()
        .into_iter()
        .filter_map(|slot| {
            record
                .equipped(slot)
                .map(|item| format!("  {:<13}{item}", format!("{}:", slot.label())))
        })
        .collect();
    if !equipped.is_empty() {
        lines.push(String::new());
        lines.push("Equipment".to_string());
        lines.extend(equipped);
    }

    for kind in ListKind::all() {
        let entries = record.list(kind);
        if entries.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(kind.label().to_string());
        lines.extend(
            entries
                .iter()
                .enumerate()
                .map(|(position, entry)| format!("  {}. {entry}", position + 1)),
        );
    }

    for (label, text) in [("Bio", &record.bio), ("Notes", &record.notes)] {
        if !text.trim().is_empty() {
            lines.push(String::new());
            lines.push(label.to_string());
            lines.extend(text.lines().map(|line| format!("  {line}")));
        }
    }
    lines
}
