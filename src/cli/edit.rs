//! Non-interactive edits: each command loads the roster, applies one change
//! and writes the roster back before returning.

use std::error::Error;

use tracing::info;

use crate::character::record::{CharacterRecord, EquipmentSlot, FieldError, ListKind};
use crate::character::{Roster, RosterError};
use crate::cli::CliContext;
use crate::core::config::Config;
use crate::utils::input::{sanitize_field_input, squash_whitespace};
use crate::utils::line_editor::prompt_line;

/// Load, mutate and save the roster. `apply` returns the message to print.
fn update_roster<F>(ctx: &CliContext, apply: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Roster) -> Result<String, Box<dyn Error>>,
{
    update_roster_with(ctx, |roster| apply(roster).map(|message| (message, ())))
}

fn update_roster_with<F, T>(ctx: &CliContext, apply: F) -> Result<T, Box<dyn Error>>
where
    F: FnOnce(&mut Roster) -> Result<(String, T), Box<dyn Error>>,
{
    let mut roster = ctx.load_roster()?;
    let (message, value) = apply(&mut roster)?;
    ctx.store.save(&roster)?;
    println!("{message}");
    Ok(value)
}

fn character_mut<'a>(
    roster: &'a mut Roster,
    name: &str,
) -> Result<&'a mut CharacterRecord, RosterError> {
    roster
        .get_mut(name)
        .ok_or_else(|| RosterError::NotFound(name.to_string()))
}

pub fn create_character(ctx: &CliContext, name: &str) -> Result<(), Box<dyn Error>> {
    let name = squash_whitespace(name);
    update_roster(ctx, |roster| {
        let record = roster.create(&name)?;
        info!(character = %record.name, "created character");
        Ok(format!("✅ Created {}", record.name))
    })
}

pub fn set_field(
    ctx: &CliContext,
    name: &str,
    field: &str,
    value: &str,
) -> Result<(), Box<dyn Error>> {
    update_roster(ctx, |roster| {
        let record = character_mut(roster, name)?;
        record.set_field(field, &sanitize_field_input(value))?;
        let shown = record.field_value(field)?;
        Ok(if shown.is_empty() {
            format!("✅ Cleared {field} for {}", record.name)
        } else {
            format!("✅ Set {field} for {} to: {shown}", record.name)
        })
    })
}

/// Equip `item` in `slot`; an empty item empties the slot.
pub fn equip(
    ctx: &CliContext,
    name: &str,
    slot: EquipmentSlot,
    item: &str,
) -> Result<(), Box<dyn Error>> {
    update_roster(ctx, |roster| {
        let record = character_mut(roster, name)?;
        let item = sanitize_field_input(item);
        let previous = record.equip(slot, &item);
        let message = match (item.trim().is_empty(), previous) {
            (true, Some(old)) => format!("✅ Removed {old} from {}'s {}", record.name, slot),
            (true, None) => format!("ℹ️  {}'s {} slot was already empty", record.name, slot),
            (false, Some(old)) => format!(
                "✅ {} now wears {} in {} (was {old})",
                record.name,
                item.trim(),
                slot
            ),
            (false, None) => format!("✅ {} now wears {} in {}", record.name, item.trim(), slot),
        };
        Ok(message)
    })
}

pub fn add_entry(
    ctx: &CliContext,
    name: &str,
    list: ListKind,
    entry: &str,
) -> Result<(), Box<dyn Error>> {
    update_roster(ctx, |roster| {
        let record = character_mut(roster, name)?;
        let entry = sanitize_field_input(entry);
        if !record.push_entry(list, &entry) {
            return Err("Entry text cannot be empty".into());
        }
        Ok(format!(
            "✅ Added {} to {}'s {}",
            entry.trim(),
            record.name,
            list.label().to_lowercase()
        ))
    })
}

pub fn remove_entry(
    ctx: &CliContext,
    name: &str,
    list: ListKind,
    selector: &str,
) -> Result<(), Box<dyn Error>> {
    update_roster(ctx, |roster| {
        let record = character_mut(roster, name)?;
        let index = find_entry(record, list, selector)?;
        let removed = record.remove_entry(list, index)?;
        Ok(format!(
            "✅ Removed {removed} from {}'s {}",
            record.name,
            list.label().to_lowercase()
        ))
    })
}

/// Resolve a 1-based position or an entry's text (case-insensitive) to an index.
pub fn find_entry(
    record: &CharacterRecord,
    list: ListKind,
    selector: &str,
) -> Result<usize, FieldError> {
    let entries = record.list(list);
    let selector = selector.trim();
    if let Ok(position) = selector.parse::<usize>() {
        if position >= 1 && position <= entries.len() {
            return Ok(position - 1);
        }
        return Err(FieldError::IndexOutOfRange {
            list,
            index: position.saturating_sub(1),
        });
    }
    entries
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(selector))
        .ok_or_else(|| FieldError::UnknownEntry {
            list,
            entry: selector.to_string(),
        })
}

pub fn rename_character(ctx: &CliContext, from: &str, to: &str) -> Result<(), Box<dyn Error>> {
    let to = squash_whitespace(to);
    let renamed_default = update_roster_with(ctx, |roster| {
        let old = roster
            .get(from)
            .map(|record| record.name.clone())
            .ok_or_else(|| RosterError::NotFound(from.to_string()))?;
        roster.rename(&old, &to)?;
        info!(from = %old, to = %to, "renamed character");
        Ok((format!("✅ Renamed {old} to {to}"), old))
    })?;

    // Keep default-character pointing at the same record.
    let is_default = ctx
        .config
        .default_character
        .as_deref()
        .is_some_and(|name| name.eq_ignore_ascii_case(&renamed_default));
    if is_default {
        Config::mutate(|config| {
            config.default_character = Some(to.clone());
            Ok(())
        })?;
    }
    Ok(())
}

pub fn delete_character(ctx: &CliContext, name: &str, yes: bool) -> Result<(), Box<dyn Error>> {
    if !yes {
        let answer = prompt_line(&format!("Delete {name}? Type the name to confirm: "), "")?;
        if !answer.trim().eq_ignore_ascii_case(name.trim()) {
            println!("Not deleted.");
            return Ok(());
        }
    }
    update_roster(ctx, |roster| {
        let removed = roster.remove(name)?;
        info!(character = %removed.name, "deleted character");
        let next = roster
            .active_name()
            .map(|active| format!(" ({active} is now active)"))
            .unwrap_or_default();
        Ok(format!("✅ Deleted {}{next}", removed.name))
    })
}
