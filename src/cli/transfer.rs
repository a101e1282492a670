use std::error::Error;
use std::path::{Path, PathBuf};

use crate::character::store::{export_character, import_character};
use crate::character::RosterError;
use crate::cli::CliContext;
use crate::core::config::path_display;
use crate::utils::url::slugify;

/// Default export file name for a character: `<slug>.json`.
pub fn default_export_path(name: &str) -> PathBuf {
    let slug = slugify(name);
    let stem = if slug.is_empty() { "character" } else { slug.as_str() };
    PathBuf::from(format!("{stem}.json"))
}

pub fn export(ctx: &CliContext, name: &str, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let roster = ctx.load_roster()?;
    let record = roster
        .get(name)
        .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
    let path = output.unwrap_or_else(|| default_export_path(&record.name));
    export_character(record, &path)?;
    println!("✅ Exported {} to {}", record.name, path_display(&path));
    Ok(())
}

pub fn import(ctx: &CliContext, file: &Path, rename: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut roster = ctx.load_roster()?;
    let stored = import_character(&mut roster, file, rename).map_err(|err| {
        let hint = if err.is_duplicate() {
            "\n   Use --as <name> to import under a different name."
        } else {
            ""
        };
        format!("{err}{hint}")
    })?;
    ctx.store.save(&roster)?;
    println!("✅ Imported {stored} from {}", path_display(file));
    Ok(())
}
