use std::error::Error;

use crate::character::armor::{derive_armor_class, ArmorCatalog};
use crate::cli::CliContext;
use crate::core::config::path_display;

pub fn list_characters(ctx: &CliContext) -> Result<(), Box<dyn Error>> {
    let roster = ctx.load_roster()?;

    println!(
        "Saved characters (from {}):\n",
        path_display(ctx.store.path())
    );

    if roster.is_empty() {
        println!("  No characters yet.");
        println!("\n💡 Create one with:");
        println!("   sheetkeep new <name>");
        return Ok(());
    }

    let catalog = ArmorCatalog::builtin();
    let active = roster.active_name();
    for record in roster.iter() {
        let marker = if Some(record.name.as_str()) == active {
            "*"
        } else {
            "•"
        };
        let mut summary = vec![format!("level {}", record.level)];
        for part in [&record.race, &record.class] {
            if !part.trim().is_empty() {
                summary.push(part.clone());
            }
        }
        summary.push(format!("AC {}", derive_armor_class(record, &catalog).total));
        println!("  {marker} {} ({})", record.name, summary.join(", "));
    }
    println!("\n💡 Open the editor on a character with:");
    println!("   sheetkeep edit <name>");
    Ok(())
}
