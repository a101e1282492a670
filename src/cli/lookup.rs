//! `sheetkeep lookup` and `sheetkeep suggest`: the editor's rules lookups
//! from the command line.

use std::error::Error;

use crate::api::enrich::enrich;
use crate::api::{LookupKind, RulesService};
use crate::character::armor::{ArmorCategory, ArmorProfile, DexRule};
use crate::cli::CliContext;

fn rules_service(ctx: &CliContext) -> RulesService {
    let service = RulesService::from_config(&ctx.config, ctx.offline);
    if !service.is_online() {
        eprintln!("⚠️  Rules lookups are disabled (offline mode or 'enrich' is off).");
    }
    service
}

pub async fn lookup(ctx: &CliContext, kind: LookupKind, name: &str) -> Result<(), Box<dyn Error>> {
    let service = rules_service(ctx);
    let tooltip = enrich(&service, name, kind).await;

    println!("{}", tooltip.title);
    if let Some(entry) = &tooltip.entry {
        println!("  [{} / {}]", entry.category, entry.index);
        if let Some(armor) = entry.armor {
            println!("  {}", describe_armor(armor));
        }
    }
    println!();
    for paragraph in &tooltip.body {
        println!("{paragraph}");
        println!();
    }
    Ok(())
}

fn describe_armor(armor: ArmorProfile) -> String {
    let category = match armor.category {
        ArmorCategory::Light => "light armor",
        ArmorCategory::Medium => "medium armor",
        ArmorCategory::Heavy => "heavy armor",
        ArmorCategory::Shield => return format!("shield, AC +{}", armor.base),
    };
    let dex = match armor.dex {
        DexRule::Full => " + dex".to_string(),
        DexRule::Capped(cap) => format!(" + dex (max {cap})"),
        DexRule::Ignored => String::new(),
    };
    format!("{category}, AC {}{dex}", armor.base)
}

pub async fn suggest(
    ctx: &CliContext,
    kind: LookupKind,
    prefix: &str,
    limit: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let service = rules_service(ctx);
    let limit = limit
        .filter(|limit| *limit > 0)
        .unwrap_or_else(|| ctx.config.max_suggestions());
    let suggestions = service.suggest(prefix, kind, limit).await;

    if suggestions.is_empty() {
        println!("No {kind} names match '{prefix}'.");
    } else {
        for name in suggestions {
            println!("  • {name}");
        }
    }
    Ok(())
}
