//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches to either the
//! interactive sheet editor (the default) or one of the scriptable
//! subcommands.

pub mod character_list;
pub mod edit;
pub mod lookup;
pub mod settings;
pub mod show;
pub mod transfer;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::LookupKind;
use crate::character::record::{EquipmentSlot, ListKind};
use crate::character::{Roster, RosterStore};
use crate::cli::settings::{SetContext, SettingRegistry};
use crate::core::config::{path_display, Config, ConfigStore};
use crate::ui::editor_loop::run_editor;
use crate::utils::logging::{self, LogTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git ",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "sheetkeep")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Keep tabletop character sheets in your terminal")]
#[command(
    long_about = "sheetkeep is a full-screen character sheet editor for 5th edition games. \
Each character gets a tab; edits are saved automatically and equipment, spells and \
feats are annotated with descriptions from a public rules API.\n\n\
Controls:\n\
  Up/Down           Move between fields\n\
  Tab/Shift+Tab     Switch character\n\
  Enter             Edit the selected field (Enter again to save)\n\
  Esc               Cancel the edit in progress\n\
  Del               Clear the selected field or list entry\n\
  Ctrl+N            New character\n\
  Ctrl+R            Rename the current character\n\
  Ctrl+D            Delete the current character\n\
  Ctrl+C / q        Quit (pending edits are flushed first)\n\n\
Every edit is also available as a subcommand, e.g. 'sheetkeep equip Tess armor \"Chain Mail\"'."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to this file (filter with SHEETKEEP_LOG)
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Directory holding roster.json (overrides the data-dir setting)
    #[arg(short = 'd', long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never contact the rules API
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive sheet editor (default)
    Edit {
        /// Character whose tab opens first
        name: Option<String>,
    },
    /// Create a new character
    New {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// List saved characters
    List,
    /// Print a character sheet
    Show {
        name: String,
        /// Print the stored record as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Set a named field (race, class, level, str, hp, base-ac, dex-cap, ...)
    Set {
        name: String,
        field: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Put an item in an equipment slot
    Equip {
        name: String,
        #[arg(value_parser = parse_slot)]
        slot: EquipmentSlot,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        item: Vec<String>,
    },
    /// Empty an equipment slot
    Unequip {
        name: String,
        #[arg(value_parser = parse_slot)]
        slot: EquipmentSlot,
    },
    /// Append an entry to a list (feats, spells, inventory)
    Add {
        name: String,
        #[arg(value_parser = parse_list)]
        list: ListKind,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        entry: Vec<String>,
    },
    /// Remove a list entry by its 1-based position or its text
    Remove {
        name: String,
        #[arg(value_parser = parse_list)]
        list: ListKind,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        entry: Vec<String>,
    },
    /// Rename a character
    Rename { from: String, to: String },
    /// Delete a character
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Look up a name in the rules API
    Lookup {
        #[arg(value_parser = parse_kind)]
        kind: LookupKind,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Autocomplete a partial name against the rules API index
    Suggest {
        #[arg(value_parser = parse_kind)]
        kind: LookupKind,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        prefix: Vec<String>,
        /// Maximum number of suggestions (defaults to max-suggestions)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Write one character to a JSON file
    Export {
        name: String,
        /// Output file (defaults to <name>.json in the current directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Add a character from a JSON file
    Import {
        file: PathBuf,
        /// Store the character under a different name
        #[arg(long = "as", value_name = "NAME")]
        rename: Option<String>,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        key: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Reset a configuration value to its default
    Unset { key: String },
    /// Print the effective configuration
    Show,
}

fn parse_slot(input: &str) -> Result<EquipmentSlot, String> {
    input.parse::<EquipmentSlot>().map_err(|err| err.to_string())
}

fn parse_list(input: &str) -> Result<ListKind, String> {
    input.parse::<ListKind>().map_err(|err| err.to_string())
}

fn parse_kind(input: &str) -> Result<LookupKind, String> {
    input.parse::<LookupKind>()
}

/// Everything a subcommand needs: effective config and the roster file.
pub struct CliContext {
    pub config: Config,
    pub store: RosterStore,
    pub offline: bool,
}

impl CliContext {
    fn from_args(args: &Args) -> Result<Self, Box<dyn Error>> {
        if let Some(path) = &args.config {
            ConfigStore::use_path(path.clone());
        }
        let config = Config::load()?;
        let data_dir = args.data_dir.as_deref().or(config.data_dir());
        let store = RosterStore::open(data_dir)?;
        Ok(Self {
            config,
            store,
            offline: args.offline,
        })
    }

    pub fn load_roster(&self) -> Result<Roster, Box<dyn Error>> {
        Ok(self.store.load()?)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(mut args: Args) -> Result<(), Box<dyn Error>> {
    let interactive = matches!(args.command, None | Some(Commands::Edit { .. }));
    let log_target = match (&args.log, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Discard,
        (None, false) => LogTarget::Stderr,
    };
    if let Err(err) = logging::init(log_target) {
        eprintln!("⚠️  Could not start logging: {err}");
    }

    let command = args.command.take().unwrap_or(Commands::Edit { name: None });
    let result = match CliContext::from_args(&args) {
        Ok(ctx) => dispatch(&ctx, command).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn dispatch(ctx: &CliContext, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Edit { name } => run_editor(ctx, name).await,
        Commands::New { name } => edit::create_character(ctx, &name.join(" ")),
        Commands::List => character_list::list_characters(ctx),
        Commands::Show { name, json } => show::show_character(ctx, &name, json).await,
        Commands::Set { name, field, value } => {
            edit::set_field(ctx, &name, &field, &value.join(" "))
        }
        Commands::Equip { name, slot, item } => edit::equip(ctx, &name, slot, &item.join(" ")),
        Commands::Unequip { name, slot } => edit::equip(ctx, &name, slot, ""),
        Commands::Add { name, list, entry } => {
            edit::add_entry(ctx, &name, list, &entry.join(" "))
        }
        Commands::Remove { name, list, entry } => {
            edit::remove_entry(ctx, &name, list, &entry.join(" "))
        }
        Commands::Rename { from, to } => edit::rename_character(ctx, &from, &to),
        Commands::Delete { name, yes } => edit::delete_character(ctx, &name, yes),
        Commands::Lookup { kind, name } => lookup::lookup(ctx, kind, &name.join(" ")).await,
        Commands::Suggest {
            kind,
            prefix,
            limit,
        } => lookup::suggest(ctx, kind, &prefix.join(" "), limit).await,
        Commands::Export { name, output } => transfer::export(ctx, &name, output),
        Commands::Import { file, rename } => transfer::import(ctx, &file, rename.as_deref()),
        Commands::Config { command } => {
            handle_config_command(ctx, command);
            Ok(())
        }
    }
}

fn handle_config_command(ctx: &CliContext, command: ConfigCommands) {
    let registry = SettingRegistry::new();
    let store = match ConfigStore::global() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };
    // Only default-character needs the roster; an unreadable one just
    // means that key cannot be validated.
    let roster = ctx.load_roster().unwrap_or_default();
    let set_ctx = SetContext {
        store,
        config: &ctx.config,
        roster: &roster,
    };

    let outcome = match command {
        ConfigCommands::Show => {
            println!("Current configuration ({}):", path_display(store.path()));
            for key in registry.keys_display_order() {
                if let Some(handler) = registry.get(key) {
                    println!("{}", handler.format(&ctx.config));
                }
            }
            return;
        }
        ConfigCommands::Set { key, value } => match registry.get(&key) {
            Some(handler) => handler.set(&value, &set_ctx),
            None => Err(settings::SettingError::UnknownKey(key)),
        },
        ConfigCommands::Unset { key } => match registry.get(&key) {
            Some(handler) => handler.unset(&set_ctx),
            None => Err(settings::SettingError::UnknownKey(key)),
        },
    };

    match outcome {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            if matches!(err, settings::SettingError::UnknownKey(_)) {
                eprintln!("   Available keys: {}", registry.keys_sorted().join(", "));
            }
            std::process::exit(err.exit_code());
        }
    }
}

#[cfg(test)]
mod tests;
