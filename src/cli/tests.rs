use super::*;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn assert_rejected(argv: &[&str]) {
        assert!(
            Args::try_parse_from(argv).is_err(),
            "argv={argv:?} should be rejected"
        );
    }
}

use test_helpers::{assert_rejected, parse_args};

#[test]
fn no_subcommand_opens_editor() {
    let args = parse_args(&["sheetkeep"]);
    assert!(args.command.is_none());
    assert!(!args.offline);
    assert!(args.log.is_none());
}

#[test]
fn global_flags_work_after_subcommand() {
    let argv = [
        "sheetkeep",
        "list",
        "--offline",
        "--data-dir",
        "/tmp/party",
        "-l",
        "trace.log",
    ];
    let args = parse_args(&argv);
    assert!(matches!(args.command, Some(Commands::List)));
    assert!(args.offline);
    assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/party")));
    assert_eq!(args.log, Some(PathBuf::from("trace.log")));
}

#[test]
fn edit_accepts_optional_character() {
    let args = parse_args(&["sheetkeep", "edit", "Tess"]);
    match args.command {
        Some(Commands::Edit { name }) => assert_eq!(name.as_deref(), Some("Tess")),
        _ => panic!("expected edit subcommand"),
    }
}

#[test]
fn multi_word_values_are_collected() {
    let argv = ["sheetkeep", "equip", "Tess", "off-hand", "Shield", "+1"];
    let args = parse_args(&argv);
    match args.command {
        Some(Commands::Equip { name, slot, item }) => {
            assert_eq!(name, "Tess");
            assert_eq!(slot, EquipmentSlot::OffHand);
            assert_eq!(item.join(" "), "Shield +1");
        }
        _ => panic!("expected equip subcommand for argv={argv:?}"),
    }
}

#[test]
fn set_allows_negative_looking_values() {
    let args = parse_args(&["sheetkeep", "set", "Tess", "notes", "-", "owes", "Brom"]);
    match args.command {
        Some(Commands::Set { field, value, .. }) => {
            assert_eq!(field, "notes");
            assert_eq!(value.join(" "), "- owes Brom");
        }
        _ => panic!("expected set subcommand"),
    }
}

#[test]
fn slot_and_list_names_are_validated() {
    assert_rejected(&["sheetkeep", "equip", "Tess", "tail", "Bow"]);
    assert_rejected(&["sheetkeep", "add", "Tess", "pets", "Owl"]);
    assert_rejected(&["sheetkeep", "lookup", "monster", "Goblin"]);

    let args = parse_args(&["sheetkeep", "add", "Tess", "spell", "Fire", "Bolt"]);
    match args.command {
        Some(Commands::Add { list, entry, .. }) => {
            assert_eq!(list, ListKind::Spells);
            assert_eq!(entry, vec!["Fire", "Bolt"]);
        }
        _ => panic!("expected add subcommand"),
    }
}

#[test]
fn suggest_takes_kind_prefix_and_limit() {
    let args = parse_args(&["sheetkeep", "suggest", "items", "long", "-n", "3"]);
    match args.command {
        Some(Commands::Suggest {
            kind,
            prefix,
            limit,
        }) => {
            assert_eq!(kind, LookupKind::Item);
            assert_eq!(prefix, vec!["long"]);
            assert_eq!(limit, Some(3));
        }
        _ => panic!("expected suggest subcommand"),
    }
}

#[test]
fn import_rename_uses_as_flag() {
    let args = parse_args(&["sheetkeep", "import", "tess.json", "--as", "Tess II"]);
    match args.command {
        Some(Commands::Import { file, rename }) => {
            assert_eq!(file, PathBuf::from("tess.json"));
            assert_eq!(rename.as_deref(), Some("Tess II"));
        }
        _ => panic!("expected import subcommand"),
    }
}

#[test]
fn config_subcommands_parse() {
    let args = parse_args(&["sheetkeep", "config", "set", "max-suggestions", "12"]);
    match args.command {
        Some(Commands::Config {
            command: ConfigCommands::Set { key, value },
        }) => {
            assert_eq!(key, "max-suggestions");
            assert_eq!(value, vec!["12"]);
        }
        _ => panic!("expected config set"),
    }

    let args = parse_args(&["sheetkeep", "config", "unset", "enrich"]);
    assert!(matches!(
        args.command,
        Some(Commands::Config {
            command: ConfigCommands::Unset { .. }
        })
    ));
    assert_rejected(&["sheetkeep", "config"]);
}

#[test]
fn delete_confirmation_flag() {
    let args = parse_args(&["sheetkeep", "delete", "Brom", "-y"]);
    assert!(matches!(
        args.command,
        Some(Commands::Delete { yes: true, .. })
    ));
    assert_rejected(&["sheetkeep", "new"]);
}
