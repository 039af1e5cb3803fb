//! Unit tests for CLI parsing and option mapping

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{generate_write_options, Cli, Commands, LocaleCommand};
use crate::settings::OutputSettings;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_swagger_command_with_domain() {
    let cli = Cli::try_parse_from(["uiscaffold-gen", "swagger", "sales", "--probe"]).unwrap();

    match cli.command {
        Commands::Swagger {
            domain,
            out,
            spec_file,
            probe,
        } => {
            assert_eq!(domain.as_deref(), Some("sales"));
            assert_eq!(out, PathBuf::from("configs"));
            assert!(spec_file.is_none());
            assert!(probe);
        }
        _ => panic!("Expected Swagger command"),
    }
}

#[test]
fn test_generate_command_flags() {
    let cli = Cli::try_parse_from([
        "uiscaffold-gen",
        "--settings",
        "custom.toml",
        "generate",
        "--configs",
        "script/configs",
        "--project",
        "apps/primes",
        "--force",
        "--no-backup",
        "--templates",
        "tpl",
    ])
    .unwrap();

    assert_eq!(cli.settings, PathBuf::from("custom.toml"));
    match cli.command {
        Commands::Generate {
            configs,
            project,
            force,
            no_backup,
            templates,
        } => {
            assert_eq!(configs, PathBuf::from("script/configs"));
            assert_eq!(project, PathBuf::from("apps/primes"));
            assert!(force);
            assert!(no_backup);
            assert_eq!(templates, Some(PathBuf::from("tpl")));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_locale_subcommands() {
    let cli = Cli::try_parse_from(["uiscaffold-gen", "locale", "sync", "--src", "app/src"]).unwrap();
    match cli.command {
        Commands::Locale {
            sub: LocaleCommand::Sync { src, locales },
        } => {
            assert_eq!(src, PathBuf::from("app/src"));
            assert_eq!(locales, PathBuf::from("src/locales"));
        }
        _ => panic!("Expected locale sync"),
    }

    let cli = Cli::try_parse_from(["uiscaffold-gen", "locale", "keys"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Locale {
            sub: LocaleCommand::Keys { .. }
        }
    ));
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["uiscaffold-gen", "swagger"],
        vec!["uiscaffold-gen", "swagger", "mold", "--spec-file", "mold.yaml"],
        vec!["uiscaffold-gen", "generate"],
        vec!["uiscaffold-gen", "analysis", "--config", "script/config.json"],
        vec!["uiscaffold-gen", "locale", "sync"],
        vec!["uiscaffold-gen", "locale", "keys", "--configs", "c"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["uiscaffold-gen", "serve"]).is_err());
}

#[test]
fn test_generate_write_options() {
    let defaults = OutputSettings::default();
    let opts = generate_write_options(defaults, false, false);
    assert!(opts.overwrite);
    assert!(opts.backup);

    let no_backup = generate_write_options(defaults, false, true);
    assert!(!no_backup.backup);

    let cautious = OutputSettings {
        overwrite: false,
        backup: true,
    };
    assert!(!generate_write_options(cautious, false, false).overwrite);
    assert!(generate_write_options(cautious, true, false).overwrite);
}
