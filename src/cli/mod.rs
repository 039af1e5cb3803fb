//! # CLI Module
//!
//! The `uiscaffold-gen` command line.
//!
//! ## Commands
//!
//! ### `swagger`
//!
//! Fetch OpenAPI documents and write one module config per domain:
//!
//! ```bash
//! uiscaffold-gen swagger            # every SWAGGER_URL_<DOMAIN>
//! uiscaffold-gen swagger sales      # only SWAGGER_URL_SALES
//! uiscaffold-gen swagger sales --spec-file sales.yaml   # offline
//! uiscaffold-gen swagger --probe    # also GET each list endpoint
//! ```
//!
//! ### `generate`
//!
//! Render pages, tab navigations and routes from `configs/*.json`:
//!
//! ```bash
//! uiscaffold-gen generate --configs script/configs --project apps/primes
//! uiscaffold-gen generate --no-backup --templates my-templates/
//! ```
//!
//! ### `analysis`
//!
//! Render chart pages from `config.json` `analysisPages`.
//!
//! ### `locale sync` / `locale keys`
//!
//! Fill missing `ko`/`en` catalog entries from `t('key')` calls, or from the
//! module configs.
//!
//! ## Settings
//!
//! `--settings` (default `uiscaffold.toml`, env `UISCAFFOLD_SETTINGS`) points at
//! an optional TOML file; see [`crate::settings::GeneratorSettings`].

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{generate_write_options, run, run_cli, Cli, Commands, LocaleCommand};
