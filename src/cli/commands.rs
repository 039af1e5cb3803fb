use crate::generator::{
    generate_analysis_pages, generate_from_solution_configs, load_solution_configs,
    GenerateOptions, TemplateOverrides,
};
use crate::locale::{sync_config_keys, sync_missing_keys, SyncReport};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::materialize::WriteOptions;
use crate::settings::{GeneratorSettings, OutputSettings, SwaggerEnv};
use crate::source::{HttpTransport, SchemaSource};
use crate::swagger::{run_domains, run_offline, SwaggerOptions, SwaggerSummary, DEFAULT_CONFIGS_DIR};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for uiscaffold
///
/// Turns OpenAPI documents into module configs, and module configs into a
/// React project tree.
#[derive(Debug, Parser)]
#[command(name = "uiscaffold-gen")]
#[command(about = "OpenAPI driven UI scaffolding", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file with heuristics, HTTP and output options
    #[arg(long, global = true, env = "UISCAFFOLD_SETTINGS", default_value = GeneratorSettings::FILE_NAME)]
    pub settings: PathBuf,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch OpenAPI documents and write module configs
    ///
    /// Every SWAGGER_URL_<DOMAIN> variable is processed unless DOMAIN is given.
    Swagger {
        /// Only process this domain
        domain: Option<String>,

        /// Directory receiving <domain>.json
        #[arg(long, default_value = DEFAULT_CONFIGS_DIR)]
        out: PathBuf,

        /// Read the document from a local JSON or YAML file instead of fetching
        #[arg(long)]
        spec_file: Option<PathBuf>,

        /// Also GET each entity's parameter-free list endpoints
        #[arg(long, default_value_t = false)]
        probe: bool,
    },
    /// Generate pages, tabs and routes from module configs
    Generate {
        /// Directory holding <solution>.json configs
        #[arg(long, default_value = DEFAULT_CONFIGS_DIR)]
        configs: PathBuf,

        /// Root of the React project
        #[arg(long, default_value = ".")]
        project: PathBuf,

        /// Overwrite existing files even when the settings file disables it
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Do not back up files before overwriting them
        #[arg(long, default_value_t = false)]
        no_backup: bool,

        /// Directory of <template>.j2 overrides
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Generate chart pages from the analysisPages table of config.json
    Analysis {
        /// Merged config holding analysisPages
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Root of the React project
        #[arg(long, default_value = ".")]
        project: PathBuf,

        /// Overwrite existing pages instead of writing numbered copies
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Directory of <template>.j2 overrides
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Keep translation catalogs in step with code and configs
    Locale {
        #[command(subcommand)]
        sub: LocaleCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LocaleCommand {
    /// Add catalog entries for t('key') calls that have none
    Sync {
        /// Source tree to scan
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// Directory holding <lang>/common.json
        #[arg(long, default_value = "src/locales")]
        locales: PathBuf,
    },
    /// Add catalog entries derived from module configs
    Keys {
        #[arg(long, default_value = DEFAULT_CONFIGS_DIR)]
        configs: PathBuf,

        #[arg(long, default_value = "src/locales")]
        locales: PathBuf,
    },
}

/// Conflict policy of a `generate` run.
///
/// `--force` turns overwriting on, `--no-backup` turns backups off; otherwise
/// the settings file decides.
pub fn generate_write_options(output: OutputSettings, force: bool, no_backup: bool) -> WriteOptions {
    WriteOptions {
        overwrite: output.overwrite || force,
        backup: output.backup && !no_backup,
    }
}

fn load_overrides(dir: Option<&Path>) -> anyhow::Result<TemplateOverrides> {
    match dir {
        Some(dir) => TemplateOverrides::load(dir),
        None => Ok(TemplateOverrides::none()),
    }
}

fn print_swagger_summary(summary: &SwaggerSummary) {
    println!(
        "\n📊 Domains: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );
    for domain in summary.domains.iter().filter(|d| !d.probes.is_empty()) {
        let ok = domain.probes.iter().filter(|p| p.ok).count();
        println!(
            "🧪 [{}] {ok}/{} probes succeeded",
            domain.domain,
            domain.probes.len()
        );
    }
}

fn print_sync_report(report: &SyncReport) {
    for (lang, added) in &report.added {
        println!("   - {lang}: {added} added");
    }
    if report.errors > 0 {
        println!("⚠️  {} catalogs could not be written", report.errors);
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if:
/// - The settings file exists but cannot be parsed
/// - `swagger` runs without `SWAGGER_API_BASE_URL` or a matching `SWAGGER_URL_*`
/// - A configs, spec or templates input cannot be read
///
/// Per-domain and per-file failures are reported but do not fail the command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = GeneratorSettings::load(&cli.settings)?;
    info!(settings = %cli.settings.display(), "settings loaded");

    match cli.command {
        Commands::Swagger {
            domain,
            out,
            spec_file,
            probe,
        } => {
            let options = SwaggerOptions {
                domain,
                out_dir: out,
                spec_file,
                probe,
                heuristics: settings.heuristics,
            };
            let summary = match &options.spec_file {
                Some(spec_file) => {
                    let env = if options.probe {
                        SwaggerEnv::from_env().ok()
                    } else {
                        None
                    };
                    match env {
                        Some(env) => {
                            let transport = HttpTransport::new(settings.http.timeout())?;
                            let mut source = SchemaSource::new(
                                transport,
                                env.base_url.clone(),
                                env.credentials.clone(),
                            );
                            run_offline(spec_file, Some((&mut source, env.base_url.as_str())), &options)?
                        }
                        None => run_offline::<HttpTransport>(spec_file, None, &options)?,
                    }
                }
                None => {
                    let env = SwaggerEnv::from_env().context("failed to load swagger environment")?;
                    let transport = HttpTransport::new(settings.http.timeout())?;
                    let mut source =
                        SchemaSource::new(transport, env.base_url.clone(), env.credentials.clone());
                    run_domains(&mut source, &env, &options)?
                }
            };
            print_swagger_summary(&summary);
            Ok(())
        }
        Commands::Generate {
            configs,
            project,
            force,
            no_backup,
            templates,
        } => {
            let options = GenerateOptions {
                configs_dir: configs,
                project_dir: project,
                write: generate_write_options(settings.output, force, no_backup),
                overrides: load_overrides(templates.as_deref())?,
            };
            let stats = generate_from_solution_configs(&options)?;
            stats.print_summary();
            Ok(())
        }
        Commands::Analysis {
            config,
            project,
            force,
            templates,
        } => {
            let overrides = load_overrides(templates.as_deref())?;
            let write = WriteOptions {
                overwrite: force,
                backup: settings.output.backup,
            };
            let (written, errors) = generate_analysis_pages(&config, &project, &overrides, write);
            info!(written, errors, "analysis pages done");
            Ok(())
        }
        Commands::Locale { sub } => match sub {
            LocaleCommand::Sync { src, locales } => {
                let report = sync_missing_keys(&src, &locales);
                print_sync_report(&report);
                Ok(())
            }
            LocaleCommand::Keys { configs, locales } => {
                let solutions = load_solution_configs(&configs)?;
                let report = sync_config_keys(&solutions, &locales);
                print_sync_report(&report);
                Ok(())
            }
        },
    }
}

/// Parse the process arguments, set up logging and run.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with_config(&LogConfig::from_env())?;
    run(cli)
}
