//! # Swagger Command
//!
//! Fetches each domain's OpenAPI document, derives its module configs and
//! writes them to `<out>/<domain>.json`.
//!
//! ```text
//! SWAGGER_URL_<DOMAIN> ─► SchemaSource::fetch_document ─► extract_entities
//!                                                              │
//!                  <out>/<domain>.json ◄─ materialize ◄─ ModuleConfigBuilder
//! ```
//!
//! Domains run one after another against one authenticated session. A domain
//! that fails (auth, HTTP, decode) is logged and the run moves on; only a
//! missing environment stops the command before the first domain.
//!
//! With `--spec-file` the document is read from disk and no server is
//! contacted, so configs can be produced offline.

use crate::entity::{extract_entities, Endpoint, Entity, Method};
use crate::materialize::{materialize, GeneratedFile, WriteOptions, WriteOutcome};
use crate::module_config::{ModuleConfigBuilder, SolutionConfig};
use crate::settings::{Heuristics, SwaggerEnv};
use crate::source::{load_document_file, ApiDocument, SchemaSource, Transport};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Default output directory of solution configs.
pub const DEFAULT_CONFIGS_DIR: &str = "configs";

/// Inputs of a `swagger` run.
#[derive(Debug, Clone)]
pub struct SwaggerOptions {
    /// Only this domain; every `SWAGGER_URL_*` domain when `None`
    pub domain: Option<String>,
    pub out_dir: PathBuf,
    /// Local JSON/YAML document used instead of fetching
    pub spec_file: Option<PathBuf>,
    pub probe: bool,
    pub heuristics: Heuristics,
}

impl Default for SwaggerOptions {
    fn default() -> Self {
        SwaggerOptions {
            domain: None,
            out_dir: PathBuf::from(DEFAULT_CONFIGS_DIR),
            spec_file: None,
            probe: false,
            heuristics: Heuristics::default(),
        }
    }
}

/// Result of one endpoint probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub entity: String,
    pub path: String,
    pub ok: bool,
}

/// Outcome of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub domain: String,
    pub modules: usize,
    /// Where the config ended up, `None` when the domain failed
    pub config_path: Option<PathBuf>,
    pub error: Option<String>,
    pub probes: Vec<ProbeResult>,
}

impl DomainReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Every domain of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwaggerSummary {
    pub domains: Vec<DomainReport>,
}

impl SwaggerSummary {
    pub fn succeeded(&self) -> usize {
        self.domains.iter().filter(|d| d.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.domains.len() - self.succeeded()
    }
}

/// The module configs of one document.
pub fn build_domain_config(domain: &str, doc: &ApiDocument, heuristics: Heuristics) -> SolutionConfig {
    let entities = extract_entities(doc);
    info!(domain, entities = entities.len(), "entities extracted");
    ModuleConfigBuilder::new(doc, heuristics).build_solution(domain, &entities)
}

/// Write `<out_dir>/<domain>.json`, backing up the previous version.
pub fn write_domain_config(
    out_dir: &Path,
    domain: &str,
    config: &SolutionConfig,
) -> anyhow::Result<WriteOutcome> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| format!("failed to serialize config for {domain}"))?;
    let path = out_dir.join(format!("{domain}.json"));
    materialize(&GeneratedFile::new(path, content).with_options(WriteOptions {
        overwrite: true,
        backup: true,
    }))
}

/// GET endpoints without path parameters, the ones safe to probe.
pub fn probe_targets(entity: &Entity) -> impl Iterator<Item = &Endpoint> {
    entity
        .endpoints_with(Method::Get)
        .filter(|e| e.is_parameter_free())
}

/// Probe the parameter-free GET endpoints of every entity in `doc`.
pub fn probe_entities<T: Transport>(
    source: &mut SchemaSource<T>,
    api_base: &str,
    doc: &ApiDocument,
) -> Vec<ProbeResult> {
    let mut results = Vec::new();
    for entity in extract_entities(doc) {
        for endpoint in probe_targets(&entity) {
            let url = format!("{}{}", api_base.trim_end_matches('/'), endpoint.path);
            println!("🧪 GET {url}");
            let ok = source.probe(&url);
            results.push(ProbeResult {
                entity: entity.name.clone(),
                path: endpoint.path.clone(),
                ok,
            });
        }
        let passed = results
            .iter()
            .filter(|r| r.entity == entity.name && r.ok)
            .count();
        let total = results.iter().filter(|r| r.entity == entity.name).count();
        if total > 0 {
            println!("📊 {}: {passed}/{total} endpoints responded", entity.name);
        }
    }
    results
}

fn finish_domain(
    report: &mut DomainReport,
    options: &SwaggerOptions,
    doc: &ApiDocument,
) -> anyhow::Result<()> {
    let config = build_domain_config(&report.domain, doc, options.heuristics);
    report.modules = config.modules.len();
    let outcome = write_domain_config(&options.out_dir, &report.domain, &config)?;
    report.config_path = Some(outcome.written_path().to_path_buf());
    println!(
        "✅ [{}] {} modules → {}",
        report.domain,
        report.modules,
        outcome.written_path().display()
    );
    Ok(())
}

/// Fetch, build and write every selected domain against `source`.
pub fn run_domains<T: Transport>(
    source: &mut SchemaSource<T>,
    env: &SwaggerEnv,
    options: &SwaggerOptions,
) -> anyhow::Result<SwaggerSummary> {
    let domains = env.select_domains(options.domain.as_deref())?;
    let mut summary = SwaggerSummary::default();

    for (domain, url) in domains {
        println!("\n📡 [{domain}] fetching {url}");
        let mut report = DomainReport {
            domain: domain.clone(),
            ..DomainReport::default()
        };

        let result = source
            .fetch_document(&url)
            .map_err(anyhow::Error::from)
            .and_then(|doc| {
                finish_domain(&mut report, options, &doc)?;
                if options.probe {
                    report.probes = probe_entities(source, &env.base_url, &doc);
                }
                Ok(())
            });
        if let Err(err) = result {
            error!(domain = %domain, error = %format!("{err:#}"), "domain failed");
            println!("❌ [{domain}] {err:#}");
            report.error = Some(format!("{err:#}"));
        }
        summary.domains.push(report);
    }
    Ok(summary)
}

/// Build and write configs from a local document.
///
/// The domain is `options.domain`, else the file stem. Probing needs a server
/// and is skipped with a warning when `source` is `None`.
pub fn run_offline<T: Transport>(
    spec_file: &Path,
    source: Option<(&mut SchemaSource<T>, &str)>,
    options: &SwaggerOptions,
) -> anyhow::Result<SwaggerSummary> {
    let doc = load_document_file(spec_file)?;
    let domain = match &options.domain {
        Some(domain) => domain.to_lowercase(),
        None => spec_file
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .context("spec file has no usable name, pass a DOMAIN")?,
    };

    let mut report = DomainReport {
        domain,
        ..DomainReport::default()
    };
    if let Err(err) = finish_domain(&mut report, options, &doc) {
        error!(domain = %report.domain, error = %format!("{err:#}"), "domain failed");
        report.error = Some(format!("{err:#}"));
    } else if options.probe {
        match source {
            Some((source, api_base)) => report.probes = probe_entities(source, api_base, &doc),
            None => warn!("probing needs SWAGGER_API_BASE_URL, skipped"),
        }
    }
    Ok(SwaggerSummary {
        domains: vec![report],
    })
}
