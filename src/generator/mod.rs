//! # Generator Module
//!
//! Turns solution configs (`configs/<solution>.json`) into a React project tree.
//!
//! ## Overview
//!
//! For every module of every solution the generator emits:
//! - **Pages** - one list or master-detail page per tab
//! - **Register page** - a modal form or a full page, for modules with a create action
//! - **Tab navigation** - the tabbed shell that hosts the module's pages
//! - **Field-API hook / custom select** - when the module opts in
//!
//! and one route table per solution.
//!
//! ## Architecture
//!
//! ```text
//! configs/*.json → SolutionConfig → Emitter → GeneratedFile[] → materialize_batch
//!                                      ↑
//!                      askama templates (or *.j2 overrides)
//! ```
//!
//! 1. **Load** - every `*.json` in the configs directory, keyed by camelCase stem
//! 2. **Emit** - pure rendering into [`GeneratedFile`]s; a render failure is counted
//!    and the rest of the solution still renders
//! 3. **Materialize** - each solution is written as one batch under the
//!    overwrite/backup policy
//! 4. **Merge** - `config.json` gets `{solutions, templates, ...configs}`, keeping the
//!    `analysisPages` table already in it
//!
//! ## Generated Structure
//!
//! ```text
//! project/
//! └── src/
//!     ├── pages/<solution>/<entity>/*Page.tsx
//!     ├── tabs/<solution>/<Entity>TabNavigation.tsx
//!     ├── routes/<Solution>Route.tsx
//!     ├── hooks/<solution>/<entity>/use<Entity>FieldQuery.ts
//!     └── components/customSelect/<Entity>SelectComponent.tsx, index.ts
//! ```
//!
//! ## Template Customization
//!
//! Built-in templates live in `templates/` and are compiled in. A directory
//! passed as `--templates` may hold `<name>.j2` files (e.g. `single_page.tsx.j2`)
//! that replace them at runtime; see [`TemplateOverrides`].

mod analysis;
mod emit;
mod literal;
mod solution;
mod templates;
#[cfg(test)]
mod tests;

pub use analysis::{emit_analysis_pages, load_analysis_pages, AnalysisPageConfig, AnalysisPages};
pub use emit::{
    routes_template, tab_icon, Emitter, ServiceSnippet, SolutionEmission, FALLBACK_ICON,
    KNOWN_ICONS,
};
pub use literal::{
    columns_literal, form_schema_literal, info_grid_keys, info_grid_literal, INFO_GRID_MAX_KEYS,
};
pub use solution::{
    load_solution_configs, merge_configs, merged_config_path, read_json_object,
    write_merged_config, ANALYSIS_PAGES_KEY,
};
pub use templates::*;

use crate::materialize::{materialize_batch, GeneratedFile, WriteOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Inputs of a `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub configs_dir: PathBuf,
    pub project_dir: PathBuf,
    pub write: WriteOptions,
    pub overrides: TemplateOverrides,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub solutions: usize,
    pub pages: usize,
    pub tab_navigations: usize,
    pub routes: usize,
    pub errors: usize,
    #[serde(skip)]
    pub duration: Duration,
}

impl GenerationStats {
    pub fn print_summary(&self) {
        println!("\n🎉 Generation finished");
        println!("📊 Stats:");
        println!("   - solutions: {}", self.solutions);
        println!("   - pages: {}", self.pages);
        println!("   - tab navigations: {}", self.tab_navigations);
        println!("   - routes: {}", self.routes);
        println!("   - errors: {}", self.errors);
        println!("   - duration: {:.2}s", self.duration.as_secs_f64());
        if self.errors > 0 {
            println!("⚠️  Some files failed, see the log for details");
        }
    }
}

/// Run the whole solution-config flow described in the module docs.
///
/// Fails only when the configs directory cannot be read; every other problem is
/// counted in [`GenerationStats::errors`].
pub fn generate_from_solution_configs(options: &GenerateOptions) -> anyhow::Result<GenerationStats> {
    let started = Instant::now();
    let configs = load_solution_configs(&options.configs_dir)?;
    let mut stats = GenerationStats::default();
    let emitter = Emitter::new(&options.project_dir, &options.overrides, options.write);
    let mut custom_selects = Vec::new();

    for (name, config) in &configs {
        println!("\n📁 Processing solution: {name}");
        stats.solutions += 1;

        let emission = emitter.emit_solution(name, config);
        stats.pages += emission.pages;
        stats.tab_navigations += emission.tab_navigations;
        stats.routes += emission.routes;
        stats.errors += emission.errors.len();
        custom_selects.extend(emission.custom_selects);
        for snippet in &emission.service_snippets {
            println!(
                "📝 Add the field API function to {} by hand:",
                snippet.path.display()
            );
            println!("{}", snippet.code);
        }

        if !emission.files.is_empty() {
            println!("📦 [{name}] writing {} files", emission.files.len());
            let report = materialize_batch(&emission.files);
            stats.errors += report.failed;
        }
        println!("✅ [{name}] done");
    }

    if !custom_selects.is_empty() {
        let index = CustomSelectIndexTemplate {
            components: custom_selects,
        };
        match options.overrides.render(&index) {
            Ok(content) => {
                let path = options
                    .project_dir
                    .join("src/components/customSelect/index.ts");
                let report =
                    materialize_batch(&[GeneratedFile::new(path, content).with_options(options.write)]);
                stats.errors += report.failed;
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "custom select index render failed");
                stats.errors += 1;
            }
        }
    }

    let merged_path = merged_config_path(&options.configs_dir);
    if let Err(err) = write_merged_config(&merged_path, merge_configs(&configs)) {
        error!(path = %merged_path.display(), error = %format!("{err:#}"), "failed to write merged config");
        stats.errors += 1;
    }

    stats.duration = started.elapsed();
    info!(
        solutions = stats.solutions,
        pages = stats.pages,
        tab_navigations = stats.tab_navigations,
        routes = stats.routes,
        errors = stats.errors,
        "generation complete"
    );
    Ok(stats)
}

/// Emit every page of `config.json` `analysisPages` into `project`.
///
/// Returns the number of pages written and the number of failures.
pub fn generate_analysis_pages(
    config_path: &Path,
    project: &Path,
    overrides: &TemplateOverrides,
    write: WriteOptions,
) -> (usize, usize) {
    let pages = load_analysis_pages(config_path);
    if pages.is_empty() {
        println!("⚠️  No analysis pages in {}", config_path.display());
        return (0, 0);
    }
    let (files, render_errors) = emit_analysis_pages(project, &pages, overrides, write);
    let report = materialize_batch(&files);
    println!("✅ Generated {} analysis pages", report.success);
    (report.success, render_errors + report.failed)
}
