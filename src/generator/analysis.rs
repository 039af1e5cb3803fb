use super::solution::{read_json_object, ANALYSIS_PAGES_KEY};
use super::templates::{AnalysisPageTemplate, TemplateOverrides};
use crate::materialize::{GeneratedFile, WriteOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// One entry of `config.json` `analysisPages.<domain>.<dataType>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPageConfig {
    /// Page file relative to `src/pages`, `.tsx` optional
    pub path: String,
    #[serde(rename = "component")]
    pub component_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default = "default_chart_type")]
    pub chart_type: String,
    #[serde(default = "default_time_range")]
    pub time_range: String,
    #[serde(default)]
    pub chart_title: String,
    #[serde(default)]
    pub additional_props: Map<String, Value>,
}

fn default_chart_type() -> String {
    "line".to_string()
}

fn default_time_range() -> String {
    "weekly".to_string()
}

/// `domain → dataType → page`
pub type AnalysisPages = BTreeMap<String, BTreeMap<String, AnalysisPageConfig>>;

/// The `analysisPages` table of a merged config file.
///
/// A missing table yields no pages; an entry that does not parse is skipped.
pub fn load_analysis_pages(config_path: &Path) -> AnalysisPages {
    let mut pages = AnalysisPages::new();
    let Some(Value::Object(domains)) = read_json_object(config_path).remove(ANALYSIS_PAGES_KEY)
    else {
        return pages;
    };

    for (domain, entries) in domains {
        let Value::Object(entries) = entries else {
            warn!(domain = %domain, "analysis domain is not an object");
            continue;
        };
        for (data_type, entry) in entries {
            match serde_json::from_value::<AnalysisPageConfig>(entry) {
                Ok(mut page) => {
                    if page.domain.is_empty() {
                        page.domain = domain.clone();
                    }
                    if page.data_type.is_empty() {
                        page.data_type = data_type.clone();
                    }
                    pages
                        .entry(domain.clone())
                        .or_default()
                        .insert(data_type, page);
                }
                Err(err) => {
                    warn!(domain = %domain, data_type = %data_type, error = %err, "skipping analysis page");
                }
            }
        }
    }
    pages
}

/// `name="text"` for strings, `name={json}` for everything else.
fn jsx_attribute(name: &str, value: &Value) -> String {
    match value {
        Value::String(text) => format!("{name}={}", Value::String(text.clone())),
        other => format!("{name}={{{other}}}"),
    }
}

/// Files for every analysis page, plus the number of render failures.
pub fn emit_analysis_pages(
    project: &Path,
    pages: &AnalysisPages,
    overrides: &TemplateOverrides,
    options: WriteOptions,
) -> (Vec<GeneratedFile>, usize) {
    let mut files = Vec::new();
    let mut errors = 0;

    for page in pages.values().flat_map(|entries| entries.values()) {
        let template = AnalysisPageTemplate {
            component_name: page.component_name.clone(),
            domain: page.domain.clone(),
            data_type: page.data_type.clone(),
            chart_type: page.chart_type.clone(),
            time_range: page.time_range.clone(),
            chart_title: page.chart_title.clone(),
            extra_props: page
                .additional_props
                .iter()
                .map(|(name, value)| jsx_attribute(name, value))
                .collect(),
        };
        match overrides.render(&template) {
            Ok(content) => {
                let relative = if page.path.ends_with(".tsx") {
                    page.path.clone()
                } else {
                    format!("{}.tsx", page.path)
                };
                let path = project.join("src/pages").join(relative);
                files.push(GeneratedFile::new(path, content).with_options(options));
            }
            Err(err) => {
                warn!(component = %page.component_name, error = %format!("{err:#}"), "analysis page render failed");
                errors += 1;
            }
        }
    }
    (files, errors)
}
