use crate::materialize::{materialize, GeneratedFile, WriteOptions};
use crate::module_config::SolutionConfig;
use crate::naming::to_camel_case;
use anyhow::Context;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Key of the analysis page table inside `config.json`.
pub const ANALYSIS_PAGES_KEY: &str = "analysisPages";

/// Every `*.json` in `dir`, keyed by camelCase file stem.
///
/// Unreadable or malformed files are logged and skipped.
pub fn load_solution_configs(dir: &Path) -> anyhow::Result<BTreeMap<String, SolutionConfig>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read configs directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut configs = BTreeMap::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let key = to_camel_case(stem);
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| serde_json::from_str::<SolutionConfig>(&text).map_err(Into::into));
        match parsed {
            Ok(config) => {
                info!(solution = %key, modules = config.modules.len(), "loaded solution config");
                println!("📋 Loaded {}: {} modules", path.display(), config.modules.len());
                configs.insert(key, config);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping malformed solution config");
                println!("⚠️  Skipping {}: {err}", path.display());
            }
        }
    }
    Ok(configs)
}

/// Merged view of every solution: `{solutions, templates, <solution>: {...}}`.
pub fn merge_configs(configs: &BTreeMap<String, SolutionConfig>) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert(
        "solutions".to_string(),
        Value::Array(configs.keys().map(|k| Value::String(k.clone())).collect()),
    );
    merged.insert(
        "templates".to_string(),
        json!({
            "singlePage": {
                "type": "singlePage",
                "description": "단일 테이블 페이지 템플릿",
                "components": ["Table", "Search", "Actions"]
            },
            "masterDetailPage": {
                "type": "masterDetailPage",
                "description": "마스터-디테일 페이지 템플릿",
                "components": ["MasterTable", "DetailTable", "Search", "Actions"]
            }
        }),
    );
    for (name, config) in configs {
        match serde_json::to_value(config) {
            Ok(value) => {
                merged.insert(name.clone(), value);
            }
            Err(err) => warn!(solution = %name, error = %err, "failed to serialize solution config"),
        }
    }
    merged
}

/// `config.json` beside the configs directory.
pub fn merged_config_path(configs_dir: &Path) -> PathBuf {
    match configs_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("config.json"),
        _ => PathBuf::from("config.json"),
    }
}

/// Read a JSON object, treating a missing or malformed file as empty.
pub fn read_json_object(path: &Path) -> Map<String, Value> {
    let Ok(text) = fs::read_to_string(path) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(path = %path.display(), "expected a JSON object, ignoring contents");
            Map::new()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed JSON, ignoring contents");
            Map::new()
        }
    }
}

/// Write the merged config, keeping the `analysisPages` table of the current file.
pub fn write_merged_config(path: &Path, mut merged: Map<String, Value>) -> anyhow::Result<()> {
    if let Some(pages) = read_json_object(path).remove(ANALYSIS_PAGES_KEY) {
        merged.insert(ANALYSIS_PAGES_KEY.to_string(), pages);
    }
    let content = serde_json::to_string_pretty(&Value::Object(merged))
        .context("failed to serialize merged config")?;
    let file = GeneratedFile::new(path, content).with_options(WriteOptions {
        overwrite: true,
        backup: false,
    });
    materialize(&file)?;
    Ok(())
}
