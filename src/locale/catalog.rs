use crate::generator::read_json_object;
use crate::materialize::{materialize, GeneratedFile, WriteOptions};
use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Catalog file of one language under a locales directory.
pub fn catalog_path(locales_dir: &Path, lang: &str) -> PathBuf {
    locales_dir.join(lang).join("common.json")
}

/// One `common.json` translation tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    /// Load a catalog; a missing or malformed file is an empty catalog.
    pub fn load(path: &Path) -> Self {
        Catalog {
            root: read_json_object(path),
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(root) => Catalog { root },
            _ => Catalog::default(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Dotted key → value for every leaf.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        flatten_into(&self.root, "", &mut flat);
        flat
    }

    /// The string at a dotted key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        current.as_str()
    }

    /// A key is missing when it is absent or holds an empty string.
    pub fn is_missing(&self, key: &str) -> bool {
        !matches!(self.get(key), Some(value) if !value.is_empty())
    }

    /// Insert dotted keys, creating intermediate objects.
    ///
    /// Existing non-empty values are never replaced. A key whose path runs
    /// through a leaf is skipped. Returns the number of values inserted.
    pub fn merge_missing(&mut self, entries: &BTreeMap<String, String>) -> usize {
        let mut added = 0;
        for (key, value) in entries {
            if insert_if_missing(&mut self.root, key, value) {
                added += 1;
            }
        }
        added
    }

    /// Tab-indented JSON, matching the catalogs' existing layout.
    pub fn to_pretty_string(&self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut serializer)
            .context("failed to serialize catalog")?;
        String::from_utf8(buf).context("catalog is not valid UTF-8")
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let file = GeneratedFile::new(path, self.to_pretty_string()?).with_options(WriteOptions {
            overwrite: true,
            backup: false,
        });
        materialize(&file)?;
        Ok(())
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_into(inner, &path, out),
            Value::String(text) => {
                out.insert(path, text.clone());
            }
            other => {
                out.insert(path, other.to_string());
            }
        }
    }
}

fn insert_if_missing(root: &mut Map<String, Value>, key: &str, value: &str) -> bool {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = root;
    for segment in parents {
        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(inner) => current = inner,
            _ => {
                warn!(key, segment, "translation key runs through a leaf value, skipping");
                return false;
            }
        }
    }

    match current.get(*leaf) {
        Some(Value::String(existing)) if existing.is_empty() => {}
        Some(Value::Null) | None => {}
        Some(_) => return false,
    }
    current.insert(leaf.to_string(), Value::String(value.to_string()));
    true
}
