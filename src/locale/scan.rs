use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// `t('key')`, `t("key")` and `` t(`key`) `` with a literal key.
///
/// Matches also inside `get('x')` or `obj.t('x')`; [`keys_in_source`] drops
/// those by looking at the character before the `t`.
static T_CALL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"t\(['"`]([^'"`]+)['"`]\)"#).expect("translation call regex should be valid")
});

/// Directories never descended into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build"];

pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Translation keys used in one source text, in order of appearance.
pub fn keys_in_source(source: &str) -> Vec<String> {
    T_CALL_REGEX
        .captures_iter(source)
        .filter(|c| c.get(0).is_some_and(|call| is_standalone_call(source, call.start())))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The `t` at `start` is a bare identifier, not the tail of `get` or a method.
fn is_standalone_call(source: &str, start: usize) -> bool {
    !matches!(
        source[..start].chars().next_back(),
        Some(prev) if prev.is_alphanumeric() || matches!(prev, '_' | '$' | '.')
    )
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Every translation key used under `root`.
///
/// A missing root yields no keys; unreadable files are logged and skipped.
pub fn scan_used_keys(root: &Path) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    if !root.exists() {
        warn!(root = %root.display(), "source directory does not exist");
        return keys;
    }

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "failed to walk source tree");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }
        match fs::read_to_string(entry.path()) {
            Ok(source) => {
                let found = keys_in_source(&source);
                if !found.is_empty() {
                    debug!(file = %entry.path().display(), keys = found.len(), "translation keys");
                }
                keys.extend(found);
            }
            Err(err) => warn!(file = %entry.path().display(), error = %err, "unreadable source file"),
        }
    }
    keys
}
