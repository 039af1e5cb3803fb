//! # Locale Synchronizer
//!
//! Keeps the `ko` and `en` translation catalogs (`<locales>/<lang>/common.json`)
//! in step with the code and the solution configs.
//!
//! ## Missing-key sync
//!
//! 1. Scan `.ts/.tsx/.js/.jsx` sources for `t('key')` calls
//! 2. A key is missing when its `ko` value is absent or empty
//! 3. Each missing key gets synthesized `ko`/`en` values (see [`synthesize`])
//! 4. Both catalogs are deep-merged; existing values are never replaced
//!
//! A run that finds nothing missing writes nothing.
//!
//! ## Config keys
//!
//! [`sync_config_keys`] derives tab, page, dialog and select keys from the
//! solution configs and merges them the same way.

mod catalog;
mod config_keys;
mod scan;
mod synth;

pub use catalog::{catalog_path, Catalog};
pub use config_keys::{config_translations, module_translations, translate_to_english};
pub use scan::{keys_in_source, scan_used_keys, SKIPPED_DIRS, SOURCE_EXTENSIONS};
pub use synth::{common_term, synthesize, COMMON_TERMS};

use crate::module_config::SolutionConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Catalog languages, in merge order.
pub const LANGUAGES: [&str; 2] = ["ko", "en"];

/// Flat dotted-key values for both languages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    pub ko: BTreeMap<String, String>,
    pub en: BTreeMap<String, String>,
}

impl Translations {
    pub fn add(&mut self, key: String, ko: String, en: String) {
        self.ko.insert(key.clone(), ko);
        self.en.insert(key, en);
    }

    pub fn len(&self) -> usize {
        self.ko.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ko.is_empty()
    }

    fn for_lang(&self, lang: &str) -> &BTreeMap<String, String> {
        if lang == "ko" {
            &self.ko
        } else {
            &self.en
        }
    }
}

/// What a sync run found and wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Distinct keys considered (used in code, or derived from configs)
    pub considered: usize,
    pub missing: usize,
    /// Values inserted per language
    pub added: BTreeMap<String, usize>,
    pub written: Vec<PathBuf>,
    pub errors: usize,
}

/// Keys used under `src_dir` that the `ko` catalog lacks, with synthesized values.
pub fn find_missing_keys(src_dir: &Path, locales_dir: &Path) -> (usize, Translations) {
    let used = scan_used_keys(src_dir);
    let ko = Catalog::load(&catalog_path(locales_dir, "ko"));

    let mut missing = Translations::default();
    for key in &used {
        if ko.is_missing(key) {
            let (ko_value, en_value) = synthesize(key);
            missing.add(key.clone(), ko_value, en_value);
        }
    }
    (used.len(), missing)
}

/// Add synthesized values for every key used in code but missing from `ko`.
pub fn sync_missing_keys(src_dir: &Path, locales_dir: &Path) -> SyncReport {
    println!("🔍 Scanning {} for translation keys...", src_dir.display());
    let (considered, missing) = find_missing_keys(src_dir, locales_dir);
    println!("📊 Used translation keys: {considered}");
    println!("❌ Missing translation keys: {}", missing.len());

    let mut report = SyncReport {
        considered,
        missing: missing.len(),
        ..SyncReport::default()
    };
    if missing.is_empty() {
        println!("✅ All translation keys exist");
        return report;
    }
    merge_into_catalogs(locales_dir, &missing, &mut report);
    report
}

/// Merge keys derived from solution configs into both catalogs.
pub fn sync_config_keys(
    configs: &BTreeMap<String, SolutionConfig>,
    locales_dir: &Path,
) -> SyncReport {
    let derived = config_translations(configs);
    println!("🌍 Derived {} translation keys from {} solutions", derived.len(), configs.len());
    let mut report = SyncReport {
        considered: derived.len(),
        ..SyncReport::default()
    };
    let ko = Catalog::load(&catalog_path(locales_dir, "ko"));
    report.missing = derived.ko.keys().filter(|k| ko.is_missing(k)).count();
    merge_into_catalogs(locales_dir, &derived, &mut report);
    report
}

fn merge_into_catalogs(locales_dir: &Path, entries: &Translations, report: &mut SyncReport) {
    for lang in LANGUAGES {
        let path = catalog_path(locales_dir, lang);
        let mut catalog = Catalog::load(&path);
        let added = catalog.merge_missing(entries.for_lang(lang));
        report.added.insert(lang.to_string(), added);
        if added == 0 {
            continue;
        }
        match catalog.write(&path) {
            Ok(()) => {
                info!(lang, added, path = %path.display(), "catalog updated");
                println!("✅ [{lang}] added {added} translation keys");
                report.written.push(path);
            }
            Err(err) => {
                error!(lang, path = %path.display(), error = %format!("{err:#}"), "failed to write catalog");
                report.errors += 1;
            }
        }
    }
}
