//! # File Materializer
//!
//! Writes generated text onto a project tree without clobbering hand edits.
//!
//! | Target | `overwrite` | `backup` | Result |
//! |--------|-------------|----------|--------|
//! | missing | any | any | written |
//! | exists | `false` | any | written to `name_1.ext`, `name_2.ext`, ... |
//! | exists | `true` | `true` | copied to `name.backup.<timestamp>.ext`, then overwritten |
//! | exists | `true` | `false` | overwritten |
//!
//! The backup timestamp is RFC 3339 UTC with `:` and `.` replaced by `-`, so
//! backups sort chronologically and stay valid file names on every platform.
//!
//! Parent directories are created as needed. [`materialize_batch`] never stops
//! on a failed file: every failure is recorded in the [`BatchReport`].


use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Batches report progress every this many files.
const PROGRESS_INTERVAL: usize = 10;

/// Conflict policy for an existing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub overwrite: bool,
    pub backup: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            overwrite: true,
            backup: true,
        }
    }
}

/// Rendered text destined for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    pub options: WriteOptions,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        GeneratedFile {
            path: path.into(),
            content: content.into(),
            options: WriteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    Overwritten {
        path: PathBuf,
        backup: Option<PathBuf>,
    },
    /// The target existed; content went to a numbered sibling instead
    Renamed {
        original: PathBuf,
        written: PathBuf,
    },
}

impl WriteOutcome {
    /// The path the content ended up in.
    pub fn written_path(&self) -> &Path {
        match self {
            WriteOutcome::Created(path) => path,
            WriteOutcome::Overwritten { path, .. } => path,
            WriteOutcome::Renamed { written, .. } => written,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary of a [`materialize_batch`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<WriteFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: BatchReport) {
        self.success += other.success;
        self.failed += other.failed;
        self.total += other.total;
        self.errors.extend(other.errors);
    }
}

/// `name.backup.<timestamp>.ext` next to `path`.
pub fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let (stem, ext) = split_name(path);
    let name = match ext {
        Some(ext) => format!("{stem}.backup.{timestamp}.{ext}"),
        None => format!("{stem}.backup.{timestamp}"),
    };
    path.with_file_name(name)
}

/// First free `name_N.ext` next to `path`, N starting at 1.
pub fn numbered_path(path: &Path) -> PathBuf {
    let (stem, ext) = split_name(path);
    let mut counter = 1usize;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn split_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

/// Current UTC time as a file-name-safe RFC 3339 string.
pub fn backup_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    let formatted = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    formatted.replace([':', '.'], "-")
}

fn create_backup(path: &Path) -> anyhow::Result<PathBuf> {
    let timestamp = backup_timestamp();
    let mut target = backup_path(path, &timestamp);
    let mut counter = 1usize;
    while target.exists() {
        target = backup_path(path, &format!("{timestamp}-{counter}"));
        counter += 1;
    }
    fs::copy(path, &target)
        .with_context(|| format!("failed to back up {}", path.display()))?;
    Ok(target)
}

/// Write one file under the conflict rules in the module docs.
pub fn materialize(file: &GeneratedFile) -> anyhow::Result<WriteOutcome> {
    let path = &file.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    if !path.exists() {
        fs::write(path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✅ Created: {}", path.display());
        return Ok(WriteOutcome::Created(path.clone()));
    }

    if !file.options.overwrite {
        let written = numbered_path(path);
        fs::write(&written, &file.content)
            .with_context(|| format!("failed to write {}", written.display()))?;
        println!(
            "⚠️  {} exists, wrote {} instead",
            path.display(),
            written.display()
        );
        return Ok(WriteOutcome::Renamed {
            original: path.clone(),
            written,
        });
    }

    let backup = if file.options.backup {
        let backup = create_backup(path)?;
        println!("📦 Backup created: {}", backup.display());
        Some(backup)
    } else {
        None
    };
    fs::write(path, &file.content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("✅ Overwritten: {}", path.display());
    Ok(WriteOutcome::Overwritten {
        path: path.clone(),
        backup,
    })
}

/// Write every file, continuing past failures.
pub fn materialize_batch(files: &[GeneratedFile]) -> BatchReport {
    let mut report = BatchReport {
        total: files.len(),
        ..BatchReport::default()
    };

    for (index, file) in files.iter().enumerate() {
        match materialize(file) {
            Ok(outcome) => {
                debug!(path = %outcome.written_path().display(), "materialized");
                report.success += 1;
            }
            Err(err) => {
                warn!(path = %file.path.display(), error = %format!("{err:#}"), "write failed");
                report.failed += 1;
                report.errors.push(WriteFailure {
                    path: file.path.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
        let done = index + 1;
        if done % PROGRESS_INTERVAL == 0 && done < files.len() {
            info!(done, total = files.len(), "materializing");
        }
    }

    info!(
        success = report.success,
        failed = report.failed,
        total = report.total,
        "batch complete"
    );
    report
}
