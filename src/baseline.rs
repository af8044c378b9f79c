// Copyright 2025 Oxide Computer Company

//! Gate a directory of OpenAPI documents against their last accepted
//! versions.
//!
//! Each document in the source directory forms a group named after its file
//! stem. The accepted version of a group lives in the lock directory as
//! `<group>.lock`. A group passes when its source is backward-compatible with
//! its lock, and the source then becomes the new lock.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use openapiv3::OpenAPI;
use tracing::{debug, error, info, warn};

use crate::{CompositeRule, Diagnostic};

const SOURCE_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];
const LOCK_EXTENSION: &str = "lock";

/// Where to find sources and locks.
#[derive(Clone, Debug)]
pub struct Baseline {
    pub source_dir: PathBuf,
    pub lock_dir: PathBuf,
    /// Check nothing at all.
    pub skip: bool,
}

/// The files that make up one group; at least one of them is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub source: Option<PathBuf>,
    pub lock: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Outcome {
    /// No lock existed, so the source was accepted as the first baseline.
    Initialized,
    /// The source is compatible and replaced the lock.
    Passed,
    /// The source breaks compatibility with the lock, which is left as is.
    Failed(Vec<Diagnostic>),
    /// A lock with no source.
    Orphaned,
    /// A document could not be read, parsed or walked.
    Error(anyhow::Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Initialized | Outcome::Passed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Initialized => write!(f, "initialized"),
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed(diagnostics) => {
                write!(f, "failed with {} incompatible change(s)", diagnostics.len())
            }
            Outcome::Orphaned => write!(f, "orphaned baseline"),
            Outcome::Error(err) => write!(f, "error: {err:#}"),
        }
    }
}

/// Outcome of every group, in group name order.
#[derive(Debug, Default)]
pub struct Report {
    pub skipped: bool,
    pub groups: Vec<(String, Outcome)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.groups.iter().all(|(_, outcome)| outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(name, _)| name.as_str())
    }
}

impl Baseline {
    pub fn new(source_dir: impl Into<PathBuf>, lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            lock_dir: lock_dir.into(),
            skip: false,
        }
    }

    /// Check every group and promote those that pass.
    ///
    /// An `Err` means the directories themselves could not be used; problems
    /// with individual groups are reported in their [`Outcome`].
    pub fn check(&self, rules: &CompositeRule) -> anyhow::Result<Report> {
        if self.skip {
            info!("the OpenAPI backward compatibility check is skipped");
            return Ok(Report {
                skipped: true,
                groups: Vec::new(),
            });
        }

        if !self.source_dir.exists() {
            info!(
                source_dir = %self.source_dir.display(),
                "the OpenAPI source directory does not exist, skipping"
            );
            return Ok(Report {
                skipped: true,
                groups: Vec::new(),
            });
        }

        fs::create_dir_all(&self.lock_dir).with_context(|| {
            format!("failed to create lock directory: {}", self.lock_dir.display())
        })?;

        let groups = self.groups()?;
        debug!(groups = groups.len(), "found groups");

        let groups = groups
            .into_iter()
            .map(|group| {
                let outcome = self.check_group(&group, rules);
                (group.name, outcome)
            })
            .collect();

        Ok(Report {
            skipped: false,
            groups,
        })
    }

    /// Pair sources with locks by file stem, ordered by name.
    pub fn groups(&self) -> anyhow::Result<Vec<Group>> {
        let mut groups = BTreeMap::<String, Group>::new();

        for source in list_files(&self.source_dir, &SOURCE_EXTENSIONS)? {
            let Some(name) = file_stem(&source) else {
                continue;
            };
            let group = groups.entry(name.clone()).or_insert_with(|| Group {
                name,
                source: None,
                lock: None,
            });
            match &group.source {
                Some(existing) => warn!(
                    group = %group.name,
                    kept = %existing.display(),
                    ignored = %source.display(),
                    "more than one source for group"
                ),
                None => group.source = Some(source),
            }
        }

        for lock in list_files(&self.lock_dir, &[LOCK_EXTENSION])? {
            let Some(name) = file_stem(&lock) else {
                continue;
            };
            groups
                .entry(name.clone())
                .or_insert_with(|| Group {
                    name,
                    source: None,
                    lock: None,
                })
                .lock = Some(lock);
        }

        Ok(groups.into_values().collect())
    }

    fn check_group(&self, group: &Group, rules: &CompositeRule) -> Outcome {
        let Some(source) = &group.source else {
            if let Some(lock) = &group.lock {
                warn!(
                    group = %group.name,
                    lock = %lock.display(),
                    "found a lock file without a corresponding source"
                );
            }
            return Outcome::Orphaned;
        };

        let Some(lock) = &group.lock else {
            let lock = self.lock_dir.join(format!("{}.{LOCK_EXTENSION}", group.name));
            return match promote(source, &lock) {
                Ok(()) => {
                    info!(group = %group.name, "initialized compatibility check");
                    Outcome::Initialized
                }
                Err(err) => Outcome::Error(err),
            };
        };

        match compare_files(lock, source, rules) {
            Ok(diagnostics) if diagnostics.is_empty() => match promote(source, lock) {
                Ok(()) => {
                    info!(group = %group.name, "backward compatibility check passed");
                    Outcome::Passed
                }
                Err(err) => Outcome::Error(err),
            },
            Ok(diagnostics) => {
                error!(
                    group = %group.name,
                    "backward incompatible changes were found"
                );
                for diagnostic in &diagnostics {
                    error!(group = %group.name, "{diagnostic}");
                }
                Outcome::Failed(diagnostics)
            }
            Err(err) => {
                error!(group = %group.name, "{err:#}");
                Outcome::Error(err)
            }
        }
    }
}

/// Load both documents and compare them.
pub fn compare_files(
    old: &Path,
    new: &Path,
    rules: &CompositeRule,
) -> anyhow::Result<Vec<Diagnostic>> {
    let old_doc = load(old)?;
    let new_doc = load(new)?;

    rules.check(&old_doc, &new_doc).with_context(|| {
        format!(
            "failed to compare {} with {}",
            old.display(),
            new.display()
        )
    })
}

/// Parse an OpenAPI document. `.json` files are read as JSON, anything else
/// (including locks) as YAML, which also accepts JSON.
pub fn load(path: &Path) -> anyhow::Result<OpenAPI> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let document = if is_json {
        serde_json::from_str(&contents).map_err(anyhow::Error::from)
    } else {
        serde_yaml::from_str(&contents).map_err(anyhow::Error::from)
    };

    document.with_context(|| format!("unable to parse OpenAPI document: {}", path.display()))
}

fn promote(source: &Path, lock: &Path) -> anyhow::Result<()> {
    if let Some(parent) = lock.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create lock directory: {}", parent.display()))?;
    }
    fs::copy(source, lock).with_context(|| {
        format!("failed to copy {} to {}", source.display(), lock.display())
    })?;
    Ok(())
}

fn list_files(dir: &Path, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut files = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
