//! Installation registry.
//!
//! A single JSON array of [`InstallationRecord`] at a fixed per-user path,
//! keyed by `app_id`. The registry is a cache, not a source of truth: a
//! missing or corrupt file loads as empty and [`scan_existing_installations`]
//! rebuilds what it can from marker files.
//!
//! There is no locking. One process owns one `InstallationRegistry`, loads it
//! once and saves after every mutation.
//!
//! [`scan_existing_installations`]: InstallationRegistry::scan_existing_installations

use std::io;
use std::path::{Path, PathBuf};

use tbi_schema::InstallationRecord;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::marker::{find_markers, read_marker};
use crate::paths::Layout;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode registry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of a marker garbage-collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Readable markers encountered.
    pub found: usize,
    /// Orphaned markers successfully deleted.
    pub removed: usize,
}

/// Markers found under a root, split by whether the registry tracks them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSurvey {
    pub found: usize,
    pub orphans: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InstallationRegistry {
    path: PathBuf,
    records: Vec<InstallationRecord>,
}

impl InstallationRegistry {
    /// Load the registry stored at `path`.
    ///
    /// A missing file, an unreadable file, or a file that is not a JSON array
    /// all load as an empty registry. Individual malformed entries are
    /// dropped. Duplicate `app_id`s are merged in file order.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut registry = Self {
            path,
            records: Vec::new(),
        };

        let content = match std::fs::read_to_string(&registry.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %registry.path.display(), "no registry yet");
                return registry;
            }
            Err(err) => {
                warn!(path = %registry.path.display(), error = %err, "unreadable registry, starting empty");
                return registry;
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %registry.path.display(), error = %err, "corrupt registry, starting empty");
                return registry;
            }
        };

        for entry in entries {
            match serde_json::from_value::<InstallationRecord>(entry) {
                Ok(record) => registry.upsert(record),
                Err(err) => warn!(error = %err, "dropping malformed registry entry"),
            }
        }

        debug!(count = registry.records.len(), "loaded registry");
        registry
    }

    /// Load the registry at the layout's fixed path.
    pub fn open(layout: &Layout) -> Self {
        Self::load(layout.registry_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the whole registry file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Insert `record`, or merge it into the record with the same `app_id`, then save.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn add(&mut self, record: InstallationRecord) -> Result<(), RegistryError> {
        info!(app_id = %record.app_id, app_name = %record.app_name, "tracking installation");
        self.upsert(record);
        self.save()
    }

    /// Drop the record for `app_id`, then save. Absent ids are not an error.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn remove(&mut self, app_id: &str) -> Result<bool, RegistryError> {
        let before = self.records.len();
        self.records.retain(|r| r.app_id != app_id);
        let removed = self.records.len() != before;
        if removed {
            info!(app_id, "stopped tracking installation");
        }
        self.save()?;
        Ok(removed)
    }

    pub fn lookup(&self, app_id: &str) -> Option<&InstallationRecord> {
        self.records.iter().find(|r| r.app_id == app_id)
    }

    pub fn is_tracked(&self, app_id: &str) -> bool {
        self.lookup(app_id).is_some()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[InstallationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reconcile with marker files under the layout's well-known install dirs.
    ///
    /// See [`scan_roots`](Self::scan_roots).
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn scan_existing_installations(&mut self, layout: &Layout) -> Result<usize, RegistryError> {
        self.scan_roots(&layout.scan_roots())
    }

    /// Add a `discovered` record for every marker under `roots` whose
    /// `app_id` is not tracked yet, then save.
    ///
    /// Existing records are never touched, so running this twice is a
    /// no-op the second time. Saves only when something was added and
    /// returns the number of records added.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn scan_roots(&mut self, roots: &[PathBuf]) -> Result<usize, RegistryError> {
        let added = self.discover(roots);
        if added > 0 {
            self.save()?;
        }
        Ok(added)
    }

    /// Like [`scan_roots`](Self::scan_roots) but in memory only; the file
    /// on disk is left alone.
    ///
    /// Several markers carrying the same `app_id` add one record.
    pub fn discover(&mut self, roots: &[PathBuf]) -> usize {
        let mut added = 0;
        for root in roots.iter().filter(|r| r.exists()) {
            for marker_path in find_markers(root) {
                let Some(marker) = read_marker(&marker_path) else {
                    continue;
                };
                if self.is_tracked(&marker.app_id) {
                    continue;
                }
                info!(app_id = %marker.app_id, path = %marker_path.display(), "discovered installation");
                self.records
                    .push(InstallationRecord::from_marker(&marker, marker_path));
                added += 1;
            }
        }
        added
    }

    /// Find every readable marker under `root` and the ones no record tracks.
    pub fn survey_markers(&self, root: &Path) -> MarkerSurvey {
        let mut survey = MarkerSurvey::default();
        for marker_path in find_markers(root) {
            let Some(marker) = read_marker(&marker_path) else {
                continue;
            };
            survey.found += 1;
            if !self.is_tracked(&marker.app_id) {
                survey.orphans.push(marker_path);
            }
        }
        survey
    }

    /// Delete every marker under `root` whose `app_id` the registry does not track.
    ///
    /// Irreversible. Deletion failures are logged and counted out of
    /// `removed`.
    pub fn cleanup_orphaned_markers(&self, root: &Path) -> CleanupReport {
        let survey = self.survey_markers(root);
        let mut removed = 0;
        for orphan in &survey.orphans {
            match std::fs::remove_file(orphan) {
                Ok(()) => {
                    debug!(path = %orphan.display(), "removed orphaned marker");
                    removed += 1;
                }
                Err(err) => {
                    warn!(path = %orphan.display(), error = %err, "could not remove orphaned marker");
                }
            }
        }
        CleanupReport {
            found: survey.found,
            removed,
        }
    }

    fn upsert(&mut self, record: InstallationRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.app_id == record.app_id) {
            existing.merge(record);
        } else {
            self.records.push(record);
        }
    }
}
