//! Persistent per-header record of modification time and components
//!
//! The manifest decides which headers a run re-analyzes. It is owned by the
//! orchestrating thread; workers never touch it.

pub mod codec;
pub mod error;

pub use codec::ManifestVersion;
pub use error::ManifestError;

use chrono::{DateTime, Utc};
use codec::{DecodeError, Entries};
use cpp_lexer::logging::{codes, LoggingService};
use cpp_lexer::{log_success, log_warning};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// State recorded for one header. Replaced wholesale on re-analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub modified: DateTime<Utc>,
    pub components: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    version: ManifestVersion,
    entries: Entries,
}

impl Manifest {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: ManifestVersion::CURRENT,
            entries: Entries::new(),
        }
    }

    /// Load the manifest at `path`.
    ///
    /// A missing file yields an empty manifest. An unreadable or corrupt one
    /// is logged and replaced by an empty manifest. A directory at `path` or
    /// a newer major version is an error.
    pub fn load(path: &Path, logger: &LoggingService) -> Result<Self, ManifestError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(e) => {
                log_warning!(logger, code = codes::manifest::MANIFEST_CORRUPT,
                    "Manifest unreadable, starting empty",
                    "path" => path.display(),
                    "error" => e);
                return Ok(Self::empty(path));
            }
        };
        if !metadata.is_file() {
            return Err(ManifestError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let decoded = fs::read(path)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))
            .and_then(|bytes| codec::decode(&bytes));

        match decoded {
            Ok((version, entries)) => {
                log_success!(logger, codes::success::MANIFEST_LOADED, "Manifest loaded",
                    "path" => path.display(),
                    "version" => version,
                    "entries" => entries.len());
                Ok(Self {
                    path: path.to_path_buf(),
                    version,
                    entries,
                })
            }
            Err(DecodeError::UnsupportedVersion(found)) => Err(ManifestError::UnsupportedVersion {
                path: path.to_path_buf(),
                found,
                supported: ManifestVersion::CURRENT,
            }),
            Err(DecodeError::Corrupt(reason)) => {
                log_warning!(logger, code = codes::manifest::MANIFEST_CORRUPT,
                    "Manifest corrupt, starting empty",
                    "path" => path.display(),
                    "reason" => reason);
                Ok(Self::empty(path))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Version the manifest was loaded with; new manifests report the
    /// current version
    pub fn version(&self) -> ManifestVersion {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&ManifestEntry> {
        self.entries.get(path)
    }

    pub fn components(&self, path: &Path) -> Option<&BTreeSet<String>> {
        self.get(path).map(|entry| &entry.components)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Path, &ManifestEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    /// Union of the components of every recorded header
    pub fn all_components(&self) -> BTreeSet<String> {
        self.entries
            .values()
            .flat_map(|entry| entry.components.iter().cloned())
            .collect()
    }

    /// True if `path` has no entry or was modified after its entry was
    /// recorded
    pub fn is_changed(&self, path: &Path) -> Result<bool, ManifestError> {
        let Some(entry) = self.entries.get(path) else {
            return Ok(true);
        };
        Ok(entry.modified < modified_time(path)?)
    }

    /// Record `components` for `path` with its current modification time
    pub fn record(
        &mut self,
        path: &Path,
        components: BTreeSet<String>,
    ) -> Result<(), ManifestError> {
        let modified = modified_time(path)?;
        self.record_at(path, modified, components);
        Ok(())
    }

    pub fn record_at(
        &mut self,
        path: &Path,
        modified: DateTime<Utc>,
        components: BTreeSet<String>,
    ) {
        self.entries.insert(
            path.to_path_buf(),
            ManifestEntry {
                modified,
                components,
            },
        );
    }

    /// Write every entry with the current version. The data goes to a
    /// sibling temporary file first and is renamed over the manifest.
    pub fn flush(&self) -> Result<(), ManifestError> {
        let bytes = codec::encode(&self.entries)
            .map_err(|path| ManifestError::UnencodablePath { path })?;
        let temp = codec::temp_path(&self.path);
        fs::write(&temp, bytes).map_err(|e| ManifestError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| ManifestError::io(&self.path, e))
    }
}

fn modified_time(path: &Path) -> Result<DateTime<Utc>, ManifestError> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|e| ManifestError::io(path, e))
}
