//! Incremental analysis of every changed header under a source tree

use crate::components::extract_components;
use crate::config::RunSettings;
use crate::error::BuildToolError;
use crate::manifest::Manifest;
use crate::pool::WorkerPool;
use cpp_lexer::logging::{codes, LoggingService};
use cpp_lexer::{log_debug, log_info, log_success, log_warning, Tokenizer, TokenizerError};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Headers matching the pattern outside excluded subtrees
    pub discovered: usize,
    /// Discovered headers that changed since the last run
    pub selected: usize,
    pub analyzed: usize,
    pub failed: usize,
    /// Components found in the headers analyzed by this run
    pub components: BTreeSet<String>,
    pub diagnostics: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Result of analyzing one header on a worker
struct HeaderAnalysis {
    components: BTreeSet<String>,
    tokens: usize,
    diagnostics: usize,
}

pub struct Orchestrator {
    settings: RunSettings,
    logger: Arc<LoggingService>,
    tokenizer: Tokenizer,
    header_pattern: Regex,
}

impl Orchestrator {
    /// Verify both directories and the header pattern before any work
    pub fn new(
        mut settings: RunSettings,
        logger: Arc<LoggingService>,
    ) -> Result<Self, BuildToolError> {
        settings.src_dir = verify_dir(&settings.src_dir)?;
        settings.bin_dir = verify_dir(&settings.bin_dir)?;
        let header_pattern = settings.config.header_regex()?;
        let tokenizer = Tokenizer::new(settings.config.dialect, Arc::clone(&logger));

        log_info!(logger, "Initializing build-tool",
            "src_dir" => settings.src_dir.display(),
            "bin_dir" => settings.bin_dir.display(),
            "dialect" => settings.config.dialect);

        Ok(Self {
            settings,
            logger,
            tokenizer,
            header_pattern,
        })
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn run(&self) -> Result<RunSummary, BuildToolError> {
        let started = Instant::now();
        let logger = &self.logger;
        let config = &self.settings.config;

        let mut manifest = Manifest::load(&self.settings.manifest_path, logger)?;
        // Fail before dispatching work if the tables cannot be resolved.
        self.tokenizer.automaton()?;

        let discovered = self.discover();
        let selected = self.select_changed(&manifest, &discovered);
        let mut summary = RunSummary {
            discovered: discovered.len(),
            selected: selected.len(),
            ..RunSummary::default()
        };

        let pool = WorkerPool::new(config.effective_workers());
        let marker = config.component_marker.as_str();
        let tokenizer = &self.tokenizer;

        let report = pool.run(
            selected,
            |path: PathBuf| {
                let analysis = tokenizer.tokenize_file(&path).map(|output| HeaderAnalysis {
                    components: extract_components(&output.tokens, marker),
                    tokens: output.tokens.len(),
                    diagnostics: output.diagnostics.len(),
                });
                (path, analysis)
            },
            |(path, analysis)| self.record(&mut manifest, &mut summary, &path, analysis),
        )?;

        manifest.flush()?;
        log_success!(logger, codes::success::MANIFEST_FLUSHED, "Manifest written",
            "path" => manifest.path().display(),
            "entries" => manifest.len());

        summary.elapsed = started.elapsed();
        log_success!(logger, codes::success::RUN_COMPLETED, "build-tool completed successfully",
            "discovered" => summary.discovered,
            "analyzed" => summary.analyzed,
            "failed" => summary.failed,
            "components" => summary.components.len(),
            "workers" => report.per_worker.len(),
            "duration_ms" => format!("{:.2}", summary.elapsed.as_secs_f64() * 1000.0));
        if let Ok(json) = summary.to_json() {
            log_debug!(logger, "Run summary", "json" => json);
        }

        Ok(summary)
    }

    /// Headers under the source tree, skipping excluded subtrees
    pub fn discover(&self) -> Vec<PathBuf> {
        let src_dir = &self.settings.src_dir;
        let walker = WalkDir::new(src_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        let mut headers = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log_warning!(self.logger, code = codes::file_processing::IO_ERROR,
                        "Skipping unreadable directory entry",
                        "error" => e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                log_debug!(self.logger, "Walking directory",
                    "path" => entry.path().display(),
                    "depth" => entry.depth());
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.header_pattern.is_match(name));
            if !entry.file_type().is_file() || !matches {
                continue;
            }
            // The manifest stores paths as UTF-8
            if entry.path().to_str().is_none() {
                log_warning!(self.logger, code = codes::file_processing::INVALID_PATH,
                    "Skipping header with a non UTF-8 path",
                    "path" => entry.path().display());
                continue;
            }
            headers.push(entry.into_path());
        }
        headers
    }

    /// Excluded markers are matched against the path below the source root
    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.settings.src_dir).unwrap_or(path);
        let relative = relative.to_string_lossy();
        self.settings
            .config
            .excluded_markers
            .iter()
            .any(|marker| relative.contains(marker.as_str()))
    }

    fn select_changed(&self, manifest: &Manifest, headers: &[PathBuf]) -> Vec<PathBuf> {
        headers
            .iter()
            .filter(|path| match manifest.is_changed(path) {
                Ok(changed) => {
                    if changed {
                        log_debug!(self.logger, "Adding header to the queue",
                            "file" => path.display());
                    }
                    changed
                }
                Err(e) => {
                    log_warning!(self.logger, code = e.error_code(),
                        "Cannot check header, skipping",
                        "file" => path.display(),
                        "error" => e);
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Apply one worker result. Runs only on the orchestrating thread.
    fn record(
        &self,
        manifest: &mut Manifest,
        summary: &mut RunSummary,
        path: &Path,
        analysis: Result<HeaderAnalysis, TokenizerError>,
    ) {
        let analysis = match analysis {
            Ok(analysis) => analysis,
            Err(e) => {
                summary.failed += 1;
                log_warning!(self.logger, code = e.error_code(), "Skipping header",
                    "file" => path.display(),
                    "error" => e);
                return;
            }
        };

        if let Err(e) = manifest.record(path, analysis.components.clone()) {
            summary.failed += 1;
            log_warning!(self.logger, code = e.error_code(), "Cannot record header",
                "file" => path.display(),
                "error" => e);
            return;
        }

        summary.analyzed += 1;
        summary.diagnostics += analysis.diagnostics;
        log_debug!(self.logger, code = codes::success::FILE_ANALYZED, "Header analyzed",
            "file" => path.display(),
            "tokens" => analysis.tokens,
            "components" => analysis.components.iter().cloned().collect::<Vec<_>>().join(","));
        summary.components.extend(analysis.components);
    }
}

/// Canonical form of `path`, which must be an existing directory
pub fn verify_dir(path: &Path) -> Result<PathBuf, BuildToolError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| BuildToolError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !canonical.is_dir() {
        return Err(BuildToolError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildToolConfig;
    use crate::manifest::ManifestError;
    use assert_matches::assert_matches;
    use cpp_lexer::logging::{LogLevel, MemoryLogger};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        src: TempDir,
        bin: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                src: tempdir().unwrap(),
                bin: tempdir().unwrap(),
            };
            fixture.write("engine/render.h", "class RenderComponent : public Base {};");
            fixture.write("engine/math.h", "class Vector3 { float x, y, z; };");
            fixture.write("engine/render.cpp", "class IgnoredComponent {};");
            fixture.write("external/lib/vendor.h", "class VendorComponent {};");
            fixture.write("audio.h", "class AudioComponent; class MixerComponent {};");
            fixture
        }

        fn write(&self, relative: &str, content: &str) {
            let path = self.src.path().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn config() -> BuildToolConfig {
            BuildToolConfig {
                workers: 2,
                dialect: cpp_lexer::Dialect::Cpp14,
                excluded_markers: vec!["external".to_string()],
                header_pattern: r".*\.h$".to_string(),
                component_marker: "Component".to_string(),
                manifest_name: "header_manifest".to_string(),
                log_file_name: "build-tool.log".to_string(),
                console_level: LogLevel::Info,
                file_level: LogLevel::Debug,
                structured_logs: false,
            }
        }

        fn orchestrator(&self) -> (Orchestrator, Arc<MemoryLogger>) {
            let (logger, memory) = LoggingService::in_memory(LogLevel::Debug);
            let settings = RunSettings::new(self.src.path(), self.bin.path(), Self::config());
            (Orchestrator::new(settings, Arc::new(logger)).unwrap(), memory)
        }

        fn manifest(&self) -> Manifest {
            Manifest::load(
                &self.bin.path().join("header_manifest"),
                &LoggingService::disabled(),
            )
            .unwrap()
        }
    }

    #[test]
    fn test_first_run_records_components_and_skips_external() {
        let fixture = Fixture::new();
        let (orchestrator, memory) = fixture.orchestrator();

        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.selected, 3);
        assert_eq!(summary.analyzed, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            summary.components.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["AudioComponent", "MixerComponent", "RenderComponent"]
        );

        let manifest = fixture.manifest();
        assert_eq!(manifest.len(), 3);
        assert!(manifest
            .entries()
            .all(|(path, _)| !path.to_string_lossy().contains("external")));
        assert!(memory.has_event_with_code(codes::success::RUN_COMPLETED));
        assert!(memory.has_event_with_code(codes::success::MANIFEST_FLUSHED));
    }

    #[test]
    fn test_second_run_selects_nothing() {
        let fixture = Fixture::new();
        fixture.orchestrator().0.run().unwrap();

        let summary = fixture.orchestrator().0.run().unwrap();
        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.selected, 0);
        assert_eq!(summary.analyzed, 0);
        assert_eq!(fixture.manifest().len(), 3);
    }

    #[test]
    fn test_unreadable_header_is_skipped_and_not_recorded() {
        let fixture = Fixture::new();
        let bad = fixture.src.path().join("broken.h");
        fs::write(&bad, [0x63, 0x6c, 0xff, 0xfe]).unwrap();
        let (orchestrator, memory) = fixture.orchestrator();

        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.selected, 4);
        assert_eq!(summary.analyzed, 3);
        assert_eq!(summary.failed, 1);

        let bad = bad.canonicalize().unwrap();
        assert!(fixture.manifest().get(&bad).is_none());
        assert!(memory.has_event_with_code(codes::file_processing::INVALID_ENCODING));

        // Still selected on the next run.
        assert_eq!(fixture.orchestrator().0.run().unwrap().selected, 1);
    }

    #[test]
    fn test_scan_diagnostics_are_counted() {
        let fixture = Fixture::new();
        fixture.write("odd.h", "int a = 1 @ 2; \"open");
        let (orchestrator, _memory) = fixture.orchestrator();

        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.diagnostics, 2);
        assert_eq!(summary.failed, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_is_skipped_and_others_persist() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fixture = Fixture::new();
        let odd_dir = fixture.src.path().join(OsStr::from_bytes(b"caf\xe9"));
        fs::create_dir_all(&odd_dir).unwrap();
        fs::write(odd_dir.join("x.h"), "class CafeComponent {};").unwrap();
        let (orchestrator, memory) = fixture.orchestrator();

        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.discovered, 3);
        assert!(!summary.components.contains("CafeComponent"));
        assert!(memory.has_event_with_code(codes::file_processing::INVALID_PATH));

        let manifest = fixture.manifest();
        assert_eq!(manifest.len(), 3);
        assert!(manifest.entries().any(|(path, _)| path.ends_with("audio.h")));
        assert!(manifest.entries().all(|(path, _)| path.to_str().is_some()));
    }

    #[test]
    fn test_invalid_directories_fail_before_work() {
        let fixture = Fixture::new();
        let file = fixture.src.path().join("audio.h");
        let settings = RunSettings::new(&file, fixture.bin.path(), Fixture::config());

        let result = Orchestrator::new(settings, Arc::new(LoggingService::disabled()));
        assert_matches!(result.err(), Some(BuildToolError::InvalidDirectory { .. }));

        let missing = fixture.src.path().join("nope");
        assert_matches!(
            verify_dir(&missing),
            Err(BuildToolError::InvalidDirectory { path, .. }) if path == missing
        );
    }

    #[test]
    fn test_newer_manifest_aborts_the_run() {
        let fixture = Fixture::new();
        let manifest_path = fixture.bin.path().join("header_manifest");
        Manifest::empty(&manifest_path).flush().unwrap();
        let mut bytes = fs::read(&manifest_path).unwrap();
        bytes[8..10].copy_from_slice(&9u16.to_le_bytes());
        fs::write(&manifest_path, bytes).unwrap();

        let (orchestrator, _memory) = fixture.orchestrator();
        assert_matches!(
            orchestrator.run(),
            Err(BuildToolError::Manifest(ManifestError::UnsupportedVersion { .. }))
        );
    }
}
