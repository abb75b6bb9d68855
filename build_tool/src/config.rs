//! Run configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `BUILD_TOOL_*` environment variables. Keys missing from the file keep
//! their default.

use cpp_lexer::language::Dialect;
use cpp_lexer::logging::{codes, Code, LogLevel};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable names for configuration
pub mod env_vars {
    pub const CONFIG_FILE: &str = "BUILD_TOOL_CONFIG";
    pub const WORKERS: &str = "BUILD_TOOL_WORKERS";
    pub const DIALECT: &str = "BUILD_TOOL_DIALECT";
    /// Comma-separated
    pub const EXCLUDED_MARKERS: &str = "BUILD_TOOL_EXCLUDED_MARKERS";
    pub const HEADER_PATTERN: &str = "BUILD_TOOL_HEADER_PATTERN";
    pub const COMPONENT_MARKER: &str = "BUILD_TOOL_COMPONENT_MARKER";
    pub const CONSOLE_LEVEL: &str = "BUILD_TOOL_CONSOLE_LEVEL";
    pub const FILE_LEVEL: &str = "BUILD_TOOL_FILE_LEVEL";
    pub const STRUCTURED_LOGS: &str = "BUILD_TOOL_STRUCTURED_LOGS";
}

/// Config file looked up in the output directory when `BUILD_TOOL_CONFIG`
/// is unset
pub const DEFAULT_CONFIG_FILE_NAME: &str = "build_tool.toml";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid header pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        codes::config::INVALID_CONFIG
    }
}

/// Tunables for one build-tool run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildToolConfig {
    /// Worker threads; 0 means one per CPU
    pub workers: usize,
    pub dialect: Dialect,
    /// Paths containing any of these substrings are not walked
    pub excluded_markers: Vec<String>,
    /// Regular expression matched against file names
    pub header_pattern: String,
    /// Substring identifying component class names
    pub component_marker: String,
    pub manifest_name: String,
    pub log_file_name: String,
    pub console_level: LogLevel,
    pub file_level: LogLevel,
    /// Emit JSON lines instead of plain text on both sinks
    pub structured_logs: bool,
}

impl Default for BuildToolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            dialect: Dialect::default(),
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
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl BuildToolConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load the file named by `BUILD_TOOL_CONFIG`, else `build_tool.toml` in
    /// `bin_dir` if it exists, else defaults. `BUILD_TOOL_*` variables are
    /// applied last.
    pub fn discover(bin_dir: &Path) -> Result<Self, ConfigError> {
        let config = match env::var_os(env_vars::CONFIG_FILE) {
            Some(path) => Self::load(Path::new(&path))?,
            None => {
                let candidate = bin_dir.join(DEFAULT_CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::load(&candidate)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_overrides(|name| env::var(name).ok()))
    }

    /// Override fields from `lookup`, keyed by the `env_vars` names.
    /// Unparseable values leave the field unchanged.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workers) = lookup(env_vars::WORKERS).and_then(|v| v.parse().ok()) {
            self.workers = workers;
        }
        if let Some(dialect) = lookup(env_vars::DIALECT).and_then(|v| v.parse().ok()) {
            self.dialect = dialect;
        }
        if let Some(markers) = lookup(env_vars::EXCLUDED_MARKERS) {
            self.excluded_markers = split_list(&markers);
        }
        if let Some(pattern) = lookup(env_vars::HEADER_PATTERN) {
            self.header_pattern = pattern;
        }
        if let Some(marker) = lookup(env_vars::COMPONENT_MARKER) {
            self.component_marker = marker;
        }
        if let Some(level) = lookup(env_vars::CONSOLE_LEVEL).and_then(|v| v.parse().ok()) {
            self.console_level = level;
        }
        if let Some(level) = lookup(env_vars::FILE_LEVEL).and_then(|v| v.parse().ok()) {
            self.file_level = level;
        }
        if let Some(flag) = lookup(env_vars::STRUCTURED_LOGS) {
            self.structured_logs = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        self
    }

    /// Worker count with 0 replaced by the number of CPUs
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            0 => available_cpus(),
            n => n,
        }
    }

    pub fn header_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.header_pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: self.header_pattern.clone(),
            message: e.to_string(),
        })
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_excluded_markers(mut self, markers: Vec<String>) -> Self {
        self.excluded_markers = markers;
        self
    }
}

#[cfg(feature = "cli")]
fn available_cpus() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "cli"))]
fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Everything an orchestrator run needs: verified directories plus config
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub src_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub config: BuildToolConfig,
}

impl RunSettings {
    /// Manifest lives in `bin_dir` under the configured name
    pub fn new(
        src_dir: impl Into<PathBuf>,
        bin_dir: impl Into<PathBuf>,
        config: BuildToolConfig,
    ) -> Self {
        let bin_dir = bin_dir.into();
        Self {
            src_dir: src_dir.into(),
            manifest_path: bin_dir.join(&config.manifest_name),
            bin_dir,
            config,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.bin_dir.join(&self.config.log_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn defaults() -> BuildToolConfig {
        BuildToolConfig {
            workers: 4,
            dialect: Dialect::Cpp14,
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

    #[test]
    fn test_toml_overrides_only_given_keys() {
        let path = Path::new("build_tool.toml");
        let config = BuildToolConfig::from_toml_str(
            "workers = 2\ndialect = \"c++11\"\nexcluded_markers = [\"third_party\", \"external\"]\nfile_level = \"warn\"\n",
            path,
        )
        .unwrap();

        assert_eq!(config.workers, 2);
        assert_eq!(config.dialect, Dialect::Cpp11);
        assert_eq!(config.excluded_markers, vec!["third_party", "external"]);
        assert_eq!(config.file_level, LogLevel::Warning);
        assert_eq!(config.manifest_name, BuildToolConfig::default().manifest_name);
    }

    #[test]
    fn test_defaults_are_fixed() {
        assert_eq!(BuildToolConfig::default(), defaults());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let file = BuildToolConfig::from_toml_str(
            "workers = 2\ndialect = \"c++11\"\n",
            Path::new("build_tool.toml"),
        )
        .unwrap();
        let vars: HashMap<&str, &str> = [
            (env_vars::WORKERS, "8"),
            (env_vars::EXCLUDED_MARKERS, "third_party, external"),
            (env_vars::FILE_LEVEL, "not-a-level"),
            (env_vars::STRUCTURED_LOGS, "true"),
        ]
        .into_iter()
        .collect();

        let config = file.with_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.workers, 8);
        assert_eq!(config.dialect, Dialect::Cpp11);
        assert_eq!(config.excluded_markers, vec!["third_party", "external"]);
        assert_eq!(config.file_level, LogLevel::Debug);
        assert!(config.structured_logs);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err =
            BuildToolConfig::from_toml_str("dialect = \"c++42\"", Path::new("bad.toml")).unwrap_err();
        assert_matches!(err, ConfigError::Parse { .. });
        assert_eq!(err.error_code(), codes::config::INVALID_CONFIG);
    }

    #[test]
    fn test_header_regex() {
        let config = defaults();
        let regex = config.header_regex().unwrap();
        assert!(regex.is_match("widget.h"));
        assert!(!regex.is_match("widget.cpp"));
        assert!(!regex.is_match("widget.hpp"));

        let broken = defaults();
        let broken = BuildToolConfig {
            header_pattern: "(".to_string(),
            ..broken
        };
        assert_matches!(broken.header_regex(), Err(ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_zero_workers_means_cpu_count() {
        assert_eq!(defaults().with_workers(3).effective_workers(), 3);
        assert!(defaults().with_workers(0).effective_workers() >= 1);
    }

    #[test]
    fn test_run_settings_paths() {
        let settings = RunSettings::new("/src", "/bin", defaults());
        assert_eq!(settings.manifest_path, PathBuf::from("/bin/header_manifest"));
        assert_eq!(settings.log_path(), PathBuf::from("/bin/build-tool.log"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, ,b "), vec!["a", "b"]);
    }
}
