// LogMixer - platform/config.rs
//
// Platform-specific configuration directory resolution, filter file loading,
// and config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.
//
// Nothing in here is fatal: every failure degrades to defaults and is
// returned as a human-readable warning for the caller to report.

use crate::core::filter::{FilterConfig, RawFilterConfig};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogMixer configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logmixer/ or %APPDATA%\logmixer\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of the filter rules file.
    pub fn filters_file(&self) -> PathBuf {
        self.config_dir.join(constants::FILTERS_FILE_NAME)
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// Filter file (YAML)
// =============================================================================

/// Load the filter rules file.
///
/// A missing, unreadable, or malformed file yields an empty configuration
/// (every block kept) plus a warning.
pub fn load_filter_config(path: &Path) -> (FilterConfig, Vec<String>) {
    match read_filter_config(path) {
        Ok(config) => {
            tracing::info!(
                path = %path.display(),
                exclude = config.exclude.len(),
                include = config.include.len(),
                "Loaded filter rules"
            );
            (config, Vec::new())
        }
        Err(e) => {
            let msg = format!("{e}. No filters applied.");
            tracing::warn!("{}", msg);
            (FilterConfig::default(), vec![msg])
        }
    }
}

/// Strict variant of [`load_filter_config`].
pub fn read_filter_config(path: &Path) -> Result<FilterConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_filter_config(&content, path)
}

/// Parse filter YAML. An empty document is an empty configuration.
pub fn parse_filter_config(content: &str, path: &Path) -> Result<FilterConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(FilterConfig::default());
    }
    let raw: Option<RawFilterConfig> =
        serde_yaml::from_str(content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw.unwrap_or_default().into())
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[merge]` section.
    pub merge: MergeSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[merge]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MergeSection {
    /// Number of worker threads (0 = auto).
    pub worker_threads: Option<usize>,
    /// Maximum input line length in bytes.
    pub max_line_bytes: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    pub max_depth: usize,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    // -- Merge --
    pub worker_threads: usize,
    pub max_line_bytes: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let owned =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| (*s).to_string()).collect() };
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_patterns: owned(constants::DEFAULT_INCLUDE_PATTERNS),
            exclude_patterns: owned(constants::DEFAULT_EXCLUDE_PATTERNS),
            worker_threads: constants::DEFAULT_WORKER_THREADS,
            max_line_bytes: constants::DEFAULT_MAX_LINE_BYTES,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings.
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            let e = ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            };
            return (AppConfig::default(), vec![format!("{e}. Using defaults.")]);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let e = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source,
            };
            return (AppConfig::default(), vec![format!("{e}. Using defaults.")]);
        }
    };

    tracing::debug!(path = %config_path.display(), "Loaded config.toml");
    validate_config(raw)
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate_config(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String, default: String| {
        let e = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        };
        warnings.push(format!("{e}. Using default ({default})."));
    };

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            out_of_range(
                "discovery.max_depth",
                depth.to_string(),
                format!("1-{}", constants::ABSOLUTE_MAX_DEPTH),
                constants::DEFAULT_MAX_DEPTH.to_string(),
            );
        }
    }

    // -- Discovery: patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        config.include_patterns = patterns;
    }
    if let Some(patterns) = raw.discovery.exclude_patterns {
        config.exclude_patterns = patterns;
    }

    // -- Merge: worker_threads --
    if let Some(threads) = raw.merge.worker_threads {
        if threads <= constants::MAX_WORKER_THREADS {
            config.worker_threads = threads;
        } else {
            out_of_range(
                "merge.worker_threads",
                threads.to_string(),
                format!("0-{}", constants::MAX_WORKER_THREADS),
                "auto".to_string(),
            );
        }
    }

    // -- Merge: max_line_bytes --
    if let Some(bytes) = raw.merge.max_line_bytes {
        if (constants::MIN_MAX_LINE_BYTES..=constants::ABSOLUTE_MAX_LINE_BYTES).contains(&bytes) {
            config.max_line_bytes = bytes;
        } else {
            out_of_range(
                "merge.max_line_bytes",
                bytes.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_LINE_BYTES,
                    constants::ABSOLUTE_MAX_LINE_BYTES
                ),
                constants::DEFAULT_MAX_LINE_BYTES.to_string(),
            );
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            out_of_range(
                "logging.level",
                level,
                "error, warn, info, debug, trace".to_string(),
                constants::DEFAULT_LOG_LEVEL.to_string(),
            );
        }
    }

    (config, warnings)
}
