// LogMixer - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Severity by subsystem:
//   - Discovery and Export errors are fatal to a merge run.
//   - Parse errors are scoped to a single source file.
//   - Config errors degrade to defaults and are reported as warnings.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Top-level error type for all LogMixer operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogMixerError {
    /// Input directory traversal failed.
    Discovery(DiscoveryError),

    /// Reading or segmenting a source file failed.
    Parse(ParseError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Writing the merged output failed.
    Export(ExportError),
}

impl fmt::Display for LogMixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for LogMixerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to input directory traversal.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root input path does not exist.
    RootNotFound { path: PathBuf },

    /// The root input path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Walkdir traversal error below the root.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Input path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Input path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for LogMixerError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors raised while segmenting one source. Never abort sibling sources.
#[derive(Debug)]
pub enum ParseError {
    /// The source could not be opened; it contributes no blocks.
    Open { file: PathBuf, source: io::Error },

    /// A line exceeded the configured maximum length.
    LineTooLong {
        file: PathBuf,
        line_number: u64,
        max_bytes: usize,
    },

    /// I/O error while reading the source.
    Io {
        file: PathBuf,
        line_number: u64,
        source: io::Error,
    },
}

impl ParseError {
    /// Path of the source this error belongs to.
    pub fn file(&self) -> &Path {
        match self {
            Self::Open { file, .. } | Self::LineTooLong { file, .. } | Self::Io { file, .. } => {
                file
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { file, source } => {
                write!(f, "cannot open '{}': {source}", file.display())
            }
            Self::LineTooLong {
                file,
                line_number,
                max_bytes,
            } => write!(
                f,
                "'{}' line {line_number}: line exceeds maximum of {max_bytes} bytes, \
                 remaining lines skipped",
                file.display()
            ),
            Self::Io {
                file,
                line_number,
                source,
            } => write!(
                f,
                "'{}' line {line_number}: I/O error: {source}",
                file.display()
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::LineTooLong { .. } => None,
        }
    }
}

impl From<ParseError> for LogMixerError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Filter YAML could not be parsed.
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// config.toml could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading a config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YamlParse { path, source } => {
                write!(f, "Filter file parse error '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::YamlParse { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ValueOutOfRange { .. } => None,
        }
    }
}

impl From<ConfigError> for LogMixerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing the merged output.
#[derive(Debug)]
pub enum ExportError {
    /// The output file could not be created.
    Create { path: PathBuf, source: io::Error },

    /// I/O error writing or flushing the output.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { path, source } => {
                write!(f, "Cannot create output file '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Output I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create { source, .. } | Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogMixerError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for LogMixer results.
pub type Result<T> = std::result::Result<T, LogMixerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_export_error_preserves_source_chain() {
        let err: LogMixerError = ExportError::Create {
            path: PathBuf::from("/no/such/dir/out.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing parent"),
        }
        .into();

        let text = err.to_string();
        assert!(text.starts_with("Export error:"), "got: {text}");
        assert!(text.contains("out.log"));

        let inner = err.source().expect("export error as source");
        let io_err = inner.source().expect("io error as source");
        assert_eq!(io_err.to_string(), "missing parent");
    }

    #[test]
    fn test_parse_error_reports_file() {
        let err = ParseError::LineTooLong {
            file: PathBuf::from("big.log"),
            line_number: 7,
            max_bytes: 1024,
        };
        assert_eq!(err.file(), Path::new("big.log"));
        assert!(err.to_string().contains("line 7"));
        assert!(err.source().is_none());
    }
}
