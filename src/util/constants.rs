// LogMixer - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogMixer";

/// Application identifier used for config directories.
pub const APP_ID: &str = "logmixer";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp layout
// =============================================================================

/// chrono format of the block-start timestamp, e.g. `2025-01-01 10:00:00,000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Width in bytes of a rendered `TIMESTAMP_FORMAT` prefix.
pub const TIMESTAMP_WIDTH: usize = "2006-01-02 15:04:05,000".len();

// =============================================================================
// Discovery limits
// =============================================================================

/// Default maximum directory recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 256;

/// Default include glob patterns for log file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.txt"];

/// Default exclude glob patterns for log file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.gz", "*.zip", "*.bak", "*.tmp", ".git"];

/// File-name suffixes recognised as log files when detecting an existing
/// provenance tag on a block-start line.
pub const LOG_EXTENSIONS: &[&str] = &[".log", ".txt"];

// =============================================================================
// Segmentation limits
// =============================================================================

/// Maximum size of a single input line in bytes. A longer line aborts the
/// remainder of its source.
pub const DEFAULT_MAX_LINE_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Minimum user-configurable line limit.
pub const MIN_MAX_LINE_BYTES: usize = 1024;

/// Maximum user-configurable line limit.
pub const ABSOLUTE_MAX_LINE_BYTES: usize = 256 * 1024 * 1024; // 256 MiB

/// Default number of worker threads for parallel segmentation.
/// 0 means auto-detect (use available CPU cores).
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Maximum user-configurable worker thread count.
pub const MAX_WORKER_THREADS: usize = 256;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration and CLI defaults
// =============================================================================

/// Application configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Filter rules file name (looked up in the platform config directory).
pub const FILTERS_FILE_NAME: &str = "filters.yaml";

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = "./logs";

/// Default output file.
pub const DEFAULT_OUTPUT_FILE: &str = "combined_sorted.log";
