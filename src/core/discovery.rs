// LogMixer - core/discovery.rs
//
// Recursive directory traversal and log file discovery.
//
// Uses `walkdir` as an OS abstraction for traversal and reads only file
// metadata, never contents.
//
// Any traversal error is fatal: a merge built from a partially walked tree
// would silently miss entries. Results are sorted by path so sources with
// equal timestamps always merge in the same order.

use crate::core::model::DiscoveredFile;
use crate::util::error::DiscoveryError;
use std::path::{Component, Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,

    /// Exact paths never returned, e.g. the output file when it lives inside
    /// the input tree.
    pub exclude_paths: Vec<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_paths: Vec::new(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover log files under `root`, sorted by path.
///
/// `on_file_found` is called once per accepted file with the running count.
///
/// # Errors
/// Returns `Err` if the root is missing, not a directory, unreadable, or if
/// any entry below it cannot be traversed.
pub fn discover_files<F>(
    root: &Path,
    config: &DiscoveryConfig,
    mut on_file_found: F,
) -> Result<Vec<DiscoveredFile>, DiscoveryError>
where
    F: FnMut(&DiscoveredFile, usize),
{
    use crate::util::constants;

    // fs::metadata rather than Path::is_dir so PermissionDenied is not
    // reported as "does not exist".
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");
    let excluded_paths: Vec<PathBuf> = config
        .exclude_paths
        .iter()
        .map(|p| normalize(p))
        .collect();

    let mut files: Vec<DiscoveredFile> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !is_excluded_component(name, &exclude_pats)
        });

    for entry_result in walker {
        let entry = entry_result.map_err(|e| DiscoveryError::Traversal {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                tracing::warn!(path = %path.display(), "Skipping non-UTF-8 filename");
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }
        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }
        if !excluded_paths.is_empty() && excluded_paths.contains(&normalize(path)) {
            tracing::debug!(file = %path.display(), "Excluded by path");
            continue;
        }

        let metadata = entry.metadata().map_err(|e| DiscoveryError::Traversal {
            path: path.to_path_buf(),
            source: e,
        })?;

        let discovered = DiscoveredFile {
            path: path.to_path_buf(),
            origin: origin_for(root, path),
            size: metadata.len(),
        };

        let count = files.len() + 1;
        on_file_found(&discovered, count);
        files.push(discovered);
    }

    // sort_by_file_name orders siblings only; a full path sort also fixes
    // the order between a directory's files and its subdirectories.
    files.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(files = files.len(), "Discovery complete");
    Ok(files)
}

/// Origin identifier for `path`: relative to `root`, `/`-separated.
/// Falls back to the full path when `path` is not below `root`.
pub fn origin_for(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        _ => path.display().to_string(),
    }
}

/// Absolute, `.`-free form of a path used for identity comparison.
/// Falls back to lexical cleanup when the path cannot be canonicalised.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    // The file may not exist yet; canonicalise its parent instead.
    if let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) {
        if let Ok(parent) = parent.canonicalize() {
            return parent.join(name);
        }
    }
    absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Literal (wildcard-free) exclude patterns also match directory names.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

/// An empty include list means "include all".
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("b.log"), "2024-01-01 12:00:00,000 b\n").expect("write b.log");
        fs::write(root.join("a.log"), "2024-01-01 12:00:01,000 a\n").expect("write a.log");
        fs::write(root.join("notes.txt"), "just notes\n").expect("write notes.txt");
        fs::write(root.join("data.csv"), "x,y\n").expect("write data.csv");
        fs::write(root.join("old.log.gz"), "binary").expect("write .gz");

        let sub = root.join("sub");
        fs::create_dir(&sub).expect("mkdir sub");
        fs::write(sub.join("c.log"), "2024-01-01 12:00:02,000 c\n").expect("write c.log");

        let git = root.join(".git");
        fs::create_dir(&git).expect("mkdir .git");
        fs::write(git.join("hook.log"), "excluded\n").expect("write hook.log");

        dir
    }

    fn origins(files: &[DiscoveredFile]) -> Vec<&str> {
        files.iter().map(|f| f.origin.as_str()).collect()
    }

    #[test]
    fn test_discovers_log_and_txt_files_sorted() {
        let dir = make_temp_tree();
        let files = discover_files(dir.path(), &DiscoveryConfig::default(), |_, _| {}).unwrap();
        assert_eq!(origins(&files), vec!["a.log", "b.log", "notes.txt", "sub/c.log"]);
    }

    #[test]
    fn test_max_depth_1_excludes_subdirs() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let files = discover_files(dir.path(), &config, |_, _| {}).unwrap();
        assert!(!origins(&files).contains(&"sub/c.log"));
    }

    #[test]
    fn test_exclude_paths_skips_output_file() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            exclude_paths: vec![dir.path().join("b.log")],
            ..Default::default()
        };
        let files = discover_files(dir.path(), &config, |_, _| {}).unwrap();
        assert_eq!(origins(&files), vec!["a.log", "notes.txt", "sub/c.log"]);
    }

    #[test]
    fn test_empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover_files(dir.path(), &DiscoveryConfig::default(), |_, _| {}).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_root_not_found() {
        let result = discover_files(
            Path::new("/nonexistent/path/logmixer"),
            &DiscoveryConfig::default(),
            |_, _| {},
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir.log");
        fs::write(&file, "content").unwrap();
        let result = discover_files(&file, &DiscoveryConfig::default(), |_, _| {});
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_progress_callback_called_for_each_file() {
        let dir = make_temp_tree();
        let mut callback_count = 0usize;
        let files = discover_files(dir.path(), &DiscoveryConfig::default(), |_, _| {
            callback_count += 1;
        })
        .unwrap();
        assert_eq!(callback_count, files.len());
    }

    #[test]
    fn test_size_collected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("meta.log"), "hello world").unwrap();
        let files = discover_files(dir.path(), &DiscoveryConfig::default(), |_, _| {}).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 11);
    }

    #[test]
    fn test_origin_for() {
        let root = Path::new("logs");
        assert_eq!(origin_for(root, Path::new("logs/a.log")), "a.log");
        assert_eq!(origin_for(root, Path::new("logs/x/y/b.log")), "x/y/b.log");
        assert_eq!(origin_for(root, Path::new("other/c.log")), "other/c.log");
    }
}
