// LogMixer - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. These types are the shared vocabulary across
// all layers.

use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Message Block
// =============================================================================

/// One logical log entry: a block-start line plus its continuation lines.
///
/// `text` holds the verbatim lines, each newline-terminated, with the
/// origin tag already inserted into the first line. A materialised block
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    /// Instant parsed from the block-start line. `None` for lines that
    /// preceded any recognised start in their source; those sort first.
    pub timestamp: Option<NaiveDateTime>,

    /// Concatenated, newline-terminated lines.
    pub text: String,
}

impl MessageBlock {
    /// Number of lines held by this block.
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count()
    }
}

// =============================================================================
// Discovered File (output of discovery)
// =============================================================================

/// A source file found under the input root, before segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// Origin identifier inserted into block-start lines: the path relative
    /// to the input root, `/`-separated.
    pub origin: String,

    /// File size in bytes.
    pub size: u64,
}

// =============================================================================
// Summaries
// =============================================================================

/// Per-source segmentation statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    /// File path.
    pub path: PathBuf,

    /// Lines read before the source ended or was aborted.
    pub lines_read: u64,

    /// Blocks that survived filtering.
    pub blocks_kept: usize,

    /// Blocks dropped by the filter.
    pub blocks_dropped: usize,

    /// Whether the source was aborted (open or scan failure).
    pub failed: bool,
}

/// Totals for a completed merge run. Owned and updated by the orchestrator
/// only; segmentation workers report through their `SourceSummary`.
#[derive(Debug, Clone, Default)]
pub struct MergeSummary {
    /// Files handed to the segmenter.
    pub sources: usize,

    /// Files that failed to open or were aborted mid-scan.
    pub sources_failed: usize,

    /// Total lines read across all sources.
    pub lines_read: u64,

    /// Blocks written to the output.
    pub blocks_kept: usize,

    /// Blocks dropped by the filter.
    pub blocks_dropped: usize,

    /// Bytes written to the output.
    pub bytes_written: u64,

    /// Non-fatal diagnostics collected during the run.
    pub warnings: Vec<String>,

    /// Per-file breakdown, in discovery order.
    pub source_summaries: Vec<SourceSummary>,

    /// Wall-clock run duration.
    pub duration: Duration,
}

impl MergeSummary {
    /// Fold one source's statistics into the run totals.
    pub fn record_source(&mut self, source: SourceSummary) {
        self.sources += 1;
        if source.failed {
            self.sources_failed += 1;
        }
        self.lines_read += source.lines_read;
        self.blocks_kept += source.blocks_kept;
        self.blocks_dropped += source.blocks_dropped;
        self.source_summaries.push(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        let block = MessageBlock {
            timestamp: None,
            text: "first\n  second\n".to_string(),
        };
        assert_eq!(block.line_count(), 2);
    }

    #[test]
    fn test_record_source_accumulates() {
        let mut summary = MergeSummary::default();
        summary.record_source(SourceSummary {
            path: PathBuf::from("a.log"),
            lines_read: 10,
            blocks_kept: 3,
            blocks_dropped: 1,
            failed: false,
        });
        summary.record_source(SourceSummary {
            path: PathBuf::from("b.log"),
            failed: true,
            ..Default::default()
        });

        assert_eq!(summary.sources, 2);
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.lines_read, 10);
        assert_eq!(summary.blocks_kept, 3);
        assert_eq!(summary.blocks_dropped, 1);
        assert_eq!(summary.source_summaries.len(), 2);
    }
}
