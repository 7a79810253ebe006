// LogMixer - app/merge.rs
//
// Merge run orchestration: discovery -> segmentation -> aggregation -> write.
//
// Architecture:
//   - Each source is segmented by its own rayon task into a private block
//     list; no collection is shared between workers.
//   - `collect` on an indexed parallel iterator is the barrier: it returns
//     only when every source has finished, with results in discovery order.
//   - `MergeSummary` is owned here and updated on this thread only.
//
// Error policy:
//   - Discovery and output errors abort the run.
//   - Open and scan failures are per source: logged, recorded as warnings,
//     and never affect sibling sources.

use crate::core::aggregate;
use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::export;
use crate::core::filter::FilterConfig;
use crate::core::model::{DiscoveredFile, MergeSummary, SourceSummary};
use crate::core::segment::{self, SegmentConfig, SegmentResult};
use crate::core::timestamp::{FixedLayout, TimestampRecognizer};
use crate::platform::fs;
use crate::util::error::{ParseError, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Everything a merge run needs, resolved by the caller.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Directory walked for source files.
    pub input_dir: PathBuf,

    /// Destination of the merged output.
    pub output_file: PathBuf,

    /// Read-only filter rules shared by every segmenter.
    pub filter: FilterConfig,

    /// Discovery settings. The output file is always excluded in addition
    /// to whatever `exclude_paths` already holds.
    pub discovery: DiscoveryConfig,

    /// Segmentation limits.
    pub segment: SegmentConfig,

    /// Worker threads for segmentation (0 = one per CPU core).
    pub worker_threads: usize,
}

impl MergeRequest {
    /// A request with default discovery, segmentation, and threading settings.
    pub fn new(input_dir: PathBuf, output_file: PathBuf, filter: FilterConfig) -> Self {
        Self {
            input_dir,
            output_file,
            filter,
            discovery: DiscoveryConfig::default(),
            segment: SegmentConfig::default(),
            worker_threads: crate::util::constants::DEFAULT_WORKER_THREADS,
        }
    }
}

/// Run a full merge and write the output file.
///
/// # Errors
/// Fails on a discovery error or when the output cannot be created or
/// written. Per-source failures are reported in `MergeSummary::warnings`.
pub fn run_merge(request: &MergeRequest) -> Result<MergeSummary> {
    let started = Instant::now();

    let mut discovery_config = request.discovery.clone();
    discovery_config
        .exclude_paths
        .push(request.output_file.clone());

    let files = discovery::discover_files(&request.input_dir, &discovery_config, |file, count| {
        tracing::info!(file = %file.path.display(), count, "Processing");
    })?;

    tracing::info!(
        root = %request.input_dir.display(),
        files = files.len(),
        "Discovery complete"
    );

    let results = collect_sources(
        &files,
        &FixedLayout::default(),
        &request.filter,
        &request.segment,
        request.worker_threads,
    );

    let mut summary = MergeSummary::default();
    let mut per_source = Vec::with_capacity(results.len());
    for result in results {
        if let Some(e) = result.error {
            summary.warnings.push(e.to_string());
        }
        summary.record_source(result.summary);
        per_source.push(result.blocks);
    }

    let blocks = aggregate::aggregate(per_source);
    summary.bytes_written = export::write_output_file(&request.output_file, &blocks)?;
    summary.duration = started.elapsed();

    tracing::info!(
        sources = summary.sources,
        failed = summary.sources_failed,
        kept = summary.blocks_kept,
        dropped = summary.blocks_dropped,
        bytes = summary.bytes_written,
        elapsed_ms = summary.duration.as_millis() as u64,
        "Merge complete"
    );

    Ok(summary)
}

/// Segment every source, in parallel on `worker_threads` threads.
///
/// Results are returned in the order of `files` regardless of which worker
/// finished first. If the thread pool cannot be built the sources are
/// processed sequentially on the calling thread.
pub fn collect_sources(
    files: &[DiscoveredFile],
    recognizer: &dyn TimestampRecognizer,
    filter: &FilterConfig,
    config: &SegmentConfig,
    worker_threads: usize,
) -> Vec<SegmentResult> {
    let segment_all = || {
        files
            .par_iter()
            .map(|file| segment_file(file, recognizer, filter, config))
            .collect::<Vec<_>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .build()
    {
        Ok(pool) => pool.install(segment_all),
        Err(e) => {
            tracing::warn!(error = %e, "Thread pool unavailable, segmenting sequentially");
            files
                .iter()
                .map(|file| segment_file(file, recognizer, filter, config))
                .collect()
        }
    }
}

/// Open and segment one source. An open failure yields an empty, failed
/// result rather than an error.
pub fn segment_file(
    file: &DiscoveredFile,
    recognizer: &dyn TimestampRecognizer,
    filter: &FilterConfig,
    config: &SegmentConfig,
) -> SegmentResult {
    match fs::open_source(&file.path) {
        Ok(reader) => {
            segment::segment_reader(reader, &file.path, &file.origin, recognizer, filter, config)
        }
        Err(source) => {
            let error = ParseError::Open {
                file: file.path.clone(),
                source,
            };
            tracing::warn!(error = %error, "Source skipped");
            SegmentResult {
                blocks: Vec::new(),
                summary: SourceSummary {
                    path: file.path.clone(),
                    failed: true,
                    ..Default::default()
                },
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn discovered(dir: &std::path::Path, name: &str, content: &str) -> DiscoveredFile {
        let path = dir.join(name);
        stdfs::write(&path, content).unwrap();
        DiscoveredFile {
            path,
            origin: name.to_string(),
            size: content.len() as u64,
        }
    }

    #[test]
    fn test_collect_sources_keeps_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<_> = (0..16)
            .map(|i| {
                discovered(
                    dir.path(),
                    &format!("f{i:02}.log"),
                    "2025-01-01 10:00:00,000 same instant\n",
                )
            })
            .collect();

        let results = collect_sources(
            &files,
            &FixedLayout::default(),
            &FilterConfig::default(),
            &SegmentConfig::default(),
            4,
        );

        let paths: Vec<_> = results.iter().map(|r| r.summary.path.clone()).collect();
        let expected: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_open_failure_does_not_affect_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let good = discovered(dir.path(), "good.log", "2025-01-01 10:00:00,000 ok\n");
        let missing = DiscoveredFile {
            path: dir.path().join("gone.log"),
            origin: "gone.log".to_string(),
            size: 0,
        };

        let results = collect_sources(
            &[missing, good],
            &FixedLayout::default(),
            &FilterConfig::default(),
            &SegmentConfig::default(),
            2,
        );

        assert!(matches!(results[0].error, Some(ParseError::Open { .. })));
        assert!(results[0].blocks.is_empty());
        assert!(results[0].summary.failed);
        assert!(results[1].error.is_none());
        assert_eq!(results[1].blocks.len(), 1);
    }

    #[test]
    fn test_run_merge_records_failed_source_as_warning() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logs");
        stdfs::create_dir(&input).unwrap();
        stdfs::write(
            input.join("a.log"),
            format!("2025-01-01 10:00:00,000 ok\n{}\n", "x".repeat(2048)),
        )
        .unwrap();

        let mut request = MergeRequest::new(
            input,
            dir.path().join("out.log"),
            FilterConfig::default(),
        );
        request.segment.max_line_bytes = 1024;

        let summary = run_merge(&request).unwrap();
        assert_eq!(summary.sources, 1);
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(
            stdfs::read_to_string(dir.path().join("out.log")).unwrap(),
            "2025-01-01 10:00:00,000 [a.log] ok\n"
        );
    }
}
