// LogMixer - core/segment.rs
//
// Splits one source's line stream into message blocks.
// Core layer: accepts BufRead objects, never touches the filesystem directly.
//
// Single pass, no lookahead: every line either opens a new block (it starts
// with a recognised timestamp) or is appended to the block in progress.
// Lines that precede the first recognised start form a block with no
// timestamp. Each finished block is run through the filter before it is
// kept, so dropped blocks never leave the segmenter.

use crate::core::filter::FilterConfig;
use crate::core::model::{MessageBlock, SourceSummary};
use crate::core::timestamp::TimestampRecognizer;
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::io::{BufRead, Read};
use std::path::Path;

/// Configuration for segmentation.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Lines longer than this abort the rest of the source.
    pub max_line_bytes: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: constants::DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Outcome of segmenting one source.
#[derive(Debug)]
pub struct SegmentResult {
    /// Blocks that survived filtering, in source order.
    pub blocks: Vec<MessageBlock>,

    /// Per-source statistics.
    pub summary: SourceSummary,

    /// Set when the source was aborted. Blocks finished before the failure
    /// are still present in `blocks`.
    pub error: Option<ParseError>,
}

// =============================================================================
// Segmenter (per-source state)
// =============================================================================

/// Per-source accumulation state: the block in progress and its timestamp.
/// Created for one source and consumed by [`Segmenter::finish`].
pub struct Segmenter<'a> {
    origin: &'a str,
    recognizer: &'a dyn TimestampRecognizer,
    filter: &'a FilterConfig,
    buffer: String,
    timestamp: Option<NaiveDateTime>,
    blocks: Vec<MessageBlock>,
    blocks_dropped: usize,
    lines_read: u64,
}

impl<'a> Segmenter<'a> {
    pub fn new(
        origin: &'a str,
        recognizer: &'a dyn TimestampRecognizer,
        filter: &'a FilterConfig,
    ) -> Self {
        Self {
            origin,
            recognizer,
            filter,
            buffer: String::new(),
            timestamp: None,
            blocks: Vec::new(),
            blocks_dropped: 0,
            lines_read: 0,
        }
    }

    /// Feed one line, without its line terminator.
    pub fn push_line(&mut self, line: &str) {
        self.lines_read += 1;

        if let Some(ts) = self.recognizer.recognize(line) {
            self.finalize();
            self.timestamp = Some(ts);
            let decorated = decorate(line, self.origin, self.recognizer.width());
            self.buffer.push_str(&decorated);
        } else {
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
    }

    /// Finalise the trailing block and return the kept blocks together with
    /// `(blocks_dropped, lines_read)`.
    pub fn finish(mut self) -> (Vec<MessageBlock>, usize, u64) {
        self.finalize();
        (self.blocks, self.blocks_dropped, self.lines_read)
    }

    /// Close the block in progress, if any, applying the filter.
    fn finalize(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if self.filter.should_drop(&text) {
            tracing::trace!(origin = self.origin, "Block dropped by filter");
            self.blocks_dropped += 1;
            return;
        }
        self.blocks.push(MessageBlock {
            timestamp: self.timestamp,
            text,
        });
    }
}

// =============================================================================
// Decoration
// =============================================================================

/// Insert `[origin]` after the timestamp prefix of a block-start line.
///
/// Lines no longer than the prefix are returned unchanged, as are lines
/// whose first token after the timestamp is already a log-file tag, so a
/// merged file can be merged again without gaining a second tag.
pub fn decorate<'l>(line: &'l str, origin: &str, width: usize) -> Cow<'l, str> {
    if line.len() <= width || !line.is_char_boundary(width) {
        return Cow::Borrowed(line);
    }
    let (prefix, rest) = line.split_at(width);
    if has_origin_tag(rest) {
        return Cow::Borrowed(line);
    }
    if rest.starts_with(char::is_whitespace) {
        Cow::Owned(format!("{prefix} [{origin}]{rest}"))
    } else {
        Cow::Owned(format!("{prefix} [{origin}] {rest}"))
    }
}

/// True if `rest` begins with ` [<name>.log]` (or another log extension)
/// followed by whitespace or end of line.
fn has_origin_tag(rest: &str) -> bool {
    let Some(inner) = rest.strip_prefix(" [") else {
        return false;
    };
    let Some(close) = inner.find(']') else {
        return false;
    };
    let (name, after) = (&inner[..close], &inner[close + 1..]);
    !name.is_empty()
        && constants::LOG_EXTENSIONS
            .iter()
            .any(|ext| name.len() > ext.len() && name.ends_with(ext))
        && (after.is_empty() || after.starts_with(char::is_whitespace))
}

// =============================================================================
// Stream segmentation
// =============================================================================

/// Segment a whole line stream.
///
/// `file_path` is used for diagnostics only; `origin` is what gets inserted
/// into block-start lines. CRLF terminators are normalised to LF and invalid
/// UTF-8 is replaced lossily. A read error or an over-long line stops the
/// scan; every complete line read before it is still segmented and the
/// trailing block is finalised.
pub fn segment_reader<R: BufRead>(
    mut reader: R,
    file_path: &Path,
    origin: &str,
    recognizer: &dyn TimestampRecognizer,
    filter: &FilterConfig,
    config: &SegmentConfig,
) -> SegmentResult {
    tracing::debug!(file = %file_path.display(), origin, "Segmentation started");

    let mut segmenter = Segmenter::new(origin, recognizer, filter);
    let mut error = None;
    let limit = config.max_line_bytes as u64 + 1;
    let mut buf: Vec<u8> = Vec::new();
    let mut line_number: u64 = 0;

    loop {
        buf.clear();
        let read = match (&mut reader).take(limit).read_until(b'\n', &mut buf) {
            Ok(n) => n,
            Err(e) => {
                error = Some(ParseError::Io {
                    file: file_path.to_path_buf(),
                    line_number: line_number + 1,
                    source: e,
                });
                break;
            }
        };
        if read == 0 {
            break;
        }
        line_number += 1;

        if buf.last() != Some(&b'\n') && buf.len() as u64 >= limit {
            error = Some(ParseError::LineTooLong {
                file: file_path.to_path_buf(),
                line_number,
                max_bytes: config.max_line_bytes,
            });
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        segmenter.push_line(&String::from_utf8_lossy(&buf));
    }

    let (blocks, blocks_dropped, lines_read) = segmenter.finish();

    if let Some(ref e) = error {
        tracing::warn!(file = %e.file().display(), error = %e, "Source aborted");
    }
    tracing::debug!(
        file = %file_path.display(),
        lines = lines_read,
        kept = blocks.len(),
        dropped = blocks_dropped,
        "Segmentation complete"
    );

    SegmentResult {
        summary: SourceSummary {
            path: file_path.to_path_buf(),
            lines_read,
            blocks_kept: blocks.len(),
            blocks_dropped,
            failed: error.is_some(),
        },
        blocks,
        error,
    }
}
