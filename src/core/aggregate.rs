// LogMixer - core/aggregate.rs
//
// Cross-source merge. The only place where blocks from different sources
// interleave.
//
// Ordering contract: ascending by timestamp, stable. Blocks without a
// timestamp compare lowest. Ties keep insertion order, and insertion order
// is source discovery order, so output is reproducible as long as
// discovery is deterministic.
//
// Everything is materialised before sorting. For inputs that outgrow memory
// the per-source lists (already ordered when each source is monotonic) could
// instead be merged lazily through a min-heap keyed on (timestamp, source
// index).

use crate::core::model::MessageBlock;

/// Concatenate per-source block lists, in the given order, and sort.
pub fn aggregate<I>(per_source: I) -> Vec<MessageBlock>
where
    I: IntoIterator<Item = Vec<MessageBlock>>,
{
    let mut blocks: Vec<MessageBlock> = Vec::new();
    for source_blocks in per_source {
        blocks.extend(source_blocks);
    }
    sort_blocks(&mut blocks);
    blocks
}

/// Stable in-place sort by timestamp.
pub fn sort_blocks(blocks: &mut [MessageBlock]) {
    // `sort_by_key` is a stable merge sort; `Option` orders `None` first.
    blocks.sort_by_key(|b| b.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;

    fn block(ts: Option<&str>, text: &str) -> MessageBlock {
        MessageBlock {
            timestamp: ts.map(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()),
            text: text.to_string(),
        }
    }

    fn texts(blocks: &[MessageBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_orders_by_timestamp() {
        let merged = aggregate(vec![vec![
            block(Some("2025-01-01 10:00:02,000"), "T2\n"),
            block(Some("2025-01-01 10:00:01,000"), "T1\n"),
            block(Some("2025-01-01 10:00:03,000"), "T3\n"),
        ]]);
        assert_eq!(texts(&merged), vec!["T1\n", "T2\n", "T3\n"]);
    }

    #[test]
    fn test_interleaves_sources() {
        let a = vec![
            block(Some("2025-01-01 10:00:00,000"), "a1\n"),
            block(Some("2025-01-01 10:00:02,000"), "a2\n"),
        ];
        let b = vec![
            block(Some("2025-01-01 10:00:01,000"), "b1\n"),
            block(Some("2025-01-01 10:00:03,000"), "b2\n"),
        ];
        let merged = aggregate(vec![a, b]);
        assert_eq!(texts(&merged), vec!["a1\n", "b1\n", "a2\n", "b2\n"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let ts = Some("2025-01-01 10:00:00,000");
        let merged = aggregate(vec![
            vec![block(ts, "first-source\n")],
            vec![block(ts, "second-source\n")],
            vec![block(ts, "third-source\n")],
        ]);
        assert_eq!(
            texts(&merged),
            vec!["first-source\n", "second-source\n", "third-source\n"]
        );
    }

    #[test]
    fn test_untimed_blocks_sort_first_and_stay_stable() {
        let merged = aggregate(vec![
            vec![
                block(Some("2025-01-01 10:00:00,000"), "timed\n"),
                block(None, "untimed-a\n"),
            ],
            vec![block(None, "untimed-b\n")],
        ]);
        assert_eq!(texts(&merged), vec!["untimed-a\n", "untimed-b\n", "timed\n"]);
    }

    #[test]
    fn test_sort_preserves_line_total() {
        let merged = aggregate(vec![
            vec![block(Some("2025-01-01 10:00:05,000"), "x\n y\n")],
            vec![block(Some("2025-01-01 10:00:01,000"), "z\n")],
        ]);
        let lines: usize = merged.iter().map(MessageBlock::line_count).sum();
        assert_eq!(lines, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(Vec::<Vec<MessageBlock>>::new()).is_empty());
    }
}
