// LogMixer - core/export.rs
//
// Writes the merged block collection. Block text is written verbatim with
// no separators; every block is already newline-terminated.

use crate::core::model::MessageBlock;
use crate::util::error::ExportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write blocks in collection order to any writer and flush it.
///
/// Returns the number of bytes written.
pub fn write_blocks<W: Write>(
    blocks: &[MessageBlock],
    mut writer: W,
    export_path: &Path,
) -> Result<u64, ExportError> {
    let io_err = |source| ExportError::Io {
        path: export_path.to_path_buf(),
        source,
    };

    let mut written: u64 = 0;
    for block in blocks {
        writer.write_all(block.text.as_bytes()).map_err(io_err)?;
        written += block.text.len() as u64;
    }
    writer.flush().map_err(io_err)?;
    Ok(written)
}

/// Create (or truncate) `path` and write the blocks to it.
///
/// An empty collection still produces an empty file.
pub fn write_output_file(path: &Path, blocks: &[MessageBlock]) -> Result<u64, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_blocks(blocks, BufWriter::new(file), path)?;

    tracing::debug!(
        path = %path.display(),
        blocks = blocks.len(),
        bytes = written,
        "Output written"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn block(text: &str) -> MessageBlock {
        MessageBlock {
            timestamp: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_write_blocks_verbatim() {
        let blocks = vec![
            block("2025-01-01 10:00:00,000 First log line\n"),
            block("2025-01-01 10:01:00,000 Second log line\n"),
        ];
        let mut buf = Vec::new();
        let written = write_blocks(&blocks, &mut buf, Path::new("out.log")).unwrap();

        let expected =
            "2025-01-01 10:00:00,000 First log line\n2025-01-01 10:01:00,000 Second log line\n";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
        assert_eq!(written, expected.len() as u64);
    }

    #[test]
    fn test_write_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_output.log");
        let blocks = vec![block("a\n"), block("b\n  c\n")];

        write_output_file(&path, &blocks).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n  c\n");
    }

    #[test]
    fn test_empty_collection_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.log");
        let written = write_output_file(&path, &[]).unwrap();
        assert_eq!(written, 0);
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_create_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");
        let result = write_output_file(&path, &[block("x\n")]);
        assert!(matches!(result, Err(ExportError::Create { .. })));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let result = write_blocks(&[block("x\n")], FailingWriter, Path::new("out.log"));
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
