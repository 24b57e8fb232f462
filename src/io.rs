// File-oriented helpers for scanning.
//
// Thin wrappers over the engine that handle opening, positioning, and
// buffering. Seekable inputs are positioned with `seek`; pipes are advanced
// by reading and discarding (`skip_bytes`).

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::charmap::CharMap;
use crate::engine::{self, ScanConfig, ScanError};
use crate::ledger::MatchRecord;
use crate::pattern::DiffPattern;

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Open `path` positioned at `config.start_offset`, ready for the engine.
pub fn open_at(path: &Path, config: &ScanConfig) -> io::Result<BufReader<File>> {
    let mut file = File::open(path)?;
    if config.start_offset > 0 {
        file.seek(SeekFrom::Start(config.start_offset))?;
    }
    Ok(BufReader::with_capacity(BUF_SIZE, file))
}

/// Advance a non-seekable reader by `n` bytes, discarding them.
///
/// Returns the number of bytes actually skipped; fewer than `n` means the
/// stream ended inside the skip region.
pub fn skip_bytes<R: Read>(reader: &mut R, n: u64) -> io::Result<u64> {
    io::copy(&mut reader.take(n), &mut io::sink())
}

/// Scan a file for the pattern, collecting every match.
pub fn scan_file(
    path: &Path,
    config: &ScanConfig,
    pattern: &DiffPattern,
) -> Result<Vec<MatchRecord>, ScanError> {
    let mut reader = open_at(path, config)?;
    engine::scan_to_vec(&mut reader, config, pattern)
}

/// Extract printable runs from a file, collecting every run.
pub fn extract_file(
    path: &Path,
    config: &ScanConfig,
    map: &CharMap,
) -> Result<Vec<crate::extract::TextRun>, ScanError> {
    let mut reader = open_at(path, config)?;
    engine::extract_to_vec(&mut reader, config, map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{Endianness, Width};
    use std::io::Cursor;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    #[test]
    fn scan_file_finds_planted_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "input.bin", &[0xAA, 0xAB, 5, 15, 25, 0xAC]);

        let pattern = DiffPattern::from_values(5, &[15, 25]).unwrap();
        let matches = scan_file(&path, &ScanConfig::default(), &pattern).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].anchor_offset, 2);
    }

    #[test]
    fn start_offset_seeks_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        // Pattern occurs twice; seeking past the first leaves only the second.
        let path = write_temp(&dir, "twice.bin", &[5, 15, 0, 0, 5, 15]);

        let pattern = DiffPattern::from_values(5, &[15]).unwrap();
        let cfg = ScanConfig {
            start_offset: 2,
            ..Default::default()
        };
        let matches = scan_file(&path, &cfg, &pattern).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].anchor_offset, 4);
    }

    #[test]
    fn extract_file_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "text.bin", &[0, 1, 9, 0]);

        let mut map = CharMap::new();
        map.insert(0, crate::charmap::MapValue::Char('h'));
        map.insert(1, crate::charmap::MapValue::Char('i'));

        let cfg = ScanConfig {
            width: Width::W8,
            endianness: Endianness::Little,
            ..Default::default()
        };
        let runs = extract_file(&path, &cfg, &map).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "hi");
        assert_eq!(runs[1].start_offset, 3);
    }

    #[test]
    fn skip_bytes_counts() {
        let mut cur = Cursor::new(vec![0u8; 10]);
        assert_eq!(skip_bytes(&mut cur, 4).unwrap(), 4);
        assert_eq!(skip_bytes(&mut cur, 100).unwrap(), 6);
    }

    #[test]
    fn missing_file_is_an_error() {
        let pattern = DiffPattern::from_values(0, &[1]).unwrap();
        let err = scan_file(
            Path::new("/nonexistent/diffscan-test"),
            &ScanConfig::default(),
            &pattern,
        );
        assert!(matches!(err, Err(ScanError::Io(_))));
    }
}
