// Scan engine: ties word decoding to the candidate ledger and the extractor.
//
// One forward pass over the stream, one decoded word per step. A read that
// returns fewer than a full word is stream exhaustion, never an error; a
// blocking pipe read is just a slow read. The stop offset is a ceiling: the
// loop ends once the next word would finish past it.

use std::io::{self, ErrorKind, Read};

use log::debug;

use crate::charmap::CharMap;
use crate::extract::{StringExtractor, TextRun};
use crate::ledger::{Ledger, MatchRecord};
use crate::pattern::DiffPattern;
use crate::word::{self, Endianness, Width, Word};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Per-run scan parameters.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Word width in bytes.
    pub width: Width,
    /// Byte order of words in the stream.
    pub endianness: Endianness,
    /// Offset the reader is positioned at; offsets in reports are absolute.
    pub start_offset: u64,
    /// Stop before reading a word that would end past this offset.
    pub stop_offset: Option<u64>,
    /// Require a spawning anchor to equal the pattern reference exactly.
    pub exact: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            width: Width::W8,
            endianness: Endianness::Little,
            start_offset: 0,
            stop_offset: None,
            exact: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error during a scan or extraction run.
///
/// Stream exhaustion is normal loop termination and never appears here;
/// nothing that happens per-word is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Word loop
// ---------------------------------------------------------------------------

/// Read one full word, or `None` on exhaustion (including a short read).
fn read_word<R: Read>(
    reader: &mut R,
    width: Width,
    endianness: Endianness,
) -> Result<Option<Word>, ScanError> {
    let mut buf = [0u8; 4];
    let buf = &mut buf[..width.bytes()];
    match reader.read_exact(buf) {
        Ok(()) => Ok(Some(word::decode(buf, width, endianness))),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(ScanError::Io(e)),
    }
}

fn past_ceiling(config: &ScanConfig, next_offset: u64) -> bool {
    match config.stop_offset {
        Some(stop) => next_offset + config.width.bytes() as u64 > stop,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Matching runs
// ---------------------------------------------------------------------------

/// Scan `reader` for the difference pattern, passing each completed match to
/// `sink` in completion order. Returns the number of words consumed.
pub fn scan<R: Read>(
    reader: &mut R,
    config: &ScanConfig,
    pattern: &DiffPattern,
    mut sink: impl FnMut(MatchRecord),
) -> Result<u64, ScanError> {
    let word_len = config.width.bytes() as u64;
    let mut ledger = Ledger::new(pattern.clone(), config.exact);
    let mut offset = config.start_offset;
    let mut words = 0u64;

    loop {
        let Some(word) = read_word(reader, config.width, config.endianness)? else {
            break;
        };
        words += 1;
        ledger.step(word, offset, word_len, &mut sink);
        offset += word_len;
        if past_ceiling(config, offset) {
            break;
        }
    }

    debug!(
        "scan finished: {words} words, {} candidates still live",
        ledger.live()
    );
    Ok(words)
}

/// Scan and collect all matches into a `Vec`.
pub fn scan_to_vec<R: Read>(
    reader: &mut R,
    config: &ScanConfig,
    pattern: &DiffPattern,
) -> Result<Vec<MatchRecord>, ScanError> {
    let mut out = Vec::new();
    scan(reader, config, pattern, |m| out.push(m))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Extraction runs
// ---------------------------------------------------------------------------

/// Decode `reader` into printable runs via `map`, passing each finished run
/// to `sink`. Returns the number of words consumed.
pub fn extract<R: Read>(
    reader: &mut R,
    config: &ScanConfig,
    map: &CharMap,
    mut sink: impl FnMut(TextRun),
) -> Result<u64, ScanError> {
    let word_len = config.width.bytes() as u64;
    let mut extractor = StringExtractor::new(map, config.width);
    let mut offset = config.start_offset;
    let mut words = 0u64;

    loop {
        let Some(word) = read_word(reader, config.width, config.endianness)? else {
            break;
        };
        words += 1;
        if let Some(run) = extractor.push(word.u, offset) {
            sink(run);
        }
        offset += word_len;
        if past_ceiling(config, offset) {
            break;
        }
    }

    if let Some(run) = extractor.finish() {
        sink(run);
    }

    debug!("extraction finished: {words} words");
    Ok(words)
}

/// Extract and collect all runs into a `Vec`.
pub fn extract_to_vec<R: Read>(
    reader: &mut R,
    config: &ScanConfig,
    map: &CharMap,
) -> Result<Vec<TextRun>, ScanError> {
    let mut out = Vec::new();
    extract(reader, config, map, |r| out.push(r))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
