// String extraction: decode the stream into printable runs via the symbol map.
//
// Each word's unsigned value is looked up as a map index. Consecutive hits
// accumulate into one run; the first miss flushes it. Mapped-but-unprintable
// entries render as the index in brackets, zero-padded to the word's hex
// width. The run buffer is scoped to a single run and handed to the flush
// whole; a full buffer silently drops further appends.

use std::fmt::Write as _;

use crate::charmap::{CharMap, MapValue};
use crate::word::Width;

/// Default per-run buffer capacity in bytes.
pub const DEFAULT_RUN_CAPACITY: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One assembled printable run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Stream offset of the run's first word.
    pub start_offset: u64,
    /// The assembled text, already rendered (literal chars or `[hex]`).
    pub text: String,
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Accumulates map hits into printable runs.
///
/// Feed each decoded unsigned word with [`StringExtractor::push`]; call
/// [`StringExtractor::finish`] at stream end to flush a pending run.
#[derive(Debug)]
pub struct StringExtractor<'a> {
    map: &'a CharMap,
    width: Width,
    capacity: usize,
    run: Option<TextRun>,
}

impl<'a> StringExtractor<'a> {
    pub fn new(map: &'a CharMap, width: Width) -> StringExtractor<'a> {
        Self::with_capacity(map, width, DEFAULT_RUN_CAPACITY)
    }

    pub fn with_capacity(map: &'a CharMap, width: Width, capacity: usize) -> StringExtractor<'a> {
        StringExtractor {
            map,
            width,
            capacity,
            run: None,
        }
    }

    /// Consume one word. Returns a finished run when this word ends one.
    pub fn push(&mut self, index: u64, offset: u64) -> Option<TextRun> {
        let Some(value) = self.map.value_of(index) else {
            return self.run.take();
        };

        let run = self.run.get_or_insert_with(|| TextRun {
            start_offset: offset,
            text: String::new(),
        });

        match value {
            MapValue::Char(c) if (' '..='~').contains(&c) => {
                if run.text.len() + c.len_utf8() <= self.capacity {
                    run.text.push(c);
                }
            }
            // Unprintable or sentinel: bracketed hex of the index.
            MapValue::Char(_) | MapValue::Special => {
                let rendered_len = self.width.hex_digits() + 2;
                if run.text.len() + rendered_len <= self.capacity {
                    let _ = write!(run.text, "[{index:0digits$x}]", digits = self.width.hex_digits());
                }
            }
        }
        None
    }

    /// Flush the pending run at stream end, if any.
    pub fn finish(&mut self) -> Option<TextRun> {
        self.run.take()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
