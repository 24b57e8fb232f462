// Symbol map: bidirectional table between a word index and a character.
//
// Loaded once from a text file before any scanning starts and read-only
// afterwards. Lines have the form `INDEX VALUE` where INDEX is a decimal or
// 0x-prefixed hex integer below `256^W`, and VALUE is the token `space`, the
// token `special`, or exactly one character. Later lines win on duplicate
// indices or characters; duplicates are advisory warnings, not errors.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::warn;

use crate::word::Width;

// ---------------------------------------------------------------------------
// Map values
// ---------------------------------------------------------------------------

/// The value side of a symbol-map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapValue {
    /// A concrete character (the `space` token maps to `' '`).
    Char(char),
    /// The `special` token: a known index with no printable character.
    Special,
}

impl MapValue {
    /// The character, if this entry has one.
    pub fn as_char(self) -> Option<char> {
        match self {
            MapValue::Char(c) => Some(c),
            MapValue::Special => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error loading a symbol-map file. All variants abort the load.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("I/O error reading symbol map: {0}")]
    Io(#[from] io::Error),

    #[error("badly-formatted line {line}: `{text}`")]
    BadLine { line: usize, text: String },

    #[error(
        "invalid mapping value `{text}` on line {line} (must be `space`, `special`, or a single character)"
    )]
    BadValue { line: usize, text: String },

    #[error("invalid mapping index `{text}` on line {line}")]
    BadIndex { line: usize, text: String },

    #[error("mapping index {index} on line {line} out of range (must be below {limit})")]
    IndexOutOfRange { line: usize, index: i64, limit: u64 },
}

// ---------------------------------------------------------------------------
// CharMap
// ---------------------------------------------------------------------------

/// Bidirectional index <-> character table.
///
/// Both directions are plain hash maps built at load time; inserting in file
/// order means the later of two duplicate lines is authoritative for lookups
/// in both directions.
#[derive(Debug, Default, Clone)]
pub struct CharMap {
    by_index: HashMap<u64, MapValue>,
    by_char: HashMap<char, u64>,
}

impl CharMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a map from a file path. `width` bounds the valid index range.
    pub fn load(path: &Path, width: Width, quiet: bool) -> Result<CharMap, MapError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), width, quiet)
    }

    /// Parse map lines from any buffered reader.
    pub fn parse<R: BufRead>(reader: R, width: Width, quiet: bool) -> Result<CharMap, MapError> {
        let limit = width.index_limit();
        let mut map = CharMap::new();

        for (num, line) in reader.lines().enumerate() {
            let num = num + 1;
            let line = line?;
            let text = line.trim_start_matches(' ').trim_end_matches(['\r', '\n']);

            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let (left, right) = match text.split_once(' ') {
                Some((l, r)) => (l, r.trim_start_matches(' ')),
                None => ("", ""),
            };
            if left.is_empty() || right.is_empty() {
                return Err(MapError::BadLine {
                    line: num,
                    text: text.to_string(),
                });
            }

            let value = match right {
                "space" => MapValue::Char(' '),
                "special" => MapValue::Special,
                _ => {
                    let mut chars = right.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => MapValue::Char(c),
                        _ => {
                            return Err(MapError::BadValue {
                                line: num,
                                text: right.to_string(),
                            });
                        }
                    }
                }
            };

            let index = parse_int(left).ok_or_else(|| MapError::BadIndex {
                line: num,
                text: left.to_string(),
            })?;
            if index < 0 || index as u64 >= limit {
                return Err(MapError::IndexOutOfRange {
                    line: num,
                    index,
                    limit,
                });
            }
            let index = index as u64;

            if !quiet {
                if let Some(c) = value.as_char() {
                    if let Some(&prev) = map.by_char.get(&c) {
                        warn!("mapping value `{c}` on line {num} is already assigned to index {prev}");
                    }
                }
                if let Some(prev) = map.by_index.get(&index) {
                    let shown = prev.as_char().unwrap_or('?');
                    warn!("mapping index {index} on line {num} is already assigned to value `{shown}`");
                }
            }

            map.insert(index, value);
        }

        Ok(map)
    }

    /// Insert an entry, overwriting both directions.
    pub fn insert(&mut self, index: u64, value: MapValue) {
        self.by_index.insert(index, value);
        if let MapValue::Char(c) = value {
            self.by_char.insert(c, index);
        }
    }

    /// Look up the value assigned to `index`, if any.
    pub fn value_of(&self, index: u64) -> Option<MapValue> {
        self.by_index.get(&index).copied()
    }

    /// Look up the index assigned to `c`, if any.
    pub fn index_of(&self, c: char) -> Option<u64> {
        self.by_char.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Integer parsing (decimal or 0x hex, optional sign)
// ---------------------------------------------------------------------------

/// Parse a decimal or `0x`-prefixed hexadecimal integer, with optional sign.
pub(crate) fn parse_int(s: &str) -> Option<i64> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    Some(if neg { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
