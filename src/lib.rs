//! Diffscan: relative-difference pattern scanning for binary streams.
//!
//! The crate provides:
//! - Fixed-width word decoding with dual signed/unsigned views (`word`)
//! - Difference-pattern construction (`pattern`) and symbol maps (`charmap`)
//! - The streaming multi-candidate matcher (`ledger`)
//! - Printable-run extraction (`extract`)
//! - Stream drivers (`engine`), file helpers (`io`), and an optional CLI
//!   (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use diffscan::engine::{self, ScanConfig};
//! use diffscan::pattern::DiffPattern;
//!
//! // Four bytes, each 10 more than the first.
//! let pattern = DiffPattern::from_values(0, &[10, 20, 30]).unwrap();
//! let mut stream: &[u8] = &[5, 15, 25, 35];
//!
//! let matches = engine::scan_to_vec(&mut stream, &ScanConfig::default(), &pattern).unwrap();
//! assert_eq!(matches[0].anchor_offset, 0);
//! ```

pub mod charmap;
pub mod engine;
pub mod extract;
pub mod io;
pub mod ledger;
pub mod pattern;
pub mod word;

#[cfg(feature = "cli")]
pub mod cli;
