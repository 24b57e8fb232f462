// Fixed-width word decoding.
//
// A "word" is a group of 1-4 raw bytes read from the stream, carrying both
// an unsigned and a two's-complement signed interpretation. Decoding is a
// pure function of the bytes, the width, and the endianness.

use std::fmt;

// ---------------------------------------------------------------------------
// Width
// ---------------------------------------------------------------------------

/// Word width in bytes (1, 2, 3, or 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Width {
    W8,
    W16,
    W24,
    W32,
}

impl Width {
    /// Construct from a bit-count token (8, 16, 24, or 32).
    pub fn from_bits(bits: u32) -> Option<Width> {
        match bits {
            8 => Some(Width::W8),
            16 => Some(Width::W16),
            24 => Some(Width::W24),
            32 => Some(Width::W32),
            _ => None,
        }
    }

    /// Number of bytes per word.
    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W24 => 3,
            Width::W32 => 4,
        }
    }

    /// Number of bits per word.
    #[inline]
    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Exclusive upper bound for symbol-map indices at this width (`256^W`).
    #[inline]
    pub fn index_limit(self) -> u64 {
        1u64 << self.bits()
    }

    /// Hex digits needed to render one word (`2W`).
    #[inline]
    pub fn hex_digits(self) -> usize {
        self.bytes() * 2
    }
}

impl Default for Width {
    fn default() -> Self {
        Width::W8
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// ---------------------------------------------------------------------------
// Endianness
// ---------------------------------------------------------------------------

/// Byte order of words in the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endianness {
    /// First byte is least significant (default).
    #[default]
    Little,
    /// First byte is most significant.
    Big,
}

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// A decoded word: the same `8W` bits under both interpretations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    /// Unsigned interpretation.
    pub u: u64,
    /// Two's-complement signed interpretation at width `8W`.
    pub s: i64,
}

/// Decode exactly `width.bytes()` raw bytes into a [`Word`].
///
/// Little-endian: byte `i` contributes `byte[i] << (8*i)`. Big-endian:
/// bytes are shifted in MSB-first. The signed value is the sign extension
/// of the unsigned value at the word's bit width.
#[inline]
pub fn decode(bytes: &[u8], width: Width, endianness: Endianness) -> Word {
    debug_assert_eq!(bytes.len(), width.bytes());

    let mut u: u64 = 0;
    match endianness {
        Endianness::Little => {
            for (i, &b) in bytes.iter().enumerate() {
                u |= u64::from(b) << (8 * i);
            }
        }
        Endianness::Big => {
            for &b in bytes {
                u = (u << 8) | u64::from(b);
            }
        }
    }

    let sign_bit = 1u64 << (width.bits() - 1);
    let s = if u >= sign_bit {
        u as i64 - (1i64 << width.bits())
    } else {
        u as i64
    };

    Word { u, s }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_tokens() {
        assert_eq!(Width::from_bits(8), Some(Width::W8));
        assert_eq!(Width::from_bits(16), Some(Width::W16));
        assert_eq!(Width::from_bits(24), Some(Width::W24));
        assert_eq!(Width::from_bits(32), Some(Width::W32));
        assert_eq!(Width::from_bits(0), None);
        assert_eq!(Width::from_bits(64), None);
    }

    #[test]
    fn index_limits() {
        assert_eq!(Width::W8.index_limit(), 256);
        assert_eq!(Width::W16.index_limit(), 65536);
        assert_eq!(Width::W24.index_limit(), 1 << 24);
        assert_eq!(Width::W32.index_limit(), 1 << 32);
    }

    #[test]
    fn little_endian_two_bytes() {
        let w = decode(&[0x01, 0x02], Width::W16, Endianness::Little);
        assert_eq!(w.u, 0x0201);
    }

    #[test]
    fn big_endian_two_bytes() {
        let w = decode(&[0x01, 0x02], Width::W16, Endianness::Big);
        assert_eq!(w.u, 0x0102);
    }

    #[test]
    fn sign_extension_width_1() {
        assert_eq!(decode(&[0xFF], Width::W8, Endianness::Little).s, -1);
        assert_eq!(decode(&[0x7F], Width::W8, Endianness::Little).s, 127);
        assert_eq!(decode(&[0x80], Width::W8, Endianness::Little).s, -128);
    }

    #[test]
    fn sign_extension_width_2() {
        let w = decode(&[0xFF, 0xFF], Width::W16, Endianness::Little);
        assert_eq!(w.u, 0xFFFF);
        assert_eq!(w.s, -1);
    }

    #[test]
    fn sign_extension_width_4() {
        let w = decode(&[0x00, 0x00, 0x00, 0x80], Width::W32, Endianness::Little);
        assert_eq!(w.u, 0x8000_0000);
        assert_eq!(w.s, -(1i64 << 31));
    }

    #[test]
    fn positive_values_match_both_ways() {
        let w = decode(&[0x34, 0x12, 0x00], Width::W24, Endianness::Little);
        assert_eq!(w.u, 0x1234);
        assert_eq!(w.s, 0x1234);
    }

    #[test]
    fn endianness_symmetry_width_3() {
        let le = decode(&[0xAA, 0xBB, 0xCC], Width::W24, Endianness::Little);
        let be = decode(&[0xCC, 0xBB, 0xAA], Width::W24, Endianness::Big);
        assert_eq!(le.u, be.u);
        assert_eq!(le.u, 0xCCBBAA);
    }
}
