// Difference-pattern construction.
//
// A pattern is an ordered list of signed deltas, each relative to the first
// target value (the reference), never to the previous step. Patterns come
// from literal integers or from a string translated through a symbol map,
// and may be scaled by an integer factor.

use crate::charmap::CharMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error constructing a difference pattern. Fatal before scanning starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("at least one difference value is required")]
    TooFewTargets,

    #[error("pattern string must be at least 2 characters")]
    StringTooShort,

    #[error("unmapped difference string character `{0}`")]
    UnmappedCharacter(char),
}

// ---------------------------------------------------------------------------
// DiffPattern
// ---------------------------------------------------------------------------

/// An immutable difference pattern: a reference value and the deltas every
/// subsequent word must show relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPattern {
    reference: i64,
    deltas: Vec<i64>,
}

impl DiffPattern {
    /// Build from a reference value and the target values that follow it.
    ///
    /// `deltas[i] = targets[i] - reference`. Requires at least one target;
    /// a lone reference yields nothing to match.
    pub fn from_values(reference: i64, targets: &[i64]) -> Result<DiffPattern, PatternError> {
        if targets.is_empty() {
            return Err(PatternError::TooFewTargets);
        }
        let deltas = targets.iter().map(|&t| t.wrapping_sub(reference)).collect();
        Ok(DiffPattern { reference, deltas })
    }

    /// Build from a string, translating each character to its index.
    ///
    /// With a map, every character must have an entry. Without one, the
    /// character's own code point is its index.
    pub fn from_str(s: &str, map: Option<&CharMap>) -> Result<DiffPattern, PatternError> {
        let mut indices = Vec::with_capacity(s.chars().count());
        for c in s.chars() {
            let index = match map {
                Some(m) => m.index_of(c).ok_or(PatternError::UnmappedCharacter(c))?,
                None => c as u64,
            };
            indices.push(index as i64);
        }
        if indices.len() < 2 {
            return Err(PatternError::StringTooShort);
        }

        let reference = indices[0];
        let deltas = indices[1..]
            .iter()
            .map(|&i| i.wrapping_sub(reference))
            .collect();
        Ok(DiffPattern { reference, deltas })
    }

    /// Multiply every delta and the reference by `scale`.
    ///
    /// The reference is scaled too so the exact-anchor check sees the same
    /// units as the deltas. A scale of 1 is the identity.
    pub fn scaled(mut self, scale: i64) -> DiffPattern {
        if scale != 1 {
            self.reference = self.reference.wrapping_mul(scale);
            for d in &mut self.deltas {
                *d = d.wrapping_mul(scale);
            }
        }
        self
    }

    /// The (scaled) reference value, used by the exact-anchor constraint.
    #[inline]
    pub fn reference(&self) -> i64 {
        self.reference
    }

    /// The ordered deltas, all relative to the reference.
    #[inline]
    pub fn deltas(&self) -> &[i64] {
        &self.deltas
    }

    /// Number of deltas (`N - 1` for `N` target values).
    #[inline]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
