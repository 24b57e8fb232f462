// Candidate ledger: the streaming multi-candidate match state machine.
//
// One decoded word drives one step. Every live candidate is tested against
// the delta at its own position, measured from its *anchor* word (the first
// word of the candidate), not from the previous step. Either interpretation
// may satisfy a step: unsigned anchor + delta == unsigned word, or signed
// anchor + delta == signed word. Arithmetic wraps; nothing here is fatal.
//
// Step order matters: advance/prune runs first, then at most one spawn from
// the previous word, then the completion sweep. A single-delta pattern can
// spawn and complete within the same step.

use crate::pattern::DiffPattern;
use crate::word::Word;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A completed match: the anchor offset plus every recorded word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Stream offset of the anchor (first) word.
    pub anchor_offset: u64,
    /// Unsigned interpretation of each matched word, anchor first.
    pub words_u: Vec<u64>,
    /// Signed interpretation of each matched word, anchor first.
    pub words_s: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// One in-flight partial match.
#[derive(Debug, Clone)]
struct Candidate {
    anchor_offset: u64,
    /// Count of deltas matched so far; starts at 1 on spawn.
    position: usize,
    first_u: u64,
    first_s: i64,
    recorded_u: Vec<u64>,
    recorded_s: Vec<i64>,
}

impl Candidate {
    fn new(anchor_offset: u64, first: Word, second: Word, capacity: usize) -> Candidate {
        let mut recorded_u = Vec::with_capacity(capacity);
        let mut recorded_s = Vec::with_capacity(capacity);
        recorded_u.push(first.u);
        recorded_u.push(second.u);
        recorded_s.push(first.s);
        recorded_s.push(second.s);
        Candidate {
            anchor_offset,
            position: 1,
            first_u: first.u,
            first_s: first.s,
            recorded_u,
            recorded_s,
        }
    }

    /// Anchor-relative continuation test for the delta at `position`.
    #[inline]
    fn continues(&self, delta: i64, word: Word) -> bool {
        (self.first_u as i64).wrapping_add(delta) == word.u as i64
            || self.first_s.wrapping_add(delta) == word.s
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The collection of live candidates plus the per-word step logic.
///
/// Feed words in stream order with [`Ledger::step`]; completed matches are
/// pushed to the sink in the order they complete. The first word only seeds
/// the previous-word state.
#[derive(Debug)]
pub struct Ledger {
    pattern: DiffPattern,
    /// Require the anchor's unsigned value to equal the pattern reference.
    exact: bool,
    candidates: Vec<Candidate>,
    prev: Option<Word>,
}

impl Ledger {
    pub fn new(pattern: DiffPattern, exact: bool) -> Ledger {
        Ledger {
            pattern,
            exact,
            candidates: Vec::new(),
            prev: None,
        }
    }

    /// Number of live candidates.
    pub fn live(&self) -> usize {
        self.candidates.len()
    }

    /// Consume one decoded word at stream offset `offset` (the offset of the
    /// word's first byte). `word_len` is the word size in bytes, used to
    /// place the anchor of a fresh spawn. Completions are pushed to `sink`.
    pub fn step(&mut self, word: Word, offset: u64, word_len: u64, sink: &mut impl FnMut(MatchRecord)) {
        let deltas = self.pattern.deltas();

        let Some(prev) = self.prev else {
            self.prev = Some(word);
            return;
        };

        // Advance or prune in-flight candidates.
        self.candidates.retain_mut(|c| {
            if !c.continues(deltas[c.position], word) {
                return false;
            }
            c.position += 1;
            c.recorded_u.push(word.u);
            c.recorded_s.push(word.s);
            true
        });

        // Spawn from the previous word, at most once per offset.
        let may_spawn = (prev.u as i64).wrapping_add(deltas[0]) == word.u as i64
            || prev.s.wrapping_add(deltas[0]) == word.s;
        if may_spawn && (!self.exact || prev.u as i64 == self.pattern.reference()) {
            self.candidates.push(Candidate::new(
                offset - word_len,
                prev,
                word,
                deltas.len() + 1,
            ));
        }

        // Sweep completions. Completed candidates are always removed, so a
        // match is reported exactly once.
        let mut i = 0;
        while i < self.candidates.len() {
            if self.candidates[i].position >= deltas.len() {
                let done = self.candidates.swap_remove(i);
                sink(MatchRecord {
                    anchor_offset: done.anchor_offset,
                    words_u: done.recorded_u,
                    words_s: done.recorded_s,
                });
            } else {
                i += 1;
            }
        }

        self.prev = Some(word);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::DiffPattern;

    fn word(u: u64, s: i64) -> Word {
        Word { u, s }
    }

    fn unsigned(u: u64) -> Word {
        word(u, u as i64)
    }

    /// Run a width-1 word sequence through a fresh ledger.
    fn run(pattern: DiffPattern, exact: bool, stream: &[u8]) -> Vec<MatchRecord> {
        let mut ledger = Ledger::new(pattern, exact);
        let mut out = Vec::new();
        for (i, &b) in stream.iter().enumerate() {
            let w = crate::word::decode(
                &[b],
                crate::word::Width::W8,
                crate::word::Endianness::Little,
            );
            ledger.step(w, i as u64, 1, &mut |m| out.push(m));
        }
        out
    }

    #[test]
    fn ascending_pattern_matches_at_anchor() {
        let p = DiffPattern::from_values(0, &[10, 20, 30]).unwrap();
        let matches = run(p, false, &[5, 15, 25, 35]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].anchor_offset, 0);
        assert_eq!(matches[0].words_u, vec![5, 15, 25, 35]);
    }

    #[test]
    fn match_found_mid_stream() {
        let p = DiffPattern::from_values(0, &[1, 2, 3]).unwrap();
        let matches = run(p, false, &[9, 9, 40, 41, 42, 43, 9]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].anchor_offset, 2);
    }

    #[test]
    fn deltas_measured_from_anchor_not_previous_word() {
        // Pattern wants +10 then +10 from the anchor. A stream whose
        // consecutive differences are both 10 but whose second word strays
        // from anchor+10 must not match.
        let p = DiffPattern::from_values(0, &[10, 10]).unwrap();
        assert_eq!(run(p.clone(), false, &[5, 15, 15]).len(), 1);
        // 5,15,25 has step-to-step differences 10,10 but 25 != 5 + 10.
        assert!(run(p, false, &[5, 15, 25]).is_empty());
    }

    #[test]
    fn failed_continuation_discards_candidate() {
        let p = DiffPattern::from_values(0, &[10, 20, 30]).unwrap();
        assert!(run(p, false, &[5, 15, 26, 35]).is_empty());
    }

    #[test]
    fn overlapping_candidates_tracked_independently() {
        // Constant stream with a zero-delta pattern: every adjacent pair
        // spawns, every candidate completes two steps later.
        let p = DiffPattern::from_values(0, &[0, 0]).unwrap();
        let matches = run(p, false, &[7, 7, 7, 7, 7]);
        let anchors: Vec<u64> = matches.iter().map(|m| m.anchor_offset).collect();
        assert_eq!(anchors, vec![0, 1, 2]);
    }

    #[test]
    fn single_delta_spawn_completes_same_step() {
        let p = DiffPattern::from_values(0, &[1]).unwrap();
        let matches = run(p, false, &[4, 5, 6]);
        let anchors: Vec<u64> = matches.iter().map(|m| m.anchor_offset).collect();
        assert_eq!(anchors, vec![0, 1]);
    }

    #[test]
    fn completed_candidate_reported_once() {
        let p = DiffPattern::from_values(0, &[1]).unwrap();
        let mut ledger = Ledger::new(p, false);
        let mut out = Vec::new();
        for (i, &b) in [10u8, 11, 11, 11].iter().enumerate() {
            ledger.step(unsigned(b as u64), i as u64, 1, &mut |m| out.push(m));
        }
        // 10->11 matches once; the later 11->11 pairs do not.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].anchor_offset, 0);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn exact_mode_gates_spawn_on_reference() {
        let p = DiffPattern::from_values(5, &[15, 25]).unwrap();
        // Same deltas anchored at 6: spawn-qualifying but wrong anchor.
        assert!(run(p.clone(), true, &[6, 16, 26]).is_empty());
        // Anchored at 5: reported.
        let matches = run(p.clone(), true, &[5, 15, 25]);
        assert_eq!(matches.len(), 1);
        // Without exact mode the 6-anchored variant matches too.
        assert_eq!(run(p, false, &[6, 16, 26]).len(), 1);
    }

    #[test]
    fn signed_interpretation_can_satisfy_a_step() {
        // Width 1: byte 0xFE is u=254, s=-2. Delta -7 from anchor 5 is
        // only reachable through the signed side.
        let p = DiffPattern::from_values(5, &[-2]).unwrap();
        let matches = run(p, false, &[5, 0xFE]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].words_s, vec![5, -2]);
        assert_eq!(matches[0].words_u, vec![5, 254]);
    }

    #[test]
    fn positions_stay_in_bounds() {
        let p = DiffPattern::from_values(0, &[0, 0, 0, 0]).unwrap();
        let n = p.len();
        let mut ledger = Ledger::new(p, false);
        let mut out = Vec::new();
        for i in 0..64u64 {
            ledger.step(unsigned(3), i, 1, &mut |m| out.push(m));
            for c in &ledger.candidates {
                assert!(c.position >= 1 && c.position < n);
            }
        }
        assert!(!out.is_empty());
    }

    #[test]
    fn first_word_only_seeds_previous_state() {
        let p = DiffPattern::from_values(0, &[0]).unwrap();
        let mut ledger = Ledger::new(p, false);
        let mut out = Vec::new();
        ledger.step(unsigned(9), 0, 1, &mut |m| out.push(m));
        assert!(out.is_empty());
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn idempotent_across_runs() {
        let p = DiffPattern::from_values(0, &[1, 2]).unwrap();
        let stream: Vec<u8> = (0..128u32).map(|i| (i * 37 % 251) as u8).collect();
        let a = run(p.clone(), false, &stream);
        let b = run(p, false, &stream);
        assert_eq!(a, b);
    }
}
