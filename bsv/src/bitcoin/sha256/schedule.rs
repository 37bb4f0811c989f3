use super::compress::{small_sigma0, small_sigma1};
use super::MessageSchedule;

// Which of the four recurrence terms of a schedule word depend on a varying input word.
const TERM_SIGMA1: u8 = 0b0001; // small_sigma1(w[i - 2])
const TERM_W7: u8 = 0b0010; // w[i - 7]
const TERM_SIGMA0: u8 = 0b0100; // small_sigma0(w[i - 15])
const TERM_W16: u8 = 0b1000; // w[i - 16]

/// A message schedule precomputed for a block in which only some input words vary.
///
/// Each derived word `w[i]` is the sum of four terms taken from earlier words. When a term's
/// source word never changes, its contribution is folded into a constant once, at construction.
/// Completing the schedule for a particular set of varying words then only adds the remaining
/// terms, and only for the derived words that are reached by a varying input at all.
///
/// Construction is a `const fn`, so schedules for fixed padding patterns are built at compile
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialSchedule {
    // Full words where `terms[i] == 0`, otherwise the sum of the constant terms only.
    base: MessageSchedule,
    terms: [u8; 64],
}

impl PartialSchedule {
    /// Precompute the schedule of `block`.
    ///
    /// Bit `n` of `variable` marks input word `n` as varying; its value in `block` is ignored.
    pub const fn new(block: [u32; 16], variable: u16) -> PartialSchedule {
        let mut base = [0u32; 64];
        let mut terms = [0u8; 64];
        let mut varies = [false; 64];

        let mut i = 0;
        while i < 16 {
            varies[i] = variable & (1 << i) != 0;
            base[i] = if varies[i] { 0 } else { block[i] };
            i += 1;
        }
        while i < 64 {
            let mut sum = 0u32;
            let mut mask = 0u8;
            if varies[i - 2] {
                mask |= TERM_SIGMA1;
            } else {
                sum = sum.wrapping_add(small_sigma1(base[i - 2]));
            }
            if varies[i - 7] {
                mask |= TERM_W7;
            } else {
                sum = sum.wrapping_add(base[i - 7]);
            }
            if varies[i - 15] {
                mask |= TERM_SIGMA0;
            } else {
                sum = sum.wrapping_add(small_sigma0(base[i - 15]));
            }
            if varies[i - 16] {
                mask |= TERM_W16;
            } else {
                sum = sum.wrapping_add(base[i - 16]);
            }
            base[i] = sum;
            terms[i] = mask;
            varies[i] = mask != 0;
            i += 1;
        }

        PartialSchedule { base, terms }
    }

    /// The fully expanded schedule of a block with no varying words.
    pub const fn expand(block: [u32; 16]) -> MessageSchedule {
        PartialSchedule::new(block, 0).base
    }

    /// A scratch schedule to be filled with the varying input words and then [completed].
    ///
    /// [completed]: PartialSchedule::complete
    #[inline]
    pub fn schedule(&self) -> MessageSchedule {
        self.base
    }

    /// Derive the words that depend on the varying inputs.
    ///
    /// `w` must have come from [PartialSchedule::schedule] and hold the current values of the
    /// varying input words. Words that do not depend on them are left untouched, so the same
    /// scratch schedule can be completed again after changing only the varying words.
    #[inline]
    pub fn complete(&self, w: &mut MessageSchedule) {
        for i in 16..64 {
            let mask = self.terms[i];
            if mask == 0 {
                continue;
            }
            let mut sum = self.base[i];
            if mask & TERM_SIGMA1 != 0 {
                sum = sum.wrapping_add(small_sigma1(w[i - 2]));
            }
            if mask & TERM_W7 != 0 {
                sum = sum.wrapping_add(w[i - 7]);
            }
            if mask & TERM_SIGMA0 != 0 {
                sum = sum.wrapping_add(small_sigma0(w[i - 15]));
            }
            if mask & TERM_W16 != 0 {
                sum = sum.wrapping_add(w[i - 16]);
            }
            w[i] = sum;
        }
    }

    /// Number of derived words recomputed by each [PartialSchedule::complete].
    pub fn derived_words(&self) -> usize {
        self.terms[16..].iter().filter(|m| **m != 0).count()
    }
}
