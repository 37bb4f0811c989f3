//! Compact ("nBits") proof-of-work targets and the test of a hash against them.

use crate::bitcoin::sha256::HashState;
use crate::bitcoin::Hash;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// The compact encoding of the difficulty 1 target.
pub const DIFFICULTY_1_BITS: u32 = 0x1d00ffff;

/// A proof-of-work target in its compact 32-bit encoding.
///
/// The encoding is an exponent byte followed by a three byte mantissa, and the target value is
/// `mantissa * 256^(exponent - 3)`. The top bit of the mantissa is a sign bit; negative targets,
/// and targets that do not fit in 256 bits, are rejected by [CompactTarget::from_bits].
///
/// Because only three bytes are significant, the expansion into eight big-endian 32-bit words
/// has at most two non-zero words. The target keeps that expansion and the position of its
/// leading non-zero word so that a hash can be tested without a full 256-bit comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactTarget {
    bits: u32,
    words: [u32; 8],
    lead: usize,
}

impl CompactTarget {
    /// Decode a compact target.
    pub fn from_bits(bits: u32) -> Result<CompactTarget> {
        let exponent = (bits >> 24) as usize;
        let mantissa = bits & 0x007f_ffff;
        if mantissa != 0 && bits & 0x0080_0000 != 0 {
            return Err(Error::NegativeTarget(bits));
        }
        if mantissa != 0
            && (exponent > 34
                || (mantissa > 0xff && exponent > 33)
                || (mantissa > 0xffff && exponent > 32))
        {
            return Err(Error::TargetOverflow(bits));
        }

        let mut bytes = [0u8; 32];
        if exponent <= 3 {
            let value = mantissa >> (8 * (3 - exponent));
            bytes[28..].copy_from_slice(&value.to_be_bytes());
        } else {
            let mantissa_bytes = mantissa.to_be_bytes();
            for (k, byte) in mantissa_bytes[1..].iter().enumerate() {
                // bytes that would land above bit 255 are zero, the overflow check made sure
                if let Some(pos) = (32 + k).checked_sub(exponent) {
                    bytes[pos] = *byte;
                }
            }
        }

        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let lead = words.iter().position(|w| *w != 0).unwrap_or(8);

        Ok(CompactTarget { bits, words, lead })
    }

    /// The compact encoding.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The target as eight 32-bit words, most significant first.
    pub fn expand(&self) -> [u32; 8] {
        self.words
    }

    /// The target as a 32-byte big-endian number.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.words.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    pub fn is_zero(&self) -> bool {
        self.lead == 8
    }

    /// How many times harder this target is than the difficulty 1 target.
    pub fn difficulty(&self) -> f64 {
        fn to_f64(words: &[u32; 8]) -> f64 {
            words
                .iter()
                .fold(0.0, |acc, w| acc * 4_294_967_296.0 + *w as f64)
        }
        if self.is_zero() {
            return f64::INFINITY;
        }
        // 0xffff * 2^208
        let difficulty_1 = 65535.0 * 2f64.powi(208);
        difficulty_1 / to_f64(&self.words)
    }

    /// Whether `hash`, read as a little-endian 256-bit number, is at or below the target.
    pub fn is_met_by(&self, hash: &Hash) -> bool {
        self.meets(|i| {
            let at = 28 - 4 * i;
            u32::from_le_bytes([hash.raw[at], hash.raw[at + 1], hash.raw[at + 2], hash.raw[at + 3]])
        })
    }

    /// The same test as [CompactTarget::is_met_by], on the final chaining value of the hash.
    #[inline]
    pub fn is_met_by_state(&self, state: &HashState) -> bool {
        self.meets(|i| state[7 - i].swap_bytes())
    }

    // `word(i)` is the i-th most significant 32-bit word of the candidate hash.
    #[inline(always)]
    fn meets<F: Fn(usize) -> u32>(&self, word: F) -> bool {
        for i in 0..self.lead {
            if word(i) != 0 {
                return false;
            }
        }
        let end = (self.lead + 2).min(8);
        for i in self.lead..end {
            match word(i).cmp(&self.words[i]) {
                Ordering::Less => return true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        // tied on every significant word, the target is zero from here on
        (end..8).all(|i| word(i) == 0)
    }
}

/// Returns true if `hash` satisfies `target`, that is hash <= target as 256-bit numbers.
#[inline]
pub fn hash_meets_target(hash: &Hash, target: &CompactTarget) -> bool {
    target.is_met_by(hash)
}

impl TryFrom<u32> for CompactTarget {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        CompactTarget::from_bits(bits)
    }
}

impl fmt::Display for CompactTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08x}", self.bits)
    }
}

impl Serialize for CompactTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits)
    }
}

impl<'de> Deserialize<'de> for CompactTarget {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        CompactTarget::from_bits(bits).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
