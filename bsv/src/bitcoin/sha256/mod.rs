//! SHA-256 compression engine.
//!
//! The engine is split into stages so that callers hashing closely related messages can skip
//! the work that does not change between them:
//!
//! * [compress_block] expands a 64-byte block into its message schedule and runs the rounds.
//! * [compress_block_with_schedule] runs the rounds over a schedule the caller already holds.
//! * [PartialSchedule] precomputes the schedule terms contributed by input words that never
//!   change, leaving only the words that depend on the varying inputs to be derived per call.
//! * [second_hash] and [compress64_double] are the fixed-shape double-SHA256 steps used by
//!   the Merkle reducer and the miner, built on constant schedules.
//!
//! [sha256] is the general variable-length hash with standard padding.

mod compress;
mod double;
mod schedule;

pub use self::compress::{compress_block, compress_block_with_schedule, expand_schedule};
pub use self::double::{compress64_double, second_hash};
pub use self::schedule::PartialSchedule;

pub(crate) use self::compress::compress_slice;

/// The SHA-256 chaining value: eight 32-bit words.
pub type HashState = [u32; 8];

/// The 64-word message schedule derived from one 64-byte block.
pub type MessageSchedule = [u32; 64];

/// Size of a SHA-256 block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// The FIPS 180-4 initial hash value.
pub const IV: HashState = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// The 64 round constants.
pub(crate) const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Returns a fresh chaining value.
#[inline]
pub fn init() -> HashState {
    IV
}

/// Serializes a chaining value as the 32-byte big-endian digest.
#[inline]
pub fn state_to_bytes(state: &HashState) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Reads a 32-byte big-endian digest back into chaining-value words.
#[inline]
pub fn state_from_bytes(bytes: &[u8; 32]) -> HashState {
    let mut state = [0u32; 8];
    for (word, chunk) in state.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    state
}

/// SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut engine = Sha256::new();
    engine.update(data);
    state_to_bytes(&engine.finalize_state())
}

/// Incremental hasher behind [sha256] and [crate::bitcoin::Hash::sha256d].
pub(crate) struct Sha256 {
    state: HashState,
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    total_len: u64,
}

impl Sha256 {
    pub(crate) fn new() -> Sha256 {
        Sha256 {
            state: IV,
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
            total_len: 0,
        }
    }

    pub(crate) fn update(&mut self, mut data: &[u8]) {
        self.total_len = self.total_len.wrapping_add(data.len() as u64);
        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len < BLOCK_SIZE {
                return;
            }
            compress_block(&mut self.state, &self.buffer);
            self.buffer_len = 0;
        }
        let mut blocks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            compress_slice(&mut self.state, block);
        }
        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    /// Pads the message and returns the final chaining value.
    ///
    /// The padding is a single `1` bit, zeros, and the 64-bit big-endian message length in bits.
    /// When fewer than nine bytes remain in the last block the length goes in an extra block.
    pub(crate) fn finalize_state(mut self) -> HashState {
        let bit_len = self.total_len.wrapping_mul(8);
        let mut block = [0u8; BLOCK_SIZE];
        block[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        block[self.buffer_len] = 0x80;
        if self.buffer_len >= BLOCK_SIZE - 8 {
            compress_block(&mut self.state, &block);
            block = [0u8; BLOCK_SIZE];
        }
        block[BLOCK_SIZE - 8..].copy_from_slice(&bit_len.to_be_bytes());
        compress_block(&mut self.state, &block);
        self.state
    }
}
