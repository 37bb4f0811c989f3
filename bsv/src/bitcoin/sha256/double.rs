use super::schedule::PartialSchedule;
use super::{compress_block, compress_block_with_schedule, state_to_bytes, HashState, MessageSchedule, IV};

/// Schedule of the padding block that follows a 64-byte message: the `1` bit, zeros and a
/// 512-bit length. It does not depend on the message at all.
pub(crate) const PADDING_64: MessageSchedule = PartialSchedule::expand([
    0x8000_0000, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 512,
]);

/// Schedule of the single block hashing a 32-byte digest. Words 0..8 are the digest, the rest
/// is the fixed padding and a 256-bit length.
pub(crate) const DIGEST_32: PartialSchedule = PartialSchedule::new(
    [0, 0, 0, 0, 0, 0, 0, 0, 0x8000_0000, 0, 0, 0, 0, 0, 0, 256],
    0x00ff,
);

/// Hash the digest held in `state`, leaving `SHA256(digest)` in `state`.
///
/// This is the outer step of double-SHA256. The block is always the 32-byte digest followed by
/// constant padding, so the schedule terms of the padding come from [DIGEST_32].
#[inline]
pub fn second_hash(state: &mut HashState) {
    let mut w = DIGEST_32.schedule();
    w[..8].copy_from_slice(state);
    DIGEST_32.complete(&mut w);
    *state = IV;
    compress_block_with_schedule(state, &w);
}

/// Computes `SHA256(SHA256(src))` of exactly 64 bytes into `dst`.
///
/// Used for Merkle tree nodes, where `src` is the concatenation of two child hashes.
#[inline]
pub fn compress64_double(src: &[u8; 64], dst: &mut [u8; 32]) {
    let mut state = IV;
    compress_block(&mut state, src);
    compress_block_with_schedule(&mut state, &PADDING_64);
    second_hash(&mut state);
    *dst = state_to_bytes(&state);
}
