use crate::bitcoin::sha256::{
    compress_block, compress_block_with_schedule, second_hash, HashState, MessageSchedule,
    PartialSchedule, IV,
};
use crate::bitcoin::BlockHeader;

// Positions in the second header block.
const TIME_WORD: usize = 1;
const NONCE_WORD: usize = 3;

/// A header prepared for mining.
///
/// The first 64 bytes of the header (version, previous hash, the first 28 bytes of the Merkle
/// root) never change during a search, so their compression is done once. The second block
/// holds the rest of the Merkle root, the time, the bits, the nonce and the padding for an
/// 80 byte message.
#[derive(Debug, Clone)]
pub(crate) struct HeaderTemplate {
    midstate: HashState,
    tail: [u32; 16],
}

impl HeaderTemplate {
    pub(crate) fn new(header: &BlockHeader) -> HeaderTemplate {
        let bytes = header.encode();
        let mut first = [0u8; 64];
        first.copy_from_slice(&bytes[..64]);
        let mut midstate = IV;
        compress_block(&mut midstate, &first);

        let mut tail = [0u32; 16];
        for (word, chunk) in tail.iter_mut().zip(bytes[64..].chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        tail[4] = 0x8000_0000;
        tail[15] = (BlockHeader::SIZE * 8) as u32;

        HeaderTemplate { midstate, tail }
    }

    /// The header time the offsets are added to.
    pub(crate) fn timestamp(&self) -> u32 {
        self.tail[TIME_WORD].swap_bytes()
    }

    /// Fix the time at `timestamp + offset`, leaving only the nonce to vary.
    pub(crate) fn partition(&self, offset: u32) -> Partition {
        let time = self.timestamp().wrapping_add(offset);
        let mut block = self.tail;
        block[TIME_WORD] = time.swap_bytes();
        Partition {
            midstate: self.midstate,
            schedule: PartialSchedule::new(block, 1 << NONCE_WORD),
            time,
        }
    }
}

/// The search space of one time offset: every nonce at a fixed time.
#[derive(Debug, Clone)]
pub(crate) struct Partition {
    midstate: HashState,
    schedule: PartialSchedule,
    pub(crate) time: u32,
}

impl Partition {
    /// A scratch schedule for [Partition::hash].
    pub(crate) fn scratch(&self) -> MessageSchedule {
        self.schedule.schedule()
    }

    /// The double SHA-256 of the header with this partition's time and `nonce`, as a state.
    #[inline]
    pub(crate) fn hash(&self, w: &mut MessageSchedule, nonce: u32) -> HashState {
        w[NONCE_WORD] = nonce.swap_bytes();
        self.schedule.complete(w);
        let mut state = self.midstate;
        compress_block_with_schedule(&mut state, w);
        second_hash(&mut state);
        state
    }
}
