use crate::bitcoin::params::BlockchainId;
use crate::bitcoin::target::CompactTarget;
use crate::bitcoin::{Encodable, Hash};
use crate::{Error, Result};
use bytes::{Buf, BufMut};
use hex::{FromHex, ToHex};

/// The BlockHash is used to identify block headers and enforce proof of work.
pub type BlockHash = Hash;
/// The MerkleRoot is the root of the merkle tree of this block's transaction hashes.
pub type MerkleRoot = Hash;

// Merkle root shared by all the genesis blocks, in raw byte order.
const GENESIS_MERKLE_ROOT: [u8; 32] = [
    0x3b, 0xa3, 0xed, 0xfd, 0x7a, 0x7b, 0x12, 0xb2, 0x7a, 0xc7, 0x2c, 0x3e, 0x67, 0x76, 0x8f,
    0x61, 0x7f, 0xc8, 0x1b, 0xc3, 0x88, 0x8a, 0x51, 0x32, 0x3a, 0x9f, 0xb8, 0xaa, 0x4b, 0x1e,
    0x5e, 0x4a,
];

/// BlockHeaders are linked to together to form a blockchain.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct BlockHeader {
    /// Block version.
    pub version: u32,
    /// Hash of the previous block header.
    pub prev_hash: BlockHash,
    /// Root of the merkle tree of this block's transaction hashes.
    pub merkle_root: MerkleRoot,
    /// Timestamp when this block was created as recorded by the miner.
    pub timestamp: u32,
    /// Target difficulty bits.
    pub bits: u32,
    /// Nonce used to mine the block.
    pub nonce: u32,
}

impl BlockHeader {
    /// Size of the BlockHeader in bytes
    pub const SIZE: usize = 80;
    pub const HEX_SIZE: usize = BlockHeader::SIZE * 2;

    /// Serialize the header into its 80 byte wire form.
    pub fn encode(&self) -> [u8; BlockHeader::SIZE] {
        let mut out = [0u8; BlockHeader::SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_hash.raw);
        out[36..68].copy_from_slice(&self.merkle_root.raw);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Calculates the hash for this block header
    pub fn hash(&self) -> BlockHash {
        Hash::sha256d(&self.encode())
    }

    /// The proof of work target encoded in the `bits` field.
    pub fn target(&self) -> Result<CompactTarget> {
        CompactTarget::from_bits(self.bits)
    }

    /// Check whether the hash of this header satisfies its own target.
    pub fn check_pow(&self) -> Result<bool> {
        Ok(self.target()?.is_met_by(&self.hash()))
    }

    /// Get the Genesis BlockHeader for the given chain.
    pub fn get_genesis(block_chain: BlockchainId) -> BlockHeader {
        let (timestamp, bits, nonce) = match block_chain {
            BlockchainId::Main => (1231006505, 0x1d00ffff, 2083236893),
            BlockchainId::Test | BlockchainId::Stn => (1296688602, 0x1d00ffff, 414098458),
            BlockchainId::Regtest => (1296688602, 0x207fffff, 2),
        };
        BlockHeader {
            version: 1,
            prev_hash: Hash::ZERO,
            merkle_root: Hash::from(GENESIS_MERKLE_ROOT),
            timestamp,
            bits,
            nonce,
        }
    }
}

impl Encodable for BlockHeader {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self>
    where
        Self: Sized,
    {
        if buffer.remaining() < BlockHeader::SIZE {
            return Err(Error::DataTooSmall);
        }
        Ok(BlockHeader {
            version: buffer.get_u32_le(),
            prev_hash: Hash::from_binary(buffer)?,
            merkle_root: Hash::from_binary(buffer)?,
            timestamp: buffer.get_u32_le(),
            bits: buffer.get_u32_le(),
            nonce: buffer.get_u32_le(),
        })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_slice(&self.encode());
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        BlockHeader::SIZE as u64
    }
}

impl FromHex for BlockHeader {
    type Error = Error;
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> std::result::Result<Self, Self::Error> {
        let bytes = Vec::<u8>::from_hex(hex)?;
        BlockHeader::from_binary_buf(bytes.as_slice())
    }
}

impl ToHex for BlockHeader {
    fn encode_hex<T: FromIterator<char>>(&self) -> T {
        self.encode().encode_hex()
    }

    fn encode_hex_upper<T: FromIterator<char>>(&self) -> T {
        self.encode().encode_hex_upper()
    }
}
