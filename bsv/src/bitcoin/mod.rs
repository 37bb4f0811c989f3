/// The bsv.bitcoin module contains the bitcoin types and hashing primitives used for proof of work.

mod encoding;
pub mod hash;
mod header;
pub mod merkle;
mod params;
pub mod sha256;
pub mod target;



pub use self::encoding::Encodable;
pub use self::hash::Hash;
pub use self::header::{BlockHash, BlockHeader, MerkleRoot};
pub use self::merkle::{build_merkle_proof, merkle_root, verify_merkle_proof, witness_merkle_root};
pub use self::params::BlockchainId;
pub use self::target::{hash_meets_target, CompactTarget};
pub use hex::{FromHex, ToHex};

/// The TxHash identifies a transaction; merkle trees are built over these.
pub type TxHash = Hash;
