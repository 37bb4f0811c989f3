use crate::bitcoin::sha256::{self, second_hash, state_from_bytes, state_to_bytes, HashState};
use crate::bitcoin::Encodable;
use crate::Error;
use bytes::{Buf, BufMut};
use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A struct representing a hash, specifically a SHA256d hash.
///
/// This is the hash type that is generally used within the Bitcoin infrastructure: block hashes,
/// transaction hashes and Merkle nodes. The raw bytes are in the order produced by SHA-256. The
/// hex form is byte-reversed, which is how Bitcoin tooling displays hashes.
///
/// Note that [BlockHash] and [MerkleRoot] are type aliases for [struct@Hash].
/// [MerkleRoot]: crate::bitcoin::MerkleRoot
/// [BlockHash]: crate::bitcoin::BlockHash
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash {
    pub raw: [u8; 32],
}

impl Hash {
    pub const SIZE: u64 = 32;
    pub const HEX_SIZE: u64 = Hash::SIZE * 2;
    pub const ZERO: Hash = Hash {
        raw: [0; Self::SIZE as usize],
    };

    /// Double SHA256 hash the given data.
    pub fn sha256d(data: &[u8]) -> Hash {
        let mut engine = sha256::Sha256::new();
        engine.update(data);
        let mut state = engine.finalize_state();
        second_hash(&mut state);
        Hash::from_state(&state)
    }

    /// Construct a hash from a slice, which must be exactly 32 bytes long.
    pub fn from_slice(slice: &[u8]) -> crate::Result<Hash> {
        let raw = <[u8; 32]>::try_from(slice).map_err(|_| {
            Error::BadArgument(format!("hash must be 32 bytes, got {}", slice.len()))
        })?;
        Ok(Hash { raw })
    }

    /// The hash as the final chaining value of the SHA-256 computation that produced it.
    pub fn to_state(&self) -> HashState {
        state_from_bytes(&self.raw)
    }

    /// The hash whose bytes are the big-endian serialization of `state`.
    pub fn from_state(state: &HashState) -> Hash {
        Hash {
            raw: state_to_bytes(state),
        }
    }

    // helper for ToHex trait implementation
    fn generic_encode_hex<T, F>(&self, mut encode_fn: F) -> T
    where
        T: FromIterator<char>,
        F: FnMut(&[u8]) -> String,
    {
        let mut reversed_bytes = self.raw;
        reversed_bytes.reverse();
        encode_fn(&reversed_bytes).chars().collect()
    }
}

impl Encodable for Hash {
    fn from_binary(buffer: &mut dyn Buf) -> crate::Result<Self>
    where
        Self: Sized,
    {
        if buffer.remaining() < Self::SIZE as usize {
            Err(Error::DataTooSmall)
        } else {
            let mut hash = [0; 32];
            buffer.copy_to_slice(&mut hash);
            Ok(Self { raw: hash })
        }
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> crate::Result<()> {
        buffer.put_slice(&self.raw);
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        Self::SIZE
    }
}

impl FromHex for Hash {
    type Error = Error;

    /// Converts a string of 64 hex characters into a hash. The bytes of the hex encoded form are reversed in
    /// accordance with Bitcoin standards.
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        let hex = hex.as_ref();
        if hex.len() != Hash::HEX_SIZE as usize {
            let msg = format!(
                "Length of hex encoded hash must be 64. Len is {:}.",
                hex.len()
            );
            return Err(Error::BadArgument(msg));
        }
        let mut hash_bytes = <[u8; 32]>::from_hex(hex)?;
        // Reverse bytes in place to match Bitcoin standard representation.
        hash_bytes.reverse();
        Ok(Hash { raw: hash_bytes })
    }
}

impl ToHex for Hash {
    /// Converts the hash into a hex string. The bytes are reversed in the hex string in accordance with
    /// Bitcoin standard representation.
    fn encode_hex<T: FromIterator<char>>(&self) -> T {
        self.generic_encode_hex(|bytes| hex::encode(bytes))
    }

    fn encode_hex_upper<T: FromIterator<char>>(&self) -> T {
        self.generic_encode_hex(|bytes| hex::encode_upper(bytes))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(value: [u8; 32]) -> Self {
        Hash { raw: value }
    }
}

impl From<Hash> for [u8; 32] {
    /// Convert from Hash to u8 encoding
    fn from(value: Hash) -> Self {
        value.raw
    }
}

impl Ord for Hash {
    /// Hashes are ordered by magnitude, reading the raw bytes as a little-endian 256-bit number.
    ///
    /// This matches the alphabetical ordering of the hex representation since the hex representation
    /// is reversed byte-wise, and it is the order used when comparing a block hash with a target.
    fn cmp(&self, other: &Hash) -> Ordering {
        self.raw.iter().rev().cmp(other.raw.iter().rev())
    }
}

impl PartialOrd for Hash {
    fn partial_cmp(&self, other: &Hash) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode_hex::<String>().as_ref())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use ring::digest::{digest, SHA256};

    #[test]
    fn sha256d_test() {
        let x = hex::decode("0123456789abcdef").unwrap();
        let e = hex::encode(Hash::sha256d(&x).raw);
        assert_eq!(
            e,
            "137ad663f79da06e282ed0abbec4d70523ced5ff8e39d5c2e5641d978c5925aa"
        );
    }

    #[test]
    fn sha256d_matches_ring() {
        for len in [0usize, 1, 31, 32, 55, 56, 64, 80, 119, 1000] {
            let data = vec![0x5au8; len];
            let first = digest(&SHA256, &data);
            let second = digest(&SHA256, first.as_ref());
            assert_eq!(&Hash::sha256d(&data).raw[..], second.as_ref(), "length {}", len);
        }
    }

    #[test]
    fn hash_decode() {
        // Valid
        let s1 = "0000000000000000000000000000000000000000000000000000000000000000";
        let s2 = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let s3 = "abcdef0000112233445566778899abcdef000011223344556677889912345678";
        assert!(Hash::from_hex(s1).is_ok());
        assert!(Hash::from_hex(s2).is_ok());
        assert!(Hash::from_hex(s3).is_ok());

        // Invalid
        let s1 = "000000000000000000000000000000000000000000000000000000000000000";
        let s2 = "00000000000000000000000000000000000000000000000000000000000000000";
        let s3 = "000000000000000000000000000000000000000000000000000000000000000g";
        assert!(Hash::from_hex(s1).is_err());
        assert!(Hash::from_hex(s2).is_err());
        assert!(Hash::from_hex(s3).is_err());
    }

    #[test]
    fn hash_compare() {
        let s1 = "5555555555555555555555555555555555555555555555555555555555555555";
        let s2 = "5555555555555555555555555555555555555555555555555555555555555555";
        assert_eq!(Hash::from_hex(s1).unwrap(), Hash::from_hex(s2).unwrap());

        let s1 = "0555555555555555555555555555555555555555555555555555555555555555";
        let s2 = "5555555555555555555555555555555555555555555555555555555555555555";
        assert!(Hash::from_hex(s1).unwrap() < Hash::from_hex(s2).unwrap());

        let s1 = "5555555555555555555555555555555555555555555555555555555555555550";
        let s2 = "5555555555555555555555555555555555555555555555555555555555555555";
        assert!(Hash::from_hex(s1).unwrap() < Hash::from_hex(s2).unwrap());

        let s1 = "6555555555555555555555555555555555555555555555555555555555555555";
        let s2 = "5555555555555555555555555555555555555555555555555555555555555555";
        assert!(Hash::from_hex(s1).unwrap() > Hash::from_hex(s2).unwrap());

        let s1 = "5555555555555555555555555555555555555555555555555555555555555556";
        let s2 = "5555555555555555555555555555555555555555555555555555555555555555";
        assert!(Hash::from_hex(s1).unwrap() > Hash::from_hex(s2).unwrap());
    }

    /// Test binary read of hash
    #[test]
    fn hash_read() {
        let mut b = Bytes::from(vec![
            0xbeu8, 0xc7, 0x7b, 0x08, 0x3c, 0xf7, 0xb7, 0x5c, 0x97, 0xcc, 0xfa, 0x0c, 0x4b, 0x0c,
            0x0c, 0x40, 0xa6, 0xe5, 0xae, 0x6b, 0x05, 0xab, 0x12, 0xc9, 0x38, 0x81, 0xaf, 0x7f,
            0x8a, 0x04, 0x53, 0xf2,
        ]);
        let h = Hash::from_binary(&mut b).unwrap();
        assert_eq!(
            h.encode_hex::<String>(),
            "f253048a7faf8138c912ab056baee5a6400c0c4b0cfacc975cb7f73c087bc7be"
        );
    }

    #[test]
    fn hash_read_too_small() {
        let mut b = Bytes::from(vec![0u8; 31]);
        assert!(matches!(Hash::from_binary(&mut b), Err(Error::DataTooSmall)));
    }

    #[test]
    fn from_slice_length() {
        assert!(Hash::from_slice(&[1u8; 32]).is_ok());
        assert!(Hash::from_slice(&[1u8; 31]).is_err());
        assert!(Hash::from_slice(&[1u8; 33]).is_err());
    }

    #[test]
    fn state_conversion() {
        let h = Hash::sha256d(b"state");
        assert_eq!(Hash::from_state(&h.to_state()), h);
    }

    #[test]
    fn json_serialize_hash() {
        let hash =
            Hash::from_hex("0000000000000000069347185643c805ff7e00fae025316393e34fa67274df4e")
                .expect("Failed to decode test hash");
        let serialized = serde_json::to_string(&hash).expect("Failed to serialize");
        // Ensure it serializes to a hex string
        assert_eq!(
            serialized,
            "\"0000000000000000069347185643c805ff7e00fae025316393e34fa67274df4e\""
        );
    }
}
