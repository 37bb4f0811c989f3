use crate::bitcoin::sha256::compress64_double;
use crate::bitcoin::{Hash, MerkleRoot, TxHash};
use crate::{Error, Result};

/// Calculate the Merkle root from a list of transaction hashes
///
/// This implements the Bitcoin Merkle tree algorithm where:
/// - If there's only one transaction, its hash is the root
/// - If a level has an odd number of nodes, the last one is duplicated
/// - Nodes are combined pairwise with double SHA256
///
/// All levels are reduced in place in a single buffer of `ceil(n/2) * 64` bytes.
pub fn merkle_root(tx_hashes: &[TxHash]) -> Result<MerkleRoot> {
    if tx_hashes.is_empty() {
        return Err(Error::BadArgument(
            "Cannot calculate merkle root of empty transaction list".to_string(),
        ));
    }

    // If there's only one transaction, its hash is the merkle root
    if tx_hashes.len() == 1 {
        return Ok(tx_hashes[0]);
    }

    let mut slots = leaf_slots(tx_hashes.iter().map(|h| h.raw), tx_hashes.len());
    Ok(Hash::from(reduce(&mut slots)))
}

/// Calculate the witness Merkle root and combine it with the witness commitment.
///
/// The coinbase (first) transaction always contributes an all-zero witness hash, whatever
/// is passed for it. The root of the tree is concatenated with `commitment` and double hashed.
/// With only the coinbase, the tree is skipped and the result is `SHA256d(zero || commitment)`.
pub fn witness_merkle_root(wtx_hashes: &[TxHash], commitment: &[u8; 32]) -> Result<Hash> {
    if wtx_hashes.is_empty() {
        return Err(Error::BadArgument(
            "Cannot calculate witness merkle root of empty transaction list".to_string(),
        ));
    }

    let root = if wtx_hashes.len() == 1 {
        [0u8; 32]
    } else {
        let leaves = std::iter::once([0u8; 32]).chain(wtx_hashes[1..].iter().map(|h| h.raw));
        let mut slots = leaf_slots(leaves, wtx_hashes.len());
        reduce(&mut slots)
    };

    let mut out = [0u8; 32];
    compress64_double(&concat(&root, commitment), &mut out);
    Ok(Hash::from(out))
}

// The leaves, padded to an even number of 32-byte slots.
fn leaf_slots(leaves: impl Iterator<Item = [u8; 32]>, count: usize) -> Vec<[u8; 32]> {
    let mut slots = Vec::with_capacity(count + count % 2);
    slots.extend(leaves);
    if slots.len() % 2 == 1 {
        slots.push(slots[slots.len() - 1]);
    }
    slots
}

// Reduce the slots to the root. Each level reads pairs ahead of the slot it writes, so the
// parents overwrite the front of the buffer.
fn reduce(slots: &mut [[u8; 32]]) -> [u8; 32] {
    let mut count = slots.len();
    while count > 1 {
        if count % 2 == 1 {
            slots[count] = slots[count - 1];
            count += 1;
        }
        count = hash_level(slots, count);
    }
    slots[0]
}

// Hash `count` (even) slots pairwise into the first `count / 2` slots.
fn hash_level(slots: &mut [[u8; 32]], count: usize) -> usize {
    for i in 0..count / 2 {
        let pair = concat(&slots[2 * i], &slots[2 * i + 1]);
        compress64_double(&pair, &mut slots[i]);
    }
    count / 2
}

fn concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 64] {
    let mut pair = [0u8; 64];
    pair[..32].copy_from_slice(left);
    pair[32..].copy_from_slice(right);
    pair
}

/// Hash two merkle branches together
///
/// This concatenates the two hashes and applies double SHA256
fn hash_merkle_branches(left: &Hash, right: &Hash) -> Hash {
    let mut out = [0u8; 32];
    compress64_double(&concat(&left.raw, &right.raw), &mut out);
    Hash::from(out)
}

/// Build a Merkle proof for a transaction
///
/// Returns the list of hashes needed to prove that a transaction at the given
/// index is part of the Merkle tree with the given root
pub fn build_merkle_proof(tx_hashes: &[TxHash], index: usize) -> Result<Vec<Hash>> {
    if tx_hashes.is_empty() {
        return Err(Error::BadArgument(
            "Cannot build merkle proof for empty transaction list".to_string(),
        ));
    }

    if index >= tx_hashes.len() {
        return Err(Error::BadArgument(
            "Transaction index out of bounds".to_string(),
        ));
    }

    let mut proof = Vec::new();
    let mut slots = leaf_slots(tx_hashes.iter().map(|h| h.raw), tx_hashes.len());
    let mut count = tx_hashes.len();
    let mut current_index = index;

    while count > 1 {
        if count % 2 == 1 {
            slots[count] = slots[count - 1];
            count += 1;
        }
        proof.push(Hash::from(slots[current_index ^ 1]));
        current_index /= 2;
        count = hash_level(&mut slots, count);
    }

    Ok(proof)
}

/// Verify a Merkle proof
///
/// Given a transaction hash, its index, a proof (list of sibling hashes),
/// and the expected root, verify that the transaction is part of the tree
pub fn verify_merkle_proof(
    tx_hash: &TxHash,
    index: usize,
    proof: &[Hash],
    root: &MerkleRoot,
) -> bool {
    let mut current_hash = *tx_hash;
    let mut current_index = index;

    for sibling in proof {
        // Determine if we're the left or right child
        if current_index % 2 == 0 {
            current_hash = hash_merkle_branches(&current_hash, sibling);
        } else {
            current_hash = hash_merkle_branches(sibling, &current_hash);
        }
        // Move up to the parent level
        current_index /= 2;
    }

    current_hash == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex::FromHex;

    fn create_test_hash(s: &str) -> Hash {
        Hash::from_hex(s).unwrap()
    }

    fn numbered(n: usize) -> Vec<Hash> {
        (1..=n).map(|i| create_test_hash(&format!("{:064x}", i))).collect()
    }

    #[test]
    fn test_single_transaction_merkle_root() {
        let tx =
            create_test_hash("0000000000000000000000000000000000000000000000000000000000000001");
        let root = merkle_root(&[tx]).unwrap();
        assert_eq!(root, tx);
    }

    #[test]
    fn test_genesis_merkle_root() {
        // the genesis block has only its coinbase, so the root is the coinbase txid
        let coinbase =
            create_test_hash("4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b");
        assert_eq!(merkle_root(&[coinbase]).unwrap(), coinbase);
    }

    #[test]
    fn test_two_transaction_merkle_root() {
        let txs = numbered(2);
        let root = merkle_root(&txs).unwrap();
        let mut expected = [0u8; 32];
        compress64_double(&concat(&txs[0].raw, &txs[1].raw), &mut expected);
        assert_eq!(root, Hash::from(expected));
        assert_eq!(root, Hash::sha256d(&concat(&txs[0].raw, &txs[1].raw)));
    }

    #[test]
    fn test_odd_transaction_count() {
        // With 3 transactions, the last one should be duplicated
        let txs = numbered(3);
        let root = merkle_root(&txs).unwrap();

        let hash12 = hash_merkle_branches(&txs[0], &txs[1]);
        let hash33 = hash_merkle_branches(&txs[2], &txs[2]);
        let expected = hash_merkle_branches(&hash12, &hash33);
        assert_eq!(root, expected);

        let mut padded = txs.clone();
        padded.push(txs[2]);
        assert_eq!(root, merkle_root(&padded).unwrap());
    }

    #[test]
    fn test_odd_inner_level() {
        // 6 leaves give 3 nodes at the next level, which then needs its own duplicate
        let txs = numbered(6);
        let h12 = hash_merkle_branches(&txs[0], &txs[1]);
        let h34 = hash_merkle_branches(&txs[2], &txs[3]);
        let h56 = hash_merkle_branches(&txs[4], &txs[5]);
        let h1234 = hash_merkle_branches(&h12, &h34);
        let h5656 = hash_merkle_branches(&h56, &h56);
        let expected = hash_merkle_branches(&h1234, &h5656);
        assert_eq!(merkle_root(&txs).unwrap(), expected);
    }

    #[test]
    fn test_large_tree() {
        let txs = numbered(8);
        let root = merkle_root(&txs).unwrap();

        let h12 = hash_merkle_branches(&txs[0], &txs[1]);
        let h34 = hash_merkle_branches(&txs[2], &txs[3]);
        let h56 = hash_merkle_branches(&txs[4], &txs[5]);
        let h78 = hash_merkle_branches(&txs[6], &txs[7]);
        let h1234 = hash_merkle_branches(&h12, &h34);
        let h5678 = hash_merkle_branches(&h56, &h78);
        let expected = hash_merkle_branches(&h1234, &h5678);

        assert_eq!(root, expected);
    }

    #[test]
    fn test_empty_transaction_list() {
        assert!(merkle_root(&[]).is_err());
        assert!(witness_merkle_root(&[], &[0u8; 32]).is_err());
    }

    #[test]
    fn test_real_bitcoin_merkle_root() {
        // Transaction hashes from Bitcoin block #100000
        let tx_hashes = vec![
            create_test_hash("8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87"),
            create_test_hash("fff2525b8931402dd09222c50775608f75787bd2b87e56995a7bdd30f79702c4"),
            create_test_hash("6359f0868171b1d194cbee1af2f16ea598ae8fad666d9b012c8ed2b79a236ec4"),
            create_test_hash("e9a66845e05d5abc0ad04ec80f774a7e585c6e8db975962d069a522137b80c1d"),
        ];
        let root = merkle_root(&tx_hashes).unwrap();
        assert_eq!(
            root,
            create_test_hash("f3e94742aca4b5ef85488dc37c06c3282295ffec960994b2c0d5ac2a25a95766")
        );
    }

    #[test]
    fn test_witness_root_single_transaction() {
        let commitment = [0x5au8; 32];
        let coinbase_wtxid = create_test_hash(&format!("{:064x}", 0xabcdefu32));
        let root = witness_merkle_root(&[coinbase_wtxid], &commitment).unwrap();
        assert_eq!(root, Hash::sha256d(&concat(&[0u8; 32], &commitment)));
    }

    #[test]
    fn test_witness_root_ignores_coinbase_hash() {
        let commitment = [0x11u8; 32];
        let mut wtxs = numbered(5);
        let a = witness_merkle_root(&wtxs, &commitment).unwrap();
        wtxs[0] = create_test_hash(&format!("{:064x}", 999));
        let b = witness_merkle_root(&wtxs, &commitment).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_witness_root_many_transactions() {
        let commitment = [0x22u8; 32];
        let wtxs = numbered(3);
        let leaves = vec![Hash::ZERO, wtxs[1], wtxs[2]];
        let tree_root = merkle_root(&leaves).unwrap();
        let expected = hash_merkle_branches(&tree_root, &Hash::from(commitment));
        assert_eq!(witness_merkle_root(&wtxs, &commitment).unwrap(), expected);
    }

    #[test]
    fn test_merkle_proof_generation() {
        let txs = numbered(4);

        // Get proof for tx1 (index 0)
        let proof = build_merkle_proof(&txs, 0).unwrap();

        // The proof should contain tx2 (sibling at level 0) and hash34 (sibling at level 1)
        assert_eq!(proof.len(), 2);
        assert_eq!(proof[0], txs[1]);
        assert_eq!(proof[1], hash_merkle_branches(&txs[2], &txs[3]));
    }

    #[test]
    fn test_merkle_proof_verification() {
        let txs = numbered(4);
        let root = merkle_root(&txs).unwrap();

        for (index, tx) in txs.iter().enumerate() {
            let proof = build_merkle_proof(&txs, index).unwrap();
            assert!(verify_merkle_proof(tx, index, &proof, &root));

            // Test with wrong index
            assert!(!verify_merkle_proof(tx, (index + 1) % 4, &proof, &root));

            // Test with wrong transaction
            let wrong_tx = create_test_hash(
                "000000000000000000000000000000000000000000000000000000000000dead",
            );
            assert!(!verify_merkle_proof(&wrong_tx, index, &proof, &root));
        }
    }

    #[test]
    fn test_merkle_proof_odd_count() {
        let txs = numbered(3);
        let root = merkle_root(&txs).unwrap();

        // Test proof for tx3 (which gets duplicated)
        let proof = build_merkle_proof(&txs, 2).unwrap();
        assert!(verify_merkle_proof(&txs[2], 2, &proof, &root));

        // The proof should contain tx3 (its own duplicate) and hash12
        assert_eq!(proof.len(), 2);
        assert_eq!(proof[0], txs[2]);
        assert_eq!(proof[1], hash_merkle_branches(&txs[0], &txs[1]));
    }

    #[test]
    fn test_merkle_proof_single_transaction() {
        let txs = numbered(1);
        let root = merkle_root(&txs).unwrap();
        let proof = build_merkle_proof(&txs, 0).unwrap();

        // For a single transaction, the proof should be empty
        assert_eq!(proof.len(), 0);
        assert!(verify_merkle_proof(&txs[0], 0, &proof, &root));
    }

    #[test]
    fn test_merkle_proof_edge_cases() {
        let txs = numbered(2);
        assert!(build_merkle_proof(&txs, 5).is_err());
        assert!(build_merkle_proof(&[], 0).is_err());
    }

    #[test]
    fn test_hash_merkle_branches_order() {
        let txs = numbered(2);
        assert_ne!(
            hash_merkle_branches(&txs[0], &txs[1]),
            hash_merkle_branches(&txs[1], &txs[0])
        );
    }
}
