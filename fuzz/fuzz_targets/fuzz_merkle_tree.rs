#![no_main]

use libfuzzer_sys::fuzz_target;
use bitcoinsv_pow::bitcoin::{Hash, merkle_root, witness_merkle_root, build_merkle_proof, verify_merkle_proof};

fuzz_target!(|data: &[u8]| {
    // Create transaction hashes from fuzzer input
    // Ensure we have at least 32 bytes for one hash
    if data.len() >= 32 {
        let num_hashes = (data.len() / 32).min(1000); // Limit to prevent OOM
        let tx_hashes: Vec<Hash> = data
            .chunks_exact(32)
            .take(num_hashes)
            .map(|chunk| Hash::from_slice(chunk).unwrap())
            .collect();

        let root = merkle_root(&tx_hashes).unwrap();

        // An odd list has the same root as the list with its last hash repeated
        if tx_hashes.len() % 2 == 1 && tx_hashes.len() > 1 {
            let mut padded = tx_hashes.clone();
            padded.push(tx_hashes[tx_hashes.len() - 1]);
            assert_eq!(merkle_root(&padded).unwrap(), root);
        }

        // The coinbase witness hash never contributes
        let commitment = tx_hashes[tx_hashes.len() - 1].raw;
        let witness_root = witness_merkle_root(&tx_hashes, &commitment).unwrap();
        let mut zeroed = tx_hashes.clone();
        zeroed[0] = Hash::ZERO;
        assert_eq!(witness_merkle_root(&zeroed, &commitment).unwrap(), witness_root);

        // Test merkle proof generation and verification
        for (index, tx_hash) in tx_hashes.iter().enumerate() {
            let proof = build_merkle_proof(&tx_hashes, index).unwrap();
            let is_valid = verify_merkle_proof(tx_hash, index, &proof, &root);
            assert!(is_valid, "Valid proof should verify");
        }
    }
});
