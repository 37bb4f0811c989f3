#![no_main]

use libfuzzer_sys::fuzz_target;
use bitcoinsv_pow::bitcoin::sha256::{compress64_double, second_hash, sha256, state_from_bytes, state_to_bytes};
use bitcoinsv_pow::bitcoin::Hash;

fuzz_target!(|data: &[u8]| {
    // The streaming hasher against the fused and specialised paths
    let digest = sha256(data);
    let mut state = state_from_bytes(&digest);
    second_hash(&mut state);
    assert_eq!(state_to_bytes(&state), sha256(&digest));
    assert_eq!(Hash::sha256d(data).raw, state_to_bytes(&state));

    if data.len() >= 64 {
        let mut block = [0u8; 64];
        block.copy_from_slice(&data[..64]);
        let mut fused = [0u8; 32];
        compress64_double(&block, &mut fused);
        assert_eq!(fused, sha256(&sha256(&block)));
    }
});
