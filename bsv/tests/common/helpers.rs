use bitcoinsv_pow::bitcoin::{BlockHeader, FromHex};

/// Block 824962 on mainnet.
pub const HEADER_824962: &str = "00405324d8facaf19ce3efc5f6b3fbdc1cb1f5369a56c3de3e50280300000000000000002742bdb5930e5bf24be6e7521ceeecf6d3199871e2a6438f54cb5fd95d3f5139a38d90653c5808186eac9b4c";

/// Initialize test logging (call once per test suite)
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Parse a header that is known to be valid.
pub fn known_header(hex: &str) -> BlockHeader {
    BlockHeader::from_hex(hex).expect("test header should decode")
}

/// A copy of `header` whose nonce is moved back by `distance`, so a search from it has to walk
/// forward to the real solution.
pub fn rewind_nonce(header: &BlockHeader, distance: u32) -> BlockHeader {
    let mut rewound = header.clone();
    rewound.nonce = header.nonce - distance;
    rewound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_nonce() {
        let header = known_header(HEADER_824962);
        let rewound = rewind_nonce(&header, 10);
        assert_eq!(rewound.nonce + 10, header.nonce);
        assert_eq!(rewound.merkle_root, header.merkle_root);
    }
}
