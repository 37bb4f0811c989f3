//! Bitcoin SV proof of work for Rust.
//!
//! This library provides the hashing core used to build and mine Bitcoin SV block headers: a
//! SHA-256 engine with the precomputations that make header hashing cheap, Merkle roots, compact
//! targets and a parallel nonce search.

/// Contains functionality related to the core of Bitcoin SV. Hashes, Block Headers, Merkle trees, etc.
pub mod bitcoin;

/// Contains the parallel proof of work search.
pub mod miner;

/// Contains useful utility functions.
pub mod util;

mod result;
pub use result::{Error, Result};
