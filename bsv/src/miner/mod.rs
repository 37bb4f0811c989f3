//! Parallel proof of work search over the nonce and a small window of header times.
//!
//! The search space of a header is split into partitions, one per time offset `0..120` seconds
//! from the header's own time. Each partition walks the nonce from the header's nonce up to and
//! including `u32::MAX`. Partitions are searched concurrently by a bounded set of threads; the
//! first thread to find a hash at or below the target publishes its solution and stops the rest.
//!
//! ```no_run
//! use bitcoinsv_pow::bitcoin::{BlockHeader, BlockchainId};
//! use bitcoinsv_pow::miner::{mine, CancellationSignal};
//!
//! let mut header = BlockHeader::get_genesis(BlockchainId::Regtest);
//! header.nonce = 0;
//! assert!(mine(&mut header, CancellationSignal::new(), 0));
//! assert!(header.check_pow().unwrap());
//! ```

mod cancel;
mod config;
mod template;

pub use self::cancel::CancellationSignal;
pub use self::config::{MinerConfig, TIME_OFFSETS};

use self::template::{HeaderTemplate, Partition};
use crate::bitcoin::{BlockHash, BlockHeader, CompactTarget, Hash};
use crate::Result;
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Search for a nonce and time that satisfy the header's target.
///
/// On success the header's `nonce` and `timestamp` are set to the solution and `true` is
/// returned. `max_parallelism` bounds the number of threads, zero meaning all hardware threads.
/// Cancellation, exhaustion of the search space and an undecodable target all return `false`
/// and leave the header untouched.
pub fn mine(header: &mut BlockHeader, cancel: CancellationSignal, max_parallelism: u32) -> bool {
    let miner = Miner::new(MinerConfig {
        max_parallelism,
        ..MinerConfig::default()
    });
    match miner.mine(header, &cancel) {
        Ok(report) => report.found(),
        Err(e) => {
            warn!("cannot mine header: {}", e);
            false
        }
    }
}

/// A nonce and time that satisfy a header's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u32,
    pub time: u32,
    pub hash: BlockHash,
}

/// The outcome of one search.
#[derive(Debug, Clone)]
pub struct MiningReport {
    /// The winning nonce and time, if any.
    pub solution: Option<Solution>,
    /// Number of header hashes computed by all threads.
    pub hashes: u64,
    /// Wall clock duration of the search.
    pub elapsed: Duration,
}

impl MiningReport {
    pub fn found(&self) -> bool {
        self.solution.is_some()
    }

    /// Hashes per second over the whole search.
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs proof of work searches with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Miner {
    config: MinerConfig,
}

// State shared by the threads of one search.
struct SearchState<'a> {
    cancel: &'a CancellationSignal,
    // raised by the winner
    stop: AtomicBool,
    next_offset: AtomicU32,
    solution: OnceLock<Solution>,
    hashes: AtomicU64,
}

impl SearchState<'_> {
    #[inline]
    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || self.cancel.is_cancelled()
    }
}

impl Miner {
    pub fn new(config: MinerConfig) -> Miner {
        Miner { config }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Search for a solution to `header`, writing it into the header if one is found.
    ///
    /// Fails only if the configuration is invalid or the header's bits are not a valid target.
    /// The header must not be changed by anyone else while the search runs, which the
    /// exclusive borrow enforces.
    pub fn mine(
        &self,
        header: &mut BlockHeader,
        cancel: &CancellationSignal,
    ) -> Result<MiningReport> {
        self.config.validate()?;
        let target = header.target()?;
        let started = Instant::now();

        if cancel.is_cancelled() {
            debug!("search cancelled before it started");
            return Ok(MiningReport {
                solution: None,
                hashes: 0,
                elapsed: started.elapsed(),
            });
        }

        let threads = self.config.thread_count();
        let offsets = self.config.time_offsets;
        let start_nonce = header.nonce;
        debug!(
            "mining with {} threads over {} time offsets from nonce {}, target {}",
            threads, offsets, start_nonce, target
        );

        let template = HeaderTemplate::new(header);
        let state = SearchState {
            cancel,
            stop: AtomicBool::new(false),
            next_offset: AtomicU32::new(0),
            solution: OnceLock::new(),
            hashes: AtomicU64::new(0),
        };

        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| search_partitions(&state, &template, &target, start_nonce, offsets));
            }
        });

        let report = MiningReport {
            solution: state.solution.into_inner(),
            hashes: state.hashes.into_inner(),
            elapsed: started.elapsed(),
        };
        match &report.solution {
            Some(solution) => {
                header.nonce = solution.nonce;
                header.timestamp = solution.time;
                info!(
                    "found block {} with nonce {} time {} after {} hashes in {:.2}s ({:.0} H/s)",
                    solution.hash,
                    solution.nonce,
                    solution.time,
                    report.hashes,
                    report.elapsed.as_secs_f64(),
                    report.hash_rate()
                );
            }
            None if cancel.is_cancelled() => {
                debug!("search cancelled after {} hashes", report.hashes)
            }
            None => debug!("search space exhausted after {} hashes", report.hashes),
        }
        Ok(report)
    }
}

// Claim partitions in ascending offset order until they run out or the search stops.
fn search_partitions(
    state: &SearchState,
    template: &HeaderTemplate,
    target: &CompactTarget,
    start_nonce: u32,
    offsets: u32,
) {
    loop {
        if state.should_stop() {
            return;
        }
        let offset = state.next_offset.fetch_add(1, Ordering::Relaxed);
        if offset >= offsets {
            return;
        }
        let partition = template.partition(offset);
        trace!("searching time offset {} (time {})", offset, partition.time);
        let (found, hashes) = search_nonces(state, &partition, target, start_nonce);
        state.hashes.fetch_add(hashes, Ordering::Relaxed);
        if let Some(solution) = found {
            if state.solution.set(solution).is_ok() {
                trace!("time offset {} won with nonce {}", offset, solution.nonce);
            }
            state.stop.store(true, Ordering::Relaxed);
            return;
        }
        trace!("time offset {} finished after {} hashes", offset, hashes);
    }
}

// Walk one partition's nonces. Returns the solution, if found, and the number of hashes.
fn search_nonces(
    state: &SearchState,
    partition: &Partition,
    target: &CompactTarget,
    start_nonce: u32,
) -> (Option<Solution>, u64) {
    let mut w = partition.scratch();
    let mut hashes = 0u64;
    let mut nonce = start_nonce;
    loop {
        if state.should_stop() {
            return (None, hashes);
        }
        let hash = partition.hash(&mut w, nonce);
        hashes += 1;
        if target.is_met_by_state(&hash) {
            let solution = Solution {
                nonce,
                time: partition.time,
                hash: Hash::from_state(&hash),
            };
            return (Some(solution), hashes);
        }
        if nonce == u32::MAX {
            return (None, hashes);
        }
        nonce += 1;
    }
}
