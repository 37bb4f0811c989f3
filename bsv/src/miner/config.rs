use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The number of one second time offsets searched for each header.
pub const TIME_OFFSETS: u32 = 120;

/// Configuration of a [Miner](super::Miner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Upper bound on the number of search threads. Zero uses every hardware thread.
    pub max_parallelism: u32,
    /// How many time offsets, starting at the header's own time, are searched.
    pub time_offsets: u32,
}

impl MinerConfig {
    /// Check that the configuration describes a search that can run.
    pub fn validate(&self) -> Result<()> {
        if self.time_offsets == 0 || self.time_offsets > TIME_OFFSETS {
            return Err(Error::InvalidConfiguration(format!(
                "time_offsets must be between 1 and {}, got {}",
                TIME_OFFSETS, self.time_offsets
            )));
        }
        Ok(())
    }

    /// The number of threads a search will start.
    pub fn thread_count(&self) -> u32 {
        let parallelism = match self.max_parallelism {
            0 => num_cpus::get() as u32,
            n => n,
        };
        parallelism.clamp(1, self.time_offsets.max(1))
    }
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            max_parallelism: 0,
            time_offsets: TIME_OFFSETS,
        }
    }
}
