use bitcoinsv_pow::bitcoin::{BlockHeader, BlockchainId, FromHex, ToHex};
use bitcoinsv_pow::miner::{CancellationSignal, Miner, MinerConfig, TIME_OFFSETS};
use bitcoinsv_pow::util::epoch_secs_u32;
use clap::Parser;
use log::error;
use std::process::ExitCode;

/// Mines a block header, searching nonces and a window of header times.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The header to mine, as 160 hex characters. Defaults to the genesis header of the chain.
    #[clap(index = 1)]
    header: Option<String>,
    /// Chain whose genesis header is mined when no header is given: main, test, stn or regtest.
    #[clap(long, default_value = "regtest", value_parser = parse_chain)]
    chain: BlockchainId,
    /// Replace the header's bits.
    #[clap(long, value_parser = parse_bits)]
    bits: Option<u32>,
    /// Nonce to start from.
    #[clap(long, default_value_t = 0)]
    nonce: u32,
    /// Use the current time as the header time.
    #[clap(long)]
    now: bool,
    /// Maximum number of threads, 0 for all of them.
    #[clap(long, default_value_t = 0)]
    threads: u32,
    /// Number of one second time offsets to search.
    #[clap(long, default_value_t = TIME_OFFSETS)]
    time_offsets: u32,
}

fn parse_chain(s: &str) -> Result<BlockchainId, String> {
    match s.to_lowercase().as_str() {
        "main" | "mainnet" => Ok(BlockchainId::Main),
        "test" | "testnet" => Ok(BlockchainId::Test),
        "stn" => Ok(BlockchainId::Stn),
        "regtest" => Ok(BlockchainId::Regtest),
        _ => Err(format!("unknown chain {}", s)),
    }
}

fn parse_bits(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = Args::parse();

    let mut header = match &args.header {
        Some(hex) => match BlockHeader::from_hex(hex) {
            Ok(header) => header,
            Err(e) => {
                error!("invalid header: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => BlockHeader::get_genesis(args.chain),
    };
    if let Some(bits) = args.bits {
        header.bits = bits;
    }
    if args.now {
        header.timestamp = epoch_secs_u32();
    }
    header.nonce = args.nonce;

    let cancel = CancellationSignal::new();
    let handler_signal = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\nstopping...");
        handler_signal.cancel();
    }) {
        error!("could not install ctrl-c handler: {}", e);
        return ExitCode::FAILURE;
    }

    let miner = Miner::new(MinerConfig {
        max_parallelism: args.threads,
        time_offsets: args.time_offsets,
    });
    match miner.mine(&mut header, &cancel) {
        Ok(report) => {
            println!(
                "{} hashes in {:.2}s ({:.0} H/s)",
                report.hashes,
                report.elapsed.as_secs_f64(),
                report.hash_rate()
            );
            match report.solution {
                Some(solution) => {
                    println!("nonce:  {}", solution.nonce);
                    println!("time:   {}", solution.time);
                    println!("hash:   {}", solution.hash);
                    println!("header: {}", header.encode_hex::<String>());
                    ExitCode::SUCCESS
                }
                None => {
                    println!("no block found");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            error!("cannot mine: {}", e);
            ExitCode::FAILURE
        }
    }
}
