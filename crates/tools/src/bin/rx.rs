//! ulofdm RX - run a recorded sample file through the receive chain

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use ulofdm_core::params::NUM_RX_SAMPLES;
use ulofdm_link::chain::ReceiverChain;
use ulofdm_tools::{parse_sc_map, sampfile};

#[derive(Debug, Parser)]
#[command(name = "ulofdm-rx")]
#[command(about = "Decode raw IQ samples through the underlay receive chain")]
struct Args {
    /// Input sample file (LE f64 IQ pairs)
    #[arg(short, long)]
    input: PathBuf,

    /// Subcarrier allocation mask (hex); must match the transmitter
    #[arg(long, default_value = "0x00000ffffffff000")]
    sc_map: String,

    /// Samples per chain tick
    #[arg(long, default_value_t = NUM_RX_SAMPLES)]
    chunk: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let sc_map = parse_sc_map(&args.sc_map)?;
    let samples = sampfile::read_samples(&args.input)?;
    println!("Read {} samples from {}", samples.len(), args.input.display());

    let mut chain = ReceiverChain::new(sc_map)?;
    let mut received = 0usize;
    let mut feed = |chain: &mut ReceiverChain, block: Vec<_>| -> Result<()> {
        for packet in chain.process_samples(block)? {
            received += 1;
            println!("[{received}] {}", String::from_utf8_lossy(&packet));
        }
        Ok(())
    };

    for chunk in samples.chunks(args.chunk) {
        feed(&mut chain, chunk.to_vec())?;
    }
    // Flush the delayed correlator output and the chain pipeline.
    for _ in 0..3 {
        feed(&mut chain, vec![Default::default(); args.chunk.max(64)])?;
    }

    let stats = chain.underlay_stats();
    println!(
        "Received {} packets; {} PN peaks, {} underlay bit errors",
        received,
        stats.peaks(),
        stats.bits_in_error()
    );
    Ok(())
}
