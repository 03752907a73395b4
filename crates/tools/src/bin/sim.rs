//! ulofdm SIM - build frames and feed them straight into the receive chain

use anyhow::{ensure, Result};
use clap::Parser;
use std::time::Instant;
use ulofdm_core::params::{NUM_RX_SAMPLES, UL_AMP};
use ulofdm_core::rates::Rate;
use ulofdm_core::Sample;
use ulofdm_link::builder::FrameBuilder;
use ulofdm_link::chain::ReceiverChain;
use ulofdm_link::blocks::frame_decoder::UNDERLAY_FRAME_LENGTH;
use ulofdm_tools::parse_sc_map;

#[derive(Debug, Parser)]
#[command(name = "ulofdm-sim")]
#[command(about = "Offline transmit/receive loopback over a perfect channel")]
struct Args {
    /// Payload text; the underlay link's fixed geometry carries exactly
    /// 28 bytes per frame
    #[arg(short, long, default_value = "This is a test string.......")]
    text: String,

    /// Number of back-to-back frames to transmit
    #[arg(long, default_value = "50")]
    frames: usize,

    /// Subcarrier allocation mask (hex)
    #[arg(long, default_value = "0x00000ffffffff000")]
    sc_map: String,

    /// Underlay amplitude
    #[arg(long, default_value_t = UL_AMP)]
    underlay_amplitude: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let sc_map = parse_sc_map(&args.sc_map)?;
    let payload = args.text.as_bytes();
    ensure!(
        payload.len() == UNDERLAY_FRAME_LENGTH,
        "the underlay link carries {UNDERLAY_FRAME_LENGTH}-byte frames, got {}",
        payload.len()
    );

    println!("Running simulation...");
    let mut builder =
        FrameBuilder::new(sc_map)?.with_underlay_amplitude(args.underlay_amplitude);
    let mut stream = Vec::new();
    for _ in 0..args.frames {
        stream.extend(builder.build_frame(payload, Rate::BpskHalf)?);
    }
    println!("Transmitting {} frames, {} samples", args.frames, stream.len());

    let mut chain = ReceiverChain::new(sc_map)?;
    let start = Instant::now();
    let mut received = 0usize;
    for chunk in stream.chunks(NUM_RX_SAMPLES) {
        for packet in chain.process_samples(chunk.to_vec())? {
            received += 1;
            println!("{}", String::from_utf8_lossy(&packet));
        }
    }
    for _ in 0..3 {
        for packet in chain.process_samples(vec![Sample::default(); NUM_RX_SAMPLES])? {
            received += 1;
            println!("{}", String::from_utf8_lossy(&packet));
        }
    }

    let stats = chain.underlay_stats();
    println!("Received {received} of {} packets", args.frames);
    println!(
        "PN peaks {}, underlay bit errors {}, correlations {}",
        stats.peaks(),
        stats.bits_in_error(),
        stats.correlations()
    );
    println!("Time elapsed: {:.3} ms", start.elapsed().as_secs_f64() * 1e3);
    Ok(())
}
