//! ulofdm TX - build underlay-carrying bursts into a sample file

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;
use ulofdm_core::params::{MAX_FRAME_SIZE, UL_AMP};
use ulofdm_link::builder::FrameBuilder;
use ulofdm_tools::{parse_rate, parse_sc_map, sampfile};

#[derive(Debug, Parser)]
#[command(name = "ulofdm-tx")]
#[command(about = "Build transmit bursts and write them as raw IQ samples")]
struct Args {
    /// Payload text for each frame
    #[arg(short, long, default_value = "HelloOFDM!HelloOFDM!OFDMlink")]
    text: String,

    /// Output sample file (LE f64 IQ pairs)
    #[arg(short, long, default_value = "tx_samples.dat")]
    output: PathBuf,

    /// PHY rate: bpsk, qam16, qam16-3-4 or qam64
    #[arg(long, default_value = "bpsk")]
    rate: String,

    /// Subcarrier allocation mask (hex)
    #[arg(long, default_value = "0x00000ffffffff000")]
    sc_map: String,

    /// Number of back-to-back frames
    #[arg(long, default_value = "1")]
    frames: usize,

    /// Underlay amplitude
    #[arg(long, default_value_t = UL_AMP)]
    underlay_amplitude: f64,

    /// Also dump the padded pre-underlay overlay for analysis
    #[arg(long)]
    overlay_dump: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let rate = parse_rate(&args.rate)?;
    let sc_map = parse_sc_map(&args.sc_map)?;
    let payload = args.text.as_bytes();
    ensure!(
        !payload.is_empty() && payload.len() <= MAX_FRAME_SIZE,
        "payload must be 1..={MAX_FRAME_SIZE} bytes"
    );

    let mut builder = FrameBuilder::new(sc_map)?.with_underlay_amplitude(args.underlay_amplitude);
    if let Some(path) = args.overlay_dump {
        builder = builder.with_overlay_dump(path);
    }

    let mut samples = Vec::new();
    for _ in 0..args.frames {
        samples.extend(builder.build_frame(payload, rate)?);
    }
    sampfile::write_samples(&args.output, &samples)?;

    println!(
        "Wrote {} frames / {} samples to {}",
        args.frames,
        samples.len(),
        args.output.display()
    );
    Ok(())
}
