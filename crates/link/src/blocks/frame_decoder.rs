//! Frame decoder stage
//!
//! Accumulates demapped data subcarriers from tagged symbol blocks and
//! runs the payload decoder once the fixed frame geometry is filled. The
//! underlay link transmits no header, so rate and length are pinned: BPSK
//! rate 1/2, 28-byte payload. A `UlPn` tag restarts the accumulation; a
//! partial frame abandoned that way was a spurious acquisition.

use crate::blocks::{Block, SampleTag, SymbolBlock};
use tracing::debug;
use ulofdm_core::rates::{Rate, RateParams};
use ulofdm_core::Sample;
use ulofdm_frame::payload;
use ulofdm_modem::mapper::SubcarrierMapper;
use ulofdm_modem::Result as ModemResult;

/// Payload length carried by every underlay-mode frame, in bytes.
pub const UNDERLAY_FRAME_LENGTH: usize = 28;

/// Rate used by every underlay-mode frame.
pub const UNDERLAY_FRAME_RATE: Rate = Rate::BpskHalf;

/// Bookkeeping for one in-flight receive frame.
#[derive(Debug)]
struct FrameData {
    rate_params: RateParams,
    length: usize,
    sample_count: usize,
    samples_copied: usize,
    samples: Vec<Sample>,
}

impl FrameData {
    fn idle() -> Self {
        Self {
            rate_params: RateParams::of(UNDERLAY_FRAME_RATE),
            length: 0,
            sample_count: 0,
            samples_copied: 0,
            samples: Vec::new(),
        }
    }

    fn reset(&mut self, rate_params: RateParams, sample_count: usize, length: usize) {
        self.rate_params = rate_params;
        self.length = length;
        self.sample_count = sample_count;
        self.samples_copied = 0;
        self.samples.clear();
        self.samples.resize(sample_count, Sample::default());
    }
}

/// Fixed-geometry frame decoder block.
pub struct FrameDecoder {
    mapper: SubcarrierMapper,
    frame_sample_count: usize,
    current: FrameData,
}

impl FrameDecoder {
    pub fn new(sc_map: u64) -> ModemResult<Self> {
        Ok(Self {
            mapper: SubcarrierMapper::new(sc_map)?,
            frame_sample_count: payload::num_samples(UNDERLAY_FRAME_LENGTH, UNDERLAY_FRAME_RATE),
            current: FrameData::idle(),
        })
    }

    /// Symbols needed to fill one frame with this subcarrier allocation.
    pub fn symbols_per_frame(&self) -> usize {
        self.frame_sample_count
            .div_ceil(self.mapper.data_subcarriers())
    }
}

impl Block for FrameDecoder {
    type Input = Vec<SymbolBlock>;
    type Output = Vec<Vec<u8>>;

    fn name(&self) -> &'static str {
        "frame_decoder"
    }

    fn work(&mut self, input: Self::Input) -> Self::Output {
        let mut output = Vec::new();
        for block in &input {
            // A tag restarts the frame; anything partial is abandoned.
            if block.tag == SampleTag::UlPn {
                let rate_params = RateParams::of(UNDERLAY_FRAME_RATE);
                self.current
                    .reset(rate_params, self.frame_sample_count, UNDERLAY_FRAME_LENGTH);
                debug!(
                    sample_count = self.frame_sample_count,
                    length = UNDERLAY_FRAME_LENGTH,
                    "frame start"
                );
            }

            // Accumulate this symbol's data subcarriers.
            if self.current.samples_copied < self.current.sample_count {
                let Ok(demapped) = self.mapper.demap(&block.samples) else {
                    continue;
                };
                let copied = self.current.samples_copied;
                let take = demapped.len().min(self.current.sample_count - copied);
                self.current.samples[copied..copied + take].copy_from_slice(&demapped[..take]);
                self.current.samples_copied += demapped.len();
            }

            // Decode once the frame geometry is filled.
            if self.current.samples_copied >= self.current.sample_count
                && self.current.sample_count != 0
            {
                match payload::decode(
                    &self.current.samples,
                    self.current.rate_params.rate,
                    self.current.length,
                ) {
                    Ok(decoded) => output.push(decoded),
                    // CRC failures are already logged; the frame is dropped.
                    Err(_) => {}
                }
                self.current.sample_count = 0;
            }
        }
        output
    }
}
