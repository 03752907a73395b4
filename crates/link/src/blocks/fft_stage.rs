//! Symbol FFT stage
//!
//! Sits between the PN correlator and the frame decoder. Idle until a
//! `UlPn` tag arrives; the tagged sample starts the symbol grid of one
//! fixed-geometry frame. From there the stage consumes 80-sample symbols
//! (16-sample cyclic prefix plus 64 samples of body), strips the prefix,
//! runs the forward FFT and emits one [`SymbolBlock`] per symbol with the
//! frame-start tag preserved on the first block.
//!
//! The underlay tiles the whole frame, so PN tags keep arriving inside the
//! frame body; those are expected and do not re-align the grid. Only a tag
//! seen while idle acquires a new frame.

use crate::blocks::{Block, SampleTag, SymbolBlock, TaggedSample};
use tracing::debug;
use ulofdm_core::fft::Fft64;
use ulofdm_core::Sample;

/// Cyclic prefix length in samples.
pub const CP_LEN: usize = 16;

/// Time-domain samples per OFDM symbol including the prefix.
pub const SYMBOL_LEN: usize = CP_LEN + 64;

/// CP-stripping forward FFT block.
pub struct SymbolFft {
    fft: Fft64,
    frame_symbols: usize,
    remaining: usize,
    partial: Vec<Sample>,
    head_tag: SampleTag,
}

impl SymbolFft {
    /// `frame_symbols` is the number of OFDM symbols in one fixed-geometry
    /// frame body; the stage returns to idle after emitting that many.
    pub fn new(frame_symbols: usize) -> Self {
        Self {
            fft: Fft64::new(),
            frame_symbols,
            remaining: 0,
            partial: Vec::with_capacity(SYMBOL_LEN),
            head_tag: SampleTag::None,
        }
    }
}

impl Block for SymbolFft {
    type Input = Vec<TaggedSample>;
    type Output = Vec<SymbolBlock>;

    fn name(&self) -> &'static str {
        "symbol_fft"
    }

    fn work(&mut self, input: Self::Input) -> Self::Output {
        let mut output = Vec::new();
        for tagged in input {
            if self.remaining == 0 {
                if tagged.tag != SampleTag::UlPn {
                    continue;
                }
                debug!(symbols = self.frame_symbols, "frame acquisition");
                self.remaining = self.frame_symbols;
                self.partial.clear();
                self.head_tag = SampleTag::UlPn;
            }

            self.partial.push(tagged.sample);
            if self.partial.len() == SYMBOL_LEN {
                let mut symbol = self.partial[CP_LEN..].to_vec();
                self.partial.clear();
                self.remaining -= 1;
                if self.fft.forward(&mut symbol).is_err() {
                    // Unreachable with a 64-sample body; drop the frame.
                    self.remaining = 0;
                    continue;
                }
                output.push(SymbolBlock {
                    tag: self.head_tag,
                    samples: symbol,
                });
                self.head_tag = SampleTag::None;
            }
        }
        output
    }
}
