//! Receive chain blocks
//!
//! Each block owns its internal state and transforms one input buffer into
//! one output buffer per scheduler tick. The scheduler moves buffers
//! between adjacent blocks, so a block never shares its buffers with
//! anything else while its `work` is in flight.

pub mod correlator;
pub mod fft_stage;
pub mod frame_decoder;

pub use correlator::{PnCorrelator, UnderlayStats};
pub use fft_stage::SymbolFft;
pub use frame_decoder::FrameDecoder;

use ulofdm_core::Sample;

/// One stage of the receive graph.
pub trait Block: Send {
    type Input: Send + 'static;
    type Output: Send + 'static;

    fn name(&self) -> &'static str;

    /// Process one tick's input buffer into an output buffer. Errors never
    /// cross this boundary; a failing tick produces an empty output.
    fn work(&mut self, input: Self::Input) -> Self::Output;
}

/// Marker attached to a sample by the correlator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleTag {
    #[default]
    None,
    /// First sample of a detected PN-sequence block, which doubles as a
    /// frame-start marker.
    UlPn,
}

/// A baseband sample with its tag.
#[derive(Debug, Clone, Copy)]
pub struct TaggedSample {
    pub sample: Sample,
    pub tag: SampleTag,
}

/// One post-FFT OFDM symbol of 64 subcarriers; the tag of the symbol's
/// first time-domain sample is carried at the block head.
#[derive(Debug, Clone)]
pub struct SymbolBlock {
    pub tag: SampleTag,
    pub samples: Vec<Sample>,
}
