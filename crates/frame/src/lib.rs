//! ulofdm frame - scrambling, FEC and the payload codec
//!
//! This crate turns payload bytes into modulated subcarrier samples and
//! back: CRC-32 framing, the 7-bit scrambler, the rate-1/2 K=7
//! convolutional code with its Viterbi decoder, and the bit-level
//! interleaver/puncturer used by the legacy encode path.

pub mod crc;
pub mod error;
pub mod fec;
pub mod interleave;
pub mod payload;
pub mod puncture;
pub mod scramble;

pub use error::{FrameError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        error::{FrameError, Result},
        fec::{ConvolutionalEncoder, ViterbiDecoder},
        payload,
        scramble::scramble_in_place,
    };
}
