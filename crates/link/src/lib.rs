//! ulofdm link - frame construction and the streaming receive chain
//!
//! The transmit side assembles payloads into underlay-carrying OFDM bursts;
//! the receive side runs a three-stage block graph (PN correlator, symbol
//! FFT, frame decoder) with one worker thread per stage, plus a facade that
//! drives the chain from a radio front end.

pub mod blocks;
pub mod builder;
pub mod chain;
pub mod error;
pub mod radio;
pub mod receiver;

pub use error::{LinkError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        blocks::{Block, SampleTag, SymbolBlock, TaggedSample},
        builder::{FrameBuilder, Transmitter},
        chain::ReceiverChain,
        error::{LinkError, Result},
        radio::{ChannelRadio, Radio},
        receiver::Receiver,
    };
}
