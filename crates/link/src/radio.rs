//! Radio front-end interface
//!
//! The link core never talks to hardware directly; it consumes and produces
//! complex baseband sample blocks through this narrow contract. Real
//! front ends (USRP and friends) live outside this crate; [`ChannelRadio`]
//! is an in-process implementation backed by channels, used by the tests
//! and the offline tools.

use crate::{LinkError, Result};
use crossbeam_channel::{Receiver as ChannelReceiver, Sender};
use std::collections::VecDeque;
use ulofdm_core::Sample;

/// Blocking sample transport to and from the front end.
pub trait Radio: Send {
    /// Block until `n` baseband samples are available and write them into
    /// `buf` (which is cleared first).
    fn get_samples(&mut self, n: usize, buf: &mut Vec<Sample>) -> Result<()>;

    /// Block until the burst has been handed off for transmission.
    fn send_burst_sync(&mut self, samples: &[Sample]) -> Result<()>;
}

/// Channel-backed radio: receive samples from a producer thread, hand
/// transmitted bursts to an optional consumer.
pub struct ChannelRadio {
    source: ChannelReceiver<Vec<Sample>>,
    pending: VecDeque<Sample>,
    sink: Option<Sender<Vec<Sample>>>,
}

impl ChannelRadio {
    pub fn new(source: ChannelReceiver<Vec<Sample>>) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Sender<Vec<Sample>>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl Radio for ChannelRadio {
    fn get_samples(&mut self, n: usize, buf: &mut Vec<Sample>) -> Result<()> {
        while self.pending.len() < n {
            let block = self
                .source
                .recv()
                .map_err(|_| LinkError::RadioDisconnected)?;
            self.pending.extend(block);
        }
        buf.clear();
        buf.extend(self.pending.drain(..n));
        Ok(())
    }

    fn send_burst_sync(&mut self, samples: &[Sample]) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.send(samples.to_vec())
                .map_err(|_| LinkError::RadioDisconnected)?;
        }
        Ok(())
    }
}
