//! Receive chain scheduler
//!
//! Runs each block on its own worker thread. A tick consists of waking
//! every stage with its pending input buffer, waiting for every stage to
//! finish, then moving each stage's output one stage downstream. All
//! stages therefore advance in lockstep and a sample takes exactly one
//! tick per stage to traverse the chain. The wake/done signalling uses
//! bounded channels; moving the buffers through them doubles as the
//! ownership handoff, so the buffers themselves need no locks.

use crate::blocks::{
    Block, FrameDecoder, PnCorrelator, SymbolBlock, SymbolFft, TaggedSample, UnderlayStats,
};
use crate::{LinkError, Result};
use crossbeam_channel::{bounded, Receiver as ChannelReceiver, Sender};
use std::mem;
use std::sync::Arc;
use std::thread::JoinHandle;
use ulofdm_core::Sample;

/// Worker-thread handle for one stage: `wake` delivers the input buffer,
/// `done` returns the output buffer.
pub struct StageHandle<I, O> {
    name: &'static str,
    wake: Option<Sender<I>>,
    done: Option<ChannelReceiver<O>>,
    worker: Option<JoinHandle<()>>,
}

impl<I, O> StageHandle<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Spawn a dedicated worker for `block`. The worker loops forever:
    /// wait for wake, run `work`, post done; it exits when the handle is
    /// dropped and the wake channel disconnects.
    pub fn spawn<B>(mut block: B) -> Result<Self>
    where
        B: Block<Input = I, Output = O> + 'static,
    {
        let name = block.name();
        let (wake_tx, wake_rx) = bounded::<I>(1);
        let (done_tx, done_rx) = bounded::<O>(1);
        let worker = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(input) = wake_rx.recv() {
                    let output = block.work(input);
                    if done_tx.send(output).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            name,
            wake: Some(wake_tx),
            done: Some(done_rx),
            worker: Some(worker),
        })
    }

    /// Hand this stage its input buffer for the tick.
    pub fn wake(&self, input: I) -> Result<()> {
        self.wake
            .as_ref()
            .and_then(|tx| tx.send(input).ok())
            .ok_or(LinkError::StageDisconnected { stage: self.name })
    }

    /// Wait for this stage to finish the tick and take its output buffer.
    pub fn wait(&self) -> Result<O> {
        self.done
            .as_ref()
            .and_then(|rx| rx.recv().ok())
            .ok_or(LinkError::StageDisconnected { stage: self.name })
    }
}

impl<I, O> Drop for StageHandle<I, O> {
    fn drop(&mut self) {
        // Disconnect both channels first so the worker cannot stay parked
        // in recv or in an uncollected done send.
        self.wake = None;
        self.done = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// The three-stage underlay receive chain.
pub struct ReceiverChain {
    correlator: StageHandle<Vec<Sample>, Vec<TaggedSample>>,
    fft: StageHandle<Vec<TaggedSample>, Vec<SymbolBlock>>,
    decoder: StageHandle<Vec<SymbolBlock>, Vec<Vec<u8>>>,
    fft_input: Vec<TaggedSample>,
    decoder_input: Vec<SymbolBlock>,
    stats: Arc<UnderlayStats>,
}

impl ReceiverChain {
    pub fn new(sc_map: u64) -> Result<Self> {
        let correlator_block = PnCorrelator::new();
        let stats = correlator_block.stats();
        let decoder_block = FrameDecoder::new(sc_map)?;
        let fft_block = SymbolFft::new(decoder_block.symbols_per_frame());

        Ok(Self {
            correlator: StageHandle::spawn(correlator_block)?,
            fft: StageHandle::spawn(fft_block)?,
            decoder: StageHandle::spawn(decoder_block)?,
            fft_input: Vec::new(),
            decoder_input: Vec::new(),
            stats,
        })
    }

    /// Run one tick of the chain over a block of raw samples, returning
    /// any payloads completed this tick.
    pub fn process_samples(&mut self, samples: Vec<Sample>) -> Result<Vec<Vec<u8>>> {
        // Wake every stage with its pending input.
        self.correlator.wake(samples)?;
        self.fft.wake(mem::take(&mut self.fft_input))?;
        self.decoder.wake(mem::take(&mut self.decoder_input))?;

        // Wait for all stages to finish the tick.
        let tagged = self.correlator.wait()?;
        let symbols = self.fft.wait()?;
        let packets = self.decoder.wait()?;

        // Move each output one stage downstream for the next tick.
        self.fft_input = tagged;
        self.decoder_input = symbols;
        Ok(packets)
    }

    /// Underlay diagnostics counters, shared with the correlator worker.
    pub fn underlay_stats(&self) -> Arc<UnderlayStats> {
        Arc::clone(&self.stats)
    }
}
