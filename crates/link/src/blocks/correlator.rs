//! Underlay correlator and tagged decoder
//!
//! Slides a PN-length window over the incoming sample stream and emits the
//! same stream (delayed by one PN period) with a `UlPn` tag on the first
//! sample of every detected PN block. The tag marks overlay frame starts;
//! the sign of the correlation carries the underlay bit, whose polarity
//! must alternate block to block.
//!
//! Once a strong peak establishes confidence, the correlator stops sliding
//! sample by sample and jumps to just before the next expected PN boundary,
//! which cuts the per-sample cost from one full correlation per sample to a
//! handful per PN period.

use crate::blocks::{Block, SampleTag, TaggedSample};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;
use ulofdm_core::params::{COEFF_THRESH, SEARCH_WINDOW, UPPER_COEFF_THRESH};
use ulofdm_core::pn::PN_SIZE;
use ulofdm_core::Sample;
use ulofdm_modem::underlay::pn_correlation;

/// Counters shared with the rest of the receiver for diagnostics.
#[derive(Debug, Default)]
pub struct UnderlayStats {
    peaks: AtomicU64,
    bits_in_error: AtomicU64,
    correlations: AtomicU64,
}

impl UnderlayStats {
    /// Number of above-threshold PN peaks seen so far.
    pub fn peaks(&self) -> u64 {
        self.peaks.load(Ordering::Relaxed)
    }

    /// Number of detected underlay bits that failed to alternate.
    pub fn bits_in_error(&self) -> u64 {
        self.bits_in_error.load(Ordering::Relaxed)
    }

    /// Number of window correlations actually computed.
    pub fn correlations(&self) -> u64 {
        self.correlations.load(Ordering::Relaxed)
    }
}

/// Streaming PN correlator block.
pub struct PnCorrelator {
    carryover: Vec<Sample>,
    prev_bit: u8,
    conf: i64,
    skip: usize,
    stats: Arc<UnderlayStats>,
}

impl PnCorrelator {
    pub fn new() -> Self {
        Self {
            carryover: vec![Sample::default(); PN_SIZE],
            prev_bit: 0,
            conf: 0,
            skip: 0,
            stats: Arc::new(UnderlayStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<UnderlayStats> {
        Arc::clone(&self.stats)
    }
}

impl Default for PnCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for PnCorrelator {
    type Input = Vec<Sample>;
    type Output = Vec<TaggedSample>;

    fn name(&self) -> &'static str {
        "pn_sync"
    }

    fn work(&mut self, input: Self::Input) -> Self::Output {
        if input.is_empty() {
            return Vec::new();
        }
        let n = input.len();

        // Stitch the previous invocation's tail in front of the new input;
        // output position x then sees the window starting at its own sample.
        let mut stream = Vec::with_capacity(n + PN_SIZE);
        stream.extend_from_slice(&self.carryover);
        stream.extend_from_slice(&input);

        let mut output = Vec::with_capacity(n);
        for x in 0..n {
            let mut tag = SampleTag::None;
            if self.skip > 0 {
                self.skip -= 1;
            } else {
                self.conf -= 1;
                self.stats.correlations.fetch_add(1, Ordering::Relaxed);
                let coeff = pn_correlation(&stream[x..x + PN_SIZE]);
                if coeff.abs() > COEFF_THRESH {
                    tag = SampleTag::UlPn;
                    self.stats.peaks.fetch_add(1, Ordering::Relaxed);

                    let bit = u8::from(coeff > 0.0);
                    if bit == self.prev_bit {
                        self.stats.bits_in_error.fetch_add(1, Ordering::Relaxed);
                    }
                    self.prev_bit = bit;

                    if coeff.abs() > UPPER_COEFF_THRESH {
                        self.conf = 100;
                    } else if self.conf > 0 {
                        // Weak peak, but it arrived in the expected window.
                        self.conf = 100;
                    }
                    if self.conf == 100 {
                        self.skip = PN_SIZE - SEARCH_WINDOW - 1;
                    }
                    trace!(coeff, bit, "PN peak");
                }
            }
            output.push(TaggedSample {
                sample: stream[x],
                tag,
            });
        }

        self.carryover.copy_from_slice(&stream[n..]);
        output
    }
}
