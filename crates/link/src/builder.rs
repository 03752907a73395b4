//! Transmit frame construction
//!
//! Turns a payload into the time-domain burst handed to the radio: encode,
//! map onto subcarriers, IFFT, cyclic prefix, pad to a PN boundary, add
//! the underlay. The padding matters: the receiver correlator expects PN
//! signalling over the entire transmission, so every burst must end on a
//! PN block boundary to keep the polarity toggle stable across
//! back-to-back frames.

use crate::radio::Radio;
use crate::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;
use ulofdm_core::fft::Fft64;
use ulofdm_core::params::UL_AMP;
use ulofdm_core::pn::PN_SIZE;
use ulofdm_core::preamble::PREAMBLE;
use ulofdm_core::rates::Rate;
use ulofdm_core::Sample;
use ulofdm_frame::payload;
use ulofdm_modem::mapper::SubcarrierMapper;
use ulofdm_modem::underlay::UnderlayAdder;

/// Cyclic prefix length, in samples.
const CP_LEN: usize = 16;

/// Builds transmit bursts for one subcarrier allocation.
pub struct FrameBuilder {
    mapper: SubcarrierMapper,
    ifft: Fft64,
    underlay: UnderlayAdder,
    dump_path: Option<PathBuf>,
}

impl FrameBuilder {
    pub fn new(sc_map: u64) -> Result<Self> {
        Ok(Self {
            mapper: SubcarrierMapper::new(sc_map)?,
            ifft: Fft64::new(),
            underlay: UnderlayAdder::new(UL_AMP),
            dump_path: None,
        })
    }

    /// Override the underlay amplitude (defaults to [`UL_AMP`]).
    pub fn with_underlay_amplitude(mut self, amplitude: f64) -> Self {
        self.underlay = UnderlayAdder::new(amplitude);
        self
    }

    /// Dump each burst's padded overlay (pre-underlay) to a file of raw
    /// little-endian `(f64 re, f64 im)` pairs for offline analysis.
    pub fn with_overlay_dump(mut self, path: PathBuf) -> Self {
        self.dump_path = Some(path);
        self
    }

    /// Overlay symbols without the underlay: encode, map, IFFT, prefix.
    fn build_overlay(&mut self, payload_bytes: &[u8], rate: Rate, legacy: bool) -> Result<Vec<Sample>> {
        let mut samples = if legacy {
            payload::encode_80211a(payload_bytes, rate)?
        } else {
            payload::encode(payload_bytes, rate)?
        };

        // The coded stream need not divide the data subcarrier count;
        // null-pad the tail so the mapper sees whole symbols. The receiver
        // works from the frame geometry and never looks at the pad.
        let data_sc = self.mapper.data_subcarriers();
        let padded_len = samples.len().next_multiple_of(data_sc);
        samples.resize(padded_len, Sample::default());

        let mut mapped = self.mapper.map(&samples)?;
        self.ifft.inverse(&mut mapped)?;

        let num_symbols = mapped.len() / 64;
        let mut prefixed = Vec::with_capacity(num_symbols * (64 + CP_LEN));
        for symbol in mapped.chunks_exact(64) {
            prefixed.extend_from_slice(&symbol[64 - CP_LEN..]);
            prefixed.extend_from_slice(symbol);
        }
        debug!(
            payload = payload_bytes.len(),
            ?rate,
            num_symbols,
            samples = prefixed.len(),
            "overlay built"
        );
        Ok(prefixed)
    }

    /// Build one underlay-carrying burst.
    pub fn build_frame(&mut self, payload_bytes: &[u8], rate: Rate) -> Result<Vec<Sample>> {
        let mut frame = self.build_overlay(payload_bytes, rate, false)?;

        // End the burst on a PN boundary.
        let padded_len = frame.len().next_multiple_of(PN_SIZE);
        frame.resize(padded_len, Sample::default());

        if let Some(path) = &self.dump_path {
            dump_samples(path, &frame)?;
        }

        Ok(self.underlay.add(&frame))
    }

    /// Build a legacy 802.11a-style burst: preamble plus interleaved,
    /// punctured overlay, no underlay.
    pub fn build_frame_80211a(&mut self, payload_bytes: &[u8], rate: Rate) -> Result<Vec<Sample>> {
        let body = self.build_overlay(payload_bytes, rate, true)?;
        let mut frame = Vec::with_capacity(PREAMBLE.len() + body.len());
        frame.extend_from_slice(&PREAMBLE);
        frame.extend_from_slice(&body);
        Ok(frame)
    }
}

fn dump_samples(path: &PathBuf, samples: &[Sample]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in samples {
        writer.write_f64::<LittleEndian>(sample.re)?;
        writer.write_f64::<LittleEndian>(sample.im)?;
    }
    writer.flush()
}

/// Transmit-side facade: builds bursts and hands them to the radio.
pub struct Transmitter<R: Radio> {
    radio: R,
    builder: FrameBuilder,
    rate: Rate,
}

impl<R: Radio> Transmitter<R> {
    pub fn new(radio: R, sc_map: u64, rate: Rate) -> Result<Self> {
        Ok(Self {
            radio,
            builder: FrameBuilder::new(sc_map)?,
            rate,
        })
    }

    /// Build and synchronously transmit one payload.
    pub fn send(&mut self, payload_bytes: &[u8]) -> Result<()> {
        let burst = self.builder.build_frame(payload_bytes, self.rate)?;
        self.radio.send_burst_sync(&burst)
    }
}
