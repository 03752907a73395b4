//! Payload codec
//!
//! Encodes a byte payload into modulated subcarrier samples and decodes
//! them back. The canonical path, used by the underlay pipeline, modulates
//! the convolutionally coded stream directly; the legacy path additionally
//! punctures and interleaves for wire compatibility with the 802.11a-style
//! preamble builder. Both ends derive every size from `(length, rate)`
//! alone, so no header travels with the frame.

use crate::crc::crc32;
use crate::fec::{ConvolutionalEncoder, ViterbiDecoder, TAIL_BITS};
use crate::scramble::scramble_in_place;
use crate::{interleave, puncture};
use crate::{FrameError, Result};
use tracing::{debug, warn};
use ulofdm_core::params::MAX_FRAME_SIZE;
use ulofdm_core::rates::Rate;
use ulofdm_core::Sample;
use ulofdm_modem::qam;

/// Number of OFDM symbols needed for a `length`-byte payload at `rate`:
/// payload plus CRC-32 plus the encoder tail, rounded up to whole symbols.
pub fn num_symbols(length: usize, rate: Rate) -> usize {
    (8 * (length + 4) + TAIL_BITS).div_ceil(rate.params().dbps)
}

/// Modulated sample count of a `length`-byte frame body at `rate`.
pub fn num_samples(length: usize, rate: Rate) -> usize {
    let params = rate.params();
    num_symbols(length, rate) * params.dbps * 2 / params.bpsc
}

fn check_size(payload: &[u8]) -> Result<()> {
    if payload.is_empty() || payload.len() > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadSize {
            len: payload.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(())
}

/// Frame the payload and scramble + convolutionally encode it, returning
/// the coded bit stream shared by both encode variants.
fn code_bits(payload: &[u8], rate: Rate) -> Vec<u8> {
    let params = rate.params();
    let nsym = num_symbols(payload.len(), rate);
    let num_data_bits = nsym * params.dbps;
    let num_data_bytes = num_data_bits / 8;

    let mut data = vec![0u8; num_data_bytes];
    data[..payload.len()].copy_from_slice(payload);
    data[payload.len()..payload.len() + 4].copy_from_slice(&crc32(payload).to_le_bytes());

    scramble_in_place(&mut data);

    let coded = ConvolutionalEncoder::new().encode(&data, num_data_bits - TAIL_BITS);
    debug!(
        length = payload.len(),
        ?rate,
        num_symbols = nsym,
        coded_bits = coded.len(),
        "payload coded"
    );
    coded
}

/// Encode a payload for the underlay pipeline: scramble, convolutional
/// code, modulate. No interleaving or puncturing.
pub fn encode(payload: &[u8], rate: Rate) -> Result<Vec<Sample>> {
    check_size(payload)?;
    let coded = code_bits(payload, rate);
    Ok(qam::modulate(&coded, rate)?)
}

/// Encode a payload for the legacy preamble-framed path: scramble,
/// convolutional code, puncture to the rate, interleave, modulate.
pub fn encode_80211a(payload: &[u8], rate: Rate) -> Result<Vec<Sample>> {
    check_size(payload)?;
    let params = rate.params();
    let coded = code_bits(payload, rate);
    let punctured = puncture::puncture(&coded, rate);
    let interleaved = interleave::interleave(&punctured, params.cbps, params.bpsc)?;
    Ok(qam::modulate(&interleaved, rate)?)
}

/// Decode one frame body back into its payload, verifying the CRC.
pub fn decode(samples: &[Sample], rate: Rate, length: usize) -> Result<Vec<u8>> {
    let params = rate.params();
    let nsym = num_symbols(length, rate);
    let num_data_bits = nsym * params.dbps;
    let num_data_bytes = num_data_bits / 8;

    let expected = num_data_bits * 2 / params.bpsc;
    if samples.len() != expected {
        return Err(FrameError::SizeMismatch {
            expected,
            actual: samples.len(),
        });
    }

    let demodulated = qam::demodulate(samples, rate);
    let mut decoded = ViterbiDecoder::new().decode(&demodulated)?;
    decoded.truncate(num_data_bytes);

    scramble_in_place(&mut decoded);

    if !crate::crc::verify(&decoded, length) {
        warn!(length, ?rate, "Invalid CRC, dropping frame");
        return Err(FrameError::InvalidCrc { length });
    }

    decoded.truncate(length);
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 + 11) as u8).collect()
    }

    #[test]
    fn symbol_count_formula() {
        // 28-byte payload at BPSK 1/2: (8*32 + 6) / 24 rounded up.
        assert_eq!(num_symbols(28, Rate::BpskHalf), 11);
        assert_eq!(num_samples(28, Rate::BpskHalf), 528);
        // 100 bytes at 16-QAM 3/4: (8*104 + 6) / 144 rounded up.
        assert_eq!(num_symbols(100, Rate::Qam16ThreeQuarters), 6);
    }

    #[test]
    fn roundtrip_all_rates() {
        for rate in Rate::ALL {
            let payload = patterned(100);
            let samples = encode(&payload, rate).unwrap();
            assert_eq!(samples.len(), num_samples(payload.len(), rate), "{rate:?}");
            let decoded = decode(&samples, rate, payload.len()).unwrap();
            assert_eq!(decoded, payload, "{rate:?}");
        }
    }

    #[test]
    fn roundtrip_various_lengths() {
        for len in [1usize, 2, 3, 27, 28, 255, 1000, 2000] {
            let payload = patterned(len);
            let samples = encode(&payload, Rate::BpskHalf).unwrap();
            assert_eq!(decode(&samples, Rate::BpskHalf, len).unwrap(), payload);
        }
    }

    #[test]
    fn corrupted_body_fails_crc() {
        let payload = patterned(64);
        for rate in Rate::ALL {
            let mut samples = encode(&payload, rate).unwrap();
            // Flip the sign of one sample hard enough to break a coded bit
            // beyond what the code can absorb at every position in a byte.
            for i in 0..12 {
                samples[10 + i] = -samples[10 + i];
            }
            match decode(&samples, rate, payload.len()) {
                Err(FrameError::InvalidCrc { .. }) => {}
                other => panic!("expected InvalidCrc, got {other:?}"),
            }
        }
    }

    #[test]
    fn wrong_sample_count_rejected() {
        let payload = patterned(10);
        let samples = encode(&payload, Rate::BpskHalf).unwrap();
        match decode(&samples[..samples.len() - 1], Rate::BpskHalf, 10) {
            Err(FrameError::SizeMismatch { .. }) => {}
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn size_limits_enforced() {
        assert!(encode(&[], Rate::BpskHalf).is_err());
        assert!(encode(&patterned(2001), Rate::BpskHalf).is_err());
    }

    #[test]
    fn legacy_encode_differs_but_has_same_length_at_half_rate() {
        let payload = patterned(40);
        let basic = encode(&payload, Rate::BpskHalf).unwrap();
        let legacy = encode_80211a(&payload, Rate::BpskHalf).unwrap();
        // Same sample count (no puncturing at rate 1/2), different order.
        assert_eq!(basic.len(), legacy.len());
        assert_ne!(basic, legacy);
    }

    #[test]
    fn legacy_encode_fills_whole_symbols() {
        for rate in Rate::ALL {
            let params = rate.params();
            let payload = patterned(77);
            let legacy = encode_80211a(&payload, rate).unwrap();
            // Punctured + interleaved stream is cbps bits per symbol.
            assert_eq!(legacy.len(), num_symbols(77, rate) * params.cbps / params.bpsc);
        }
    }
}
