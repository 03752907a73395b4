//! Subcarrier constellations
//!
//! Gray-mapped BPSK, 16-QAM and 64-QAM with the usual unit-energy
//! normalisation. Bits travel as one value per element (0 or 1);
//! demodulation is hard-decision per axis.

use crate::{ModemError, Result};
use ulofdm_core::rates::Rate;
use ulofdm_core::Sample;

const KMOD_QAM16: f64 = 0.316_227_766_016_837_94; // 1/sqrt(10)
const KMOD_QAM64: f64 = 0.154_303_349_962_091_91; // 1/sqrt(42)

/// Gray map of two bits onto one 16-QAM axis.
fn axis16(b0: u8, b1: u8) -> f64 {
    match (b0, b1) {
        (0, 0) => -3.0,
        (0, 1) => -1.0,
        (1, 1) => 1.0,
        _ => 3.0,
    }
}

/// Gray map of three bits onto one 64-QAM axis.
fn axis64(b0: u8, b1: u8, b2: u8) -> f64 {
    match (b0, b1, b2) {
        (0, 0, 0) => -7.0,
        (0, 0, 1) => -5.0,
        (0, 1, 1) => -3.0,
        (0, 1, 0) => -1.0,
        (1, 1, 0) => 1.0,
        (1, 1, 1) => 3.0,
        (1, 0, 1) => 5.0,
        _ => 7.0,
    }
}

/// Hard decision of one 16-QAM axis back to two bits.
fn bits16(v: f64) -> [u8; 2] {
    if v < -2.0 {
        [0, 0]
    } else if v < 0.0 {
        [0, 1]
    } else if v < 2.0 {
        [1, 1]
    } else {
        [1, 0]
    }
}

/// Hard decision of one 64-QAM axis back to three bits.
fn bits64(v: f64) -> [u8; 3] {
    if v < -6.0 {
        [0, 0, 0]
    } else if v < -4.0 {
        [0, 0, 1]
    } else if v < -2.0 {
        [0, 1, 1]
    } else if v < 0.0 {
        [0, 1, 0]
    } else if v < 2.0 {
        [1, 1, 0]
    } else if v < 4.0 {
        [1, 1, 1]
    } else if v < 6.0 {
        [1, 0, 1]
    } else {
        [1, 0, 0]
    }
}

/// Modulate coded bits (one per element, 0/1) into complex subcarrier
/// samples for the given rate.
pub fn modulate(bits: &[u8], rate: Rate) -> Result<Vec<Sample>> {
    let bpsc = rate.params().bpsc;
    if bits.len() % bpsc != 0 {
        return Err(ModemError::RaggedBitCount {
            count: bits.len(),
            bpsc,
        });
    }

    let mut samples = Vec::with_capacity(bits.len() / bpsc);
    match bpsc {
        1 => {
            for &b in bits {
                samples.push(Sample::new(2.0 * b as f64 - 1.0, 0.0));
            }
        }
        4 => {
            for chunk in bits.chunks_exact(4) {
                let re = axis16(chunk[0], chunk[1]) * KMOD_QAM16;
                let im = axis16(chunk[2], chunk[3]) * KMOD_QAM16;
                samples.push(Sample::new(re, im));
            }
        }
        _ => {
            for chunk in bits.chunks_exact(6) {
                let re = axis64(chunk[0], chunk[1], chunk[2]) * KMOD_QAM64;
                let im = axis64(chunk[3], chunk[4], chunk[5]) * KMOD_QAM64;
                samples.push(Sample::new(re, im));
            }
        }
    }
    Ok(samples)
}

/// Hard-demodulate subcarrier samples back into coded bits for the given
/// rate.
pub fn demodulate(samples: &[Sample], rate: Rate) -> Vec<u8> {
    let bpsc = rate.params().bpsc;
    let mut bits = Vec::with_capacity(samples.len() * bpsc);
    match bpsc {
        1 => {
            for s in samples {
                bits.push(u8::from(s.re > 0.0));
            }
        }
        4 => {
            for s in samples {
                bits.extend_from_slice(&bits16(s.re / KMOD_QAM16));
                bits.extend_from_slice(&bits16(s.im / KMOD_QAM16));
            }
        }
        _ => {
            for s in samples {
                bits.extend_from_slice(&bits64(s.re / KMOD_QAM64));
                bits.extend_from_slice(&bits64(s.im / KMOD_QAM64));
            }
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(rate: Rate, nbits: usize) {
        let bits: Vec<u8> = (0..nbits).map(|i| ((i * 7 + i / 3) % 2) as u8).collect();
        let samples = modulate(&bits, rate).unwrap();
        assert_eq!(samples.len(), nbits / rate.params().bpsc);
        assert_eq!(demodulate(&samples, rate), bits);
    }

    #[test]
    fn bpsk_roundtrip() {
        roundtrip(Rate::BpskHalf, 96);
    }

    #[test]
    fn qam16_roundtrip() {
        roundtrip(Rate::Qam16Half, 192);
        roundtrip(Rate::Qam16ThreeQuarters, 192);
    }

    #[test]
    fn qam64_roundtrip() {
        roundtrip(Rate::Qam64TwoThirds, 288);
    }

    #[test]
    fn ragged_input_rejected() {
        let bits = vec![0u8; 5];
        assert!(modulate(&bits, Rate::Qam16Half).is_err());
    }

    #[test]
    fn constellation_energy_is_normalised() {
        for rate in [Rate::Qam16Half, Rate::Qam64TwoThirds] {
            let bpsc = rate.params().bpsc;
            let nsym = 1usize << bpsc;
            // Enumerate every symbol once.
            let mut bits = Vec::new();
            for v in 0..nsym {
                for k in (0..bpsc).rev() {
                    bits.push(((v >> k) & 1) as u8);
                }
            }
            let samples = modulate(&bits, rate).unwrap();
            let mean_energy: f64 =
                samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64;
            assert!((mean_energy - 1.0).abs() < 1e-12, "rate {rate:?}");
        }
    }
}
