//! Legacy 802.11a-style preamble
//!
//! Ten repetitions of the 16-sample short training symbol followed by a
//! double guard interval and two 64-sample long training symbols, 320
//! samples in total. Only the legacy (non-underlay) builder prepends it;
//! the underlay pipeline derives frame timing from the PN correlator
//! instead. The time-domain samples are synthesised once from the standard
//! frequency-domain training sequences.

use crate::fft::Fft64;
use crate::pn::SPNS;
use crate::Sample;
use std::sync::LazyLock;

/// Total preamble length in samples.
pub const PREAMBLE_LEN: usize = 320;

/// Frequency-domain short training sequence (64 bins, FFT order).
fn short_training_bins() -> Vec<Sample> {
    let scale = (13.0f64 / 6.0).sqrt();
    let p = Sample::new(scale, scale);
    let n = -p;
    let mut bins = vec![Sample::default(); 64];
    bins[4] = n;
    bins[8] = n;
    bins[12] = p;
    bins[16] = p;
    bins[20] = p;
    bins[24] = p;
    bins[40] = p;
    bins[44] = n;
    bins[48] = p;
    bins[52] = n;
    bins[56] = n;
    bins[60] = p;
    bins
}

/// The 320 preamble samples: 160 of short training, 32 of guard, 2 x 64 of
/// long training.
pub static PREAMBLE: LazyLock<Vec<Sample>> = LazyLock::new(|| {
    let mut fft = Fft64::new();

    let mut short_sym = short_training_bins();
    fft.inverse(&mut short_sym).expect("64-bin buffer");

    // The long training bins double as the underlay PN sequence.
    let mut long_sym: Vec<Sample> = SPNS.iter().map(|v| Sample::new(*v, 0.0)).collect();
    fft.inverse(&mut long_sym).expect("64-bin buffer");

    let mut samples = Vec::with_capacity(PREAMBLE_LEN);
    // Short training is periodic with period 16; extend it to 160 samples.
    for i in 0..160 {
        samples.push(short_sym[i % 64]);
    }
    // Double guard interval, then the long symbol twice.
    samples.extend_from_slice(&long_sym[32..]);
    samples.extend_from_slice(&long_sym);
    samples.extend_from_slice(&long_sym);
    samples
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_length() {
        assert_eq!(PREAMBLE.len(), PREAMBLE_LEN);
    }

    #[test]
    fn short_section_is_16_periodic() {
        for i in 0..144 {
            assert!((PREAMBLE[i] - PREAMBLE[i + 16]).norm() < 1e-12);
        }
    }

    #[test]
    fn guard_copies_long_symbol_tail() {
        // Samples 160..192 must equal the tail of the long symbol at 224..256.
        for i in 0..32 {
            assert!((PREAMBLE[160 + i] - PREAMBLE[224 + i]).norm() < 1e-12);
        }
        // The two long symbols are identical.
        for i in 0..64 {
            assert!((PREAMBLE[192 + i] - PREAMBLE[256 + i]).norm() < 1e-12);
        }
    }
}
