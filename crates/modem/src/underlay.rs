//! PN underlay
//!
//! The underlay rides a fixed pseudo-noise sequence a configurable 12-20 dB
//! below the overlay waveform. Each PN repetition carries one bit as the
//! polarity of the block, and the polarity alternates deterministically so
//! the receiver can verify both magnitude and sign of the correlation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use ulofdm_core::params::UL_AMP;
use ulofdm_core::pn::{spns_mean, PN_SIZE, SPNS};
use ulofdm_core::Sample;

/// Adds the PN underlay on top of an overlay sample stream.
///
/// The polarity bit persists across invocations so back-to-back bursts keep
/// a continuous alternating pattern.
pub struct UnderlayAdder {
    amplitude: f64,
    polarity: f64,
    noise: Option<(Normal<f64>, StdRng)>,
}

impl UnderlayAdder {
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude,
            polarity: 1.0,
            noise: None,
        }
    }

    /// Simulation only: add i.i.d. Gaussian noise of the given standard
    /// deviation on top of the combined waveform.
    pub fn with_noise(mut self, sigma: f64) -> Self {
        let normal = Normal::new(0.0, sigma).expect("finite sigma");
        self.noise = Some((normal, StdRng::from_entropy()));
        self
    }

    /// Add the underlay to `overlay`, one PN-sequence entry per sample,
    /// flipping the polarity at every PN block boundary.
    pub fn add(&mut self, overlay: &[Sample]) -> Vec<Sample> {
        let mut output = Vec::with_capacity(overlay.len());
        for (i, sample) in overlay.iter().enumerate() {
            let k = i % PN_SIZE;
            let mut combined = *sample + Sample::new(self.polarity * self.amplitude * SPNS[k], 0.0);
            if let Some((normal, rng)) = self.noise.as_mut() {
                combined += Sample::new(normal.sample(rng), 0.0);
            }
            output.push(combined);
            if k == PN_SIZE - 1 {
                self.polarity = -self.polarity;
            }
        }
        output
    }
}

impl Default for UnderlayAdder {
    fn default() -> Self {
        Self::new(UL_AMP)
    }
}

/// Signed normalised cross-correlation of a PN-sized window against the PN
/// sequence.
///
/// Both means are subtracted so the surrounding overlay energy acts as an
/// offset rather than a bias; the sign of the real part carries the
/// underlay bit. Returns 0.00001 when the window has no variance.
pub fn pn_correlation(window: &[Sample]) -> f64 {
    debug_assert_eq!(window.len(), PN_SIZE);
    let n = PN_SIZE as f64;
    let pn_mean = spns_mean();

    let mut dot = Sample::default();
    let mut sqr_sum = 0.0;
    let mut mean = Sample::default();
    for (sample, pn) in window.iter().zip(SPNS.iter()) {
        dot += *sample * *pn;
        sqr_sum += sample.norm_sqr();
        mean += *sample;
    }
    mean /= n;

    let numerator = dot - mean * (n * pn_mean);
    let variance = sqr_sum - n * mean.norm_sqr();
    if variance <= 0.0 {
        return 0.00001;
    }
    let denominator = variance.sqrt() * n.sqrt();

    let coeff = numerator.norm() / denominator;
    if numerator.re > 0.0 {
        coeff
    } else {
        -coeff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_alternates_per_block() {
        let mut adder = UnderlayAdder::new(0.5);
        let overlay = vec![Sample::default(); 4 * PN_SIZE];
        let out = adder.add(&overlay);

        for block in 0..4 {
            let expected = if block % 2 == 0 { 1.0 } else { -1.0 };
            for k in 0..PN_SIZE {
                let v = out[block * PN_SIZE + k];
                assert!((v.re - expected * 0.5 * SPNS[k]).abs() < 1e-12);
                assert_eq!(v.im, 0.0);
            }
        }
    }

    #[test]
    fn polarity_persists_across_calls() {
        let mut adder = UnderlayAdder::new(1.0);
        let first = adder.add(&vec![Sample::default(); PN_SIZE]);
        let second = adder.add(&vec![Sample::default(); PN_SIZE]);
        assert!((first[6].re - SPNS[6]).abs() < 1e-12);
        assert!((second[6].re + SPNS[6]).abs() < 1e-12);
    }

    #[test]
    fn output_matches_input_length() {
        let mut adder = UnderlayAdder::default();
        // Deliberately not a multiple of the PN size.
        let out = adder.add(&vec![Sample::default(); 150]);
        assert_eq!(out.len(), 150);
    }

    #[test]
    fn correlation_peaks_on_clean_pn() {
        let window: Vec<Sample> = SPNS.iter().map(|v| Sample::new(*v, 0.0)).collect();
        let coeff = pn_correlation(&window);
        assert!(coeff > 0.9, "coeff = {coeff}");

        let flipped: Vec<Sample> = SPNS.iter().map(|v| Sample::new(-*v, 0.0)).collect();
        let coeff = pn_correlation(&flipped);
        assert!(coeff < -0.9, "coeff = {coeff}");
    }

    #[test]
    fn correlation_degenerate_window() {
        let window = vec![Sample::default(); PN_SIZE];
        assert_eq!(pn_correlation(&window), 0.00001);
    }

    #[test]
    fn correlation_ignores_constant_offset() {
        let clean: Vec<Sample> = SPNS.iter().map(|v| Sample::new(*v, 0.0)).collect();
        let offset: Vec<Sample> = SPNS.iter().map(|v| Sample::new(*v + 5.0, 0.0)).collect();
        let a = pn_correlation(&clean);
        let b = pn_correlation(&offset);
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    #[test]
    fn correlation_small_on_unrelated_signal() {
        let window: Vec<Sample> = (0..PN_SIZE)
            .map(|i| Sample::new((i as f64 * 0.371).sin(), (i as f64 * 0.783).cos()))
            .collect();
        let coeff = pn_correlation(&window);
        assert!(coeff.abs() < 0.5, "coeff = {coeff}");
    }
}
