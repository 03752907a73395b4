//! 64-point FFT wrapper
//!
//! OFDM symbols are always 64 samples wide, so the planner is set up once
//! for that size and both directions operate in place over contiguous
//! 64-sample blocks.

use crate::{CoreError, Result, Sample};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Number of subcarriers in one OFDM symbol.
pub const SYMBOL_SIZE: usize = 64;

/// In-place 64-point transform over contiguous symbol blocks.
pub struct Fft64 {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Sample>,
}

impl Fft64 {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(SYMBOL_SIZE);
        let inverse = planner.plan_fft_inverse(SYMBOL_SIZE);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let scratch = vec![Sample::default(); scratch_len];

        Self {
            forward,
            inverse,
            scratch,
        }
    }

    fn check_len(buf: &[Sample]) -> Result<()> {
        if buf.len() % SYMBOL_SIZE != 0 {
            return Err(CoreError::BufferSizeMismatch {
                expected: SYMBOL_SIZE,
                actual: buf.len(),
            });
        }
        Ok(())
    }

    /// Forward FFT of each 64-sample block of `buf`, in place.
    pub fn forward(&mut self, buf: &mut [Sample]) -> Result<()> {
        Self::check_len(buf)?;
        self.forward.process_with_scratch(buf, &mut self.scratch);
        Ok(())
    }

    /// Inverse FFT of each 64-sample block of `buf`, in place, normalized
    /// so that `inverse(forward(x)) == x`.
    pub fn inverse(&mut self, buf: &mut [Sample]) -> Result<()> {
        Self::check_len(buf)?;
        self.inverse.process_with_scratch(buf, &mut self.scratch);
        let scale = 1.0 / SYMBOL_SIZE as f64;
        for sample in buf.iter_mut() {
            *sample *= scale;
        }
        Ok(())
    }
}

impl Default for Fft64 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_recovers_input() {
        let mut fft = Fft64::new();
        let mut buf: Vec<Sample> = (0..SYMBOL_SIZE)
            .map(|i| Sample::new(i as f64 * 0.25, -(i as f64) * 0.5))
            .collect();
        let original = buf.clone();

        fft.forward(&mut buf).unwrap();
        fft.inverse(&mut buf).unwrap();

        for (a, b) in original.iter().zip(buf.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }

    #[test]
    fn processes_multiple_blocks() {
        let mut fft = Fft64::new();
        // An impulse in each of three blocks transforms to an all-ones block.
        let mut buf = vec![Sample::default(); 3 * SYMBOL_SIZE];
        for block in 0..3 {
            buf[block * SYMBOL_SIZE] = Sample::new(1.0, 0.0);
        }
        fft.forward(&mut buf).unwrap();
        for sample in &buf {
            assert!((sample.re - 1.0).abs() < 1e-12);
            assert!(sample.im.abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_partial_blocks() {
        let mut fft = Fft64::new();
        let mut buf = vec![Sample::default(); 63];
        assert!(fft.forward(&mut buf).is_err());
        assert!(fft.inverse(&mut buf).is_err());
    }
}
