//! Pseudo-noise signalling sequence
//!
//! The underlay modulates this fixed 64-entry sequence beneath the OFDM
//! waveform, one polarity bit per repetition. Zero entries line up with the
//! guard subcarriers and contribute nothing to the correlation.

/// Length of one PN repetition in samples.
pub const PN_SIZE: usize = 64;

/// The signalling PN sequence. Purely real, values in {-1, 0, +1}.
#[rustfmt::skip]
pub const SPNS: [f64; PN_SIZE] = [
     0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,  1.0,  1.0, -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,
     0.0,  1.0, -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0, -1.0, -1.0, -1.0, -1.0,  1.0,
     1.0, -1.0, -1.0,  1.0, -1.0,  1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,  0.0,  0.0,  0.0,  0.0,  0.0,
];

/// Mean of the PN sequence, used by the normalised correlation.
pub fn spns_mean() -> f64 {
    SPNS.iter().sum::<f64>() / PN_SIZE as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_positions_are_zero() {
        for i in (0..6).chain([32]).chain(59..64) {
            assert_eq!(SPNS[i], 0.0, "index {i}");
        }
    }

    #[test]
    fn active_positions_are_bipolar() {
        let active = SPNS.iter().filter(|v| **v != 0.0).count();
        assert_eq!(active, 52);
        assert!(SPNS.iter().all(|v| *v == 0.0 || v.abs() == 1.0));
    }
}
