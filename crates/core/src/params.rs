//! Link parameters
//!
//! Everything here is fixed at compile time or passed in at construction;
//! there is no runtime configuration layer. The subcarrier allocation must
//! be identical on both ends of the link or decoding is undefined.

use serde::{Deserialize, Serialize};

/// Samples pulled from the radio per receive tick.
pub const NUM_RX_SAMPLES: usize = 1600;

/// Largest payload the codec accepts, in bytes.
pub const MAX_FRAME_SIZE: usize = 2000;

/// Default subcarrier allocation: 32 active subcarriers on bits 12..=43.
pub const DEFAULT_SC_MAP: u64 = 0x0000_0FFF_FFFF_F000;

/// Underlay amplitude relative to the unit-amplitude overlay (about 16 dB
/// below).
pub const UL_AMP: f64 = 0.0159;

/// Normalised correlation magnitude that declares a PN peak.
pub const COEFF_THRESH: f64 = 0.10;

/// Correlation magnitude that refreshes the lock unconditionally.
pub const UPPER_COEFF_THRESH: f64 = 0.15;

/// Half-width, in samples, of the search window around an expected peak
/// once the correlator is locked.
pub const SEARCH_WINDOW: usize = 10;

/// Front-end parameters handed to the radio at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioParams {
    /// Center frequency in Hz
    pub freq: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Transmit gain in dB
    pub tx_gain: f64,
    /// Receive gain in dB
    pub rx_gain: f64,
    /// Transmit amplitude scale in [0, 1]
    pub tx_amp: f64,
    /// Device address string, empty for the first device found
    pub device_addr: String,
}

impl Default for RadioParams {
    fn default() -> Self {
        Self {
            freq: 5.26e9,
            sample_rate: 5e6,
            tx_gain: 30.0,
            rx_gain: 30.0,
            tx_amp: 0.5,
            device_addr: String::new(),
        }
    }
}
