//! PHY rate table
//!
//! Each rate fixes the subcarrier modulation and the convolutional code
//! rate. The derived per-symbol bit counts are carried in [`RateParams`]:
//! `bpsc` bits per subcarrier, `cbps` coded bits per OFDM symbol and `dbps`
//! data bits per OFDM symbol.

use serde::{Deserialize, Serialize};

/// Supported PHY rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rate {
    /// BPSK, rate-1/2 code
    BpskHalf,
    /// 16-QAM, rate-1/2 code
    Qam16Half,
    /// 64-QAM, rate-2/3 code
    Qam64TwoThirds,
    /// 16-QAM, rate-3/4 code
    Qam16ThreeQuarters,
}

/// Bit counts associated with a [`Rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateParams {
    pub rate: Rate,
    /// Bits per subcarrier
    pub bpsc: usize,
    /// Coded bits per OFDM symbol
    pub cbps: usize,
    /// Data bits per OFDM symbol
    pub dbps: usize,
}

impl RateParams {
    pub const fn of(rate: Rate) -> Self {
        match rate {
            Rate::BpskHalf => Self {
                rate,
                bpsc: 1,
                cbps: 48,
                dbps: 24,
            },
            Rate::Qam16Half => Self {
                rate,
                bpsc: 4,
                cbps: 192,
                dbps: 96,
            },
            Rate::Qam64TwoThirds => Self {
                rate,
                bpsc: 6,
                cbps: 288,
                dbps: 192,
            },
            Rate::Qam16ThreeQuarters => Self {
                rate,
                bpsc: 4,
                cbps: 192,
                dbps: 144,
            },
        }
    }
}

impl Rate {
    pub const fn params(self) -> RateParams {
        RateParams::of(self)
    }

    pub const ALL: [Rate; 4] = [
        Rate::BpskHalf,
        Rate::Qam16Half,
        Rate::Qam64TwoThirds,
        Rate::Qam16ThreeQuarters,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_bits_match_modulation() {
        for rate in Rate::ALL {
            let p = rate.params();
            // 48 data subcarriers per symbol in the legacy allocation
            assert_eq!(p.cbps, 48 * p.bpsc);
            assert!(p.dbps <= p.cbps);
        }
    }

    #[test]
    fn code_rates() {
        assert_eq!(Rate::BpskHalf.params().dbps * 2, Rate::BpskHalf.params().cbps);
        assert_eq!(Rate::Qam16Half.params().dbps * 2, Rate::Qam16Half.params().cbps);
        assert_eq!(Rate::Qam64TwoThirds.params().dbps * 3, Rate::Qam64TwoThirds.params().cbps * 2);
        assert_eq!(Rate::Qam16ThreeQuarters.params().dbps * 4, Rate::Qam16ThreeQuarters.params().cbps * 3);
    }
}
