//! Subcarrier mapper
//!
//! Places modulated data samples onto the active subcarriers of each OFDM
//! symbol, inserts pilots and nulls, and extracts the data positions again
//! on the receive side. The allocation is a 64-bit mask with bit k set for
//! an active subcarrier k; every 8th active subcarrier carries a pilot.

use crate::{ModemError, Result};
use tracing::debug;
use ulofdm_core::Sample;

/// Role of one subcarrier position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScKind {
    Null,
    Data,
    Pilot,
}

/// Pilot values per symbol; the fourth pilot is inverted.
const PILOTS: [f64; 4] = [1.0, 1.0, 1.0, -1.0];

/// Polarity sequence multiplied onto the pilots, indexed by OFDM symbol
/// number modulo 127.
#[rustfmt::skip]
const POLARITY: [f64; 127] = [
     1.0,  1.0,  1.0,  1.0, -1.0, -1.0, -1.0,  1.0, -1.0, -1.0, -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0,  1.0,
     1.0,  1.0, -1.0,  1.0,  1.0, -1.0, -1.0,  1.0,  1.0,  1.0, -1.0,  1.0, -1.0, -1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0, -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0, -1.0,  1.0, -1.0,  1.0,  1.0, -1.0, -1.0, -1.0,  1.0,  1.0, -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0, -1.0,  1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0, -1.0, -1.0,  1.0,  1.0,  1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
];

/// Data/pilot/null layout of one 64-subcarrier OFDM symbol.
#[derive(Debug, Clone)]
pub struct SubcarrierMapper {
    active_map: [ScKind; 64],
    data_sc_count: usize,
    pilot_count: usize,
}

impl SubcarrierMapper {
    /// Build the active map from the allocation mask. Walks bits 0..63 in
    /// order; every 8th active subcarrier (counting from 1) becomes a
    /// pilot, the rest carry data.
    pub fn new(sc_map: u64) -> Result<Self> {
        let mut active_map = [ScKind::Null; 64];
        let mut active = 0usize;
        let mut pilot_count = 0usize;
        for (k, slot) in active_map.iter_mut().enumerate() {
            if (sc_map >> k) & 1 == 1 {
                active += 1;
                if active % 8 == 0 {
                    *slot = ScKind::Pilot;
                    pilot_count += 1;
                } else {
                    *slot = ScKind::Data;
                }
            }
        }
        let data_sc_count = sc_map.count_ones() as usize - pilot_count;
        if data_sc_count == 0 {
            return Err(ModemError::EmptyScMap { map: sc_map });
        }
        debug!(
            sc_map,
            data = data_sc_count,
            pilots = pilot_count,
            "subcarrier map built"
        );

        Ok(Self {
            active_map,
            data_sc_count,
            pilot_count,
        })
    }

    pub fn data_subcarriers(&self) -> usize {
        self.data_sc_count
    }

    pub fn pilot_subcarriers(&self) -> usize {
        self.pilot_count
    }

    pub fn active_map(&self) -> &[ScKind; 64] {
        &self.active_map
    }

    /// Map modulated data samples into OFDM symbols of 64 subcarriers each.
    /// The input length must be a multiple of the data subcarrier count;
    /// the symbol counter that drives the pilot polarity starts at 0, so one
    /// call corresponds to one frame.
    pub fn map(&self, data_samples: &[Sample]) -> Result<Vec<Sample>> {
        if data_samples.len() % self.data_sc_count != 0 {
            return Err(ModemError::RaggedSampleCount {
                count: data_samples.len(),
                multiple: self.data_sc_count,
            });
        }

        let num_symbols = data_samples.len() / self.data_sc_count;
        let mut samples = Vec::with_capacity(num_symbols * 64);
        let mut in_index = 0usize;
        for sym in 0..num_symbols {
            let polarity = POLARITY[sym % POLARITY.len()];
            let mut pilot_index = 0usize;
            for kind in &self.active_map {
                match kind {
                    ScKind::Null => samples.push(Sample::default()),
                    ScKind::Data => {
                        samples.push(data_samples[in_index]);
                        in_index += 1;
                    }
                    ScKind::Pilot => {
                        samples.push(Sample::new(PILOTS[pilot_index % PILOTS.len()] * polarity, 0.0));
                        pilot_index += 1;
                    }
                }
            }
        }
        Ok(samples)
    }

    /// Extract the data subcarriers from received symbols, discarding the
    /// pilots and nulls. The input length must be a multiple of 64.
    pub fn demap(&self, samples: &[Sample]) -> Result<Vec<Sample>> {
        if samples.len() % 64 != 0 {
            return Err(ModemError::RaggedSampleCount {
                count: samples.len(),
                multiple: 64,
            });
        }

        let mut data_samples = Vec::with_capacity(samples.len() / 64 * self.data_sc_count);
        for (x, sample) in samples.iter().enumerate() {
            if self.active_map[x % 64] == ScKind::Data {
                data_samples.push(*sample);
            }
        }
        Ok(data_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn default_map_counts() {
        let mapper = SubcarrierMapper::new(ulofdm_core::params::DEFAULT_SC_MAP).unwrap();
        assert_eq!(mapper.data_subcarriers(), 28);
        assert_eq!(mapper.pilot_subcarriers(), 4);
    }

    #[test]
    fn pilots_on_every_eighth_active_position() {
        let mapper = SubcarrierMapper::new(0x00FF_FF00).unwrap();
        assert_eq!(mapper.pilot_subcarriers(), 2);
        assert_eq!(mapper.data_subcarriers(), 14);

        let mut active = 0;
        for kind in mapper.active_map() {
            if *kind != ScKind::Null {
                active += 1;
                let expected = if active % 8 == 0 {
                    ScKind::Pilot
                } else {
                    ScKind::Data
                };
                assert_eq!(*kind, expected);
            }
        }
    }

    #[quickcheck]
    fn counts_partition_the_mask(sc_map: u64) -> bool {
        match SubcarrierMapper::new(sc_map) {
            Ok(mapper) => {
                mapper.data_subcarriers() + mapper.pilot_subcarriers()
                    == sc_map.count_ones() as usize
            }
            // Only the empty mask has no data subcarriers.
            Err(_) => sc_map == 0,
        }
    }

    #[quickcheck]
    fn demap_inverts_map(seed: u64) -> bool {
        let mapper = SubcarrierMapper::new(ulofdm_core::params::DEFAULT_SC_MAP).unwrap();
        let n = mapper.data_subcarriers() * (1 + (seed % 7) as usize);
        let data: Vec<Sample> = (0..n)
            .map(|i| {
                let v = (seed.wrapping_mul(i as u64 + 1) % 1000) as f64 / 500.0 - 1.0;
                Sample::new(v, -v * 0.5)
            })
            .collect();
        let mapped = mapper.map(&data).unwrap();
        mapped.len() == n / mapper.data_subcarriers() * 64 && mapper.demap(&mapped).unwrap() == data
    }

    #[test]
    fn ragged_inputs_rejected() {
        let mapper = SubcarrierMapper::new(ulofdm_core::params::DEFAULT_SC_MAP).unwrap();
        assert!(mapper.map(&[Sample::default(); 27]).is_err());
        assert!(mapper.demap(&[Sample::default(); 63]).is_err());
    }
}
