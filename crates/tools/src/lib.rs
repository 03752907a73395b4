//! Shared helpers for the ulofdm CLI tools

pub mod sampfile;

use anyhow::{bail, Result};
use ulofdm_core::rates::Rate;

/// Parse a PHY rate name from the command line.
pub fn parse_rate(name: &str) -> Result<Rate> {
    match name {
        "bpsk" => Ok(Rate::BpskHalf),
        "qam16" => Ok(Rate::Qam16Half),
        "qam16-3-4" => Ok(Rate::Qam16ThreeQuarters),
        "qam64" => Ok(Rate::Qam64TwoThirds),
        _ => bail!("unknown rate '{name}' (expected bpsk, qam16, qam16-3-4 or qam64)"),
    }
}

/// Parse a subcarrier allocation mask given as hex, with or without `0x`.
pub fn parse_sc_map(text: &str) -> Result<u64> {
    let digits = text.trim_start_matches("0x").replace('_', "");
    Ok(u64::from_str_radix(&digits, 16)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_names() {
        assert_eq!(parse_rate("bpsk").unwrap(), Rate::BpskHalf);
        assert_eq!(parse_rate("qam64").unwrap(), Rate::Qam64TwoThirds);
        assert!(parse_rate("qpsk").is_err());
    }

    #[test]
    fn sc_map_forms() {
        assert_eq!(parse_sc_map("0x00000ffffffff000").unwrap(), 0x0000_0FFF_FFFF_F000);
        assert_eq!(parse_sc_map("ff00").unwrap(), 0xFF00);
        assert_eq!(parse_sc_map("0x0000_0FFF_FFFF_F000").unwrap(), 0x0000_0FFF_FFFF_F000);
        assert!(parse_sc_map("zz").is_err());
    }
}
