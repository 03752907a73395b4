//! ulofdm modem - modulation and subcarrier layer
//!
//! This crate maps coded bits onto subcarrier constellations, places them
//! on the active subcarriers of an OFDM symbol, and adds the low-power PN
//! underlay on top of the assembled waveform.

pub mod error;
pub mod mapper;
pub mod qam;
pub mod underlay;

pub use error::{ModemError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        error::{ModemError, Result},
        mapper::{ScKind, SubcarrierMapper},
        underlay::{pn_correlation, UnderlayAdder},
    };
}
