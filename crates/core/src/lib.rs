//! ulofdm core - DSP primitives and PHY constants
//!
//! This crate provides the shared foundations of the ulofdm link: the
//! 64-point FFT wrapper, the PHY rate table, the pseudo-noise sequence used
//! by the underlay, the legacy preamble and the compile-time parameters.

pub mod error;
pub mod fft;
pub mod params;
pub mod pn;
pub mod preamble;
pub mod rates;

pub use error::{CoreError, Result};

/// Complex baseband sample type used on every wire of the link.
pub type Sample = num_complex::Complex64;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        error::{CoreError, Result},
        fft::Fft64,
        params::RadioParams,
        pn::{PN_SIZE, SPNS},
        rates::{Rate, RateParams},
        Sample,
    };
}
