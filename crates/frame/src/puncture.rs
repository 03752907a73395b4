//! Code-rate puncturing (legacy encode path)
//!
//! The rate-1/2 mother code is punctured up to 2/3 or 3/4 by dropping
//! coded bits in a fixed pattern; the depuncturer restores the dropped
//! positions as erasures for the Viterbi decoder.

use crate::fec::ERASURE;
use ulofdm_core::rates::Rate;

/// Bits kept (true) per pattern period for a rate, or `None` for the
/// unpunctured 1/2 rates.
fn pattern(rate: Rate) -> Option<&'static [bool]> {
    match rate {
        Rate::BpskHalf | Rate::Qam16Half => None,
        Rate::Qam64TwoThirds => Some(&[true, true, true, false]),
        Rate::Qam16ThreeQuarters => Some(&[true, true, true, false, false, true]),
    }
}

/// Drop coded bits according to the rate's puncturing pattern.
pub fn puncture(bits: &[u8], rate: Rate) -> Vec<u8> {
    let Some(pattern) = pattern(rate) else {
        return bits.to_vec();
    };
    bits.iter()
        .enumerate()
        .filter(|(i, _)| pattern[i % pattern.len()])
        .map(|(_, b)| *b)
        .collect()
}

/// Re-insert the dropped positions as erasures.
pub fn depuncture(bits: &[u8], rate: Rate) -> Vec<u8> {
    let Some(pattern) = pattern(rate) else {
        return bits.to_vec();
    };
    let mut out = Vec::with_capacity(bits.len() * 2);
    let mut input = bits.iter();
    'outer: loop {
        for keep in pattern {
            if *keep {
                match input.next() {
                    Some(b) => out.push(*b),
                    None => break 'outer,
                }
            } else {
                out.push(ERASURE);
            }
        }
    }
    out
}
