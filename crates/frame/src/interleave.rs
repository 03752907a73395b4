//! Bit interleaver (legacy encode path)
//!
//! The classic two-permutation OFDM block interleaver: adjacent coded bits
//! are first spread across non-adjacent subcarriers, then alternated
//! between constellation bit positions of differing reliability. It
//! operates on one OFDM symbol of `cbps` coded bits at a time.

use crate::{FrameError, Result};

fn permutation(cbps: usize, bpsc: usize) -> Vec<usize> {
    let s = (bpsc / 2).max(1);
    let mut perm = vec![0usize; cbps];
    for (k, slot) in perm.iter_mut().enumerate() {
        let i = (cbps / 16) * (k % 16) + k / 16;
        let j = s * (i / s) + (i + cbps - 16 * i / cbps) % s;
        *slot = j;
    }
    perm
}

fn check_len(bits: &[u8], cbps: usize) -> Result<()> {
    if bits.len() % cbps != 0 {
        return Err(FrameError::SizeMismatch {
            expected: cbps,
            actual: bits.len(),
        });
    }
    Ok(())
}

/// Interleave coded bits symbol by symbol.
pub fn interleave(bits: &[u8], cbps: usize, bpsc: usize) -> Result<Vec<u8>> {
    check_len(bits, cbps)?;
    let perm = permutation(cbps, bpsc);
    let mut out = vec![0u8; bits.len()];
    for (sym, chunk) in bits.chunks_exact(cbps).enumerate() {
        let base = sym * cbps;
        for (k, bit) in chunk.iter().enumerate() {
            out[base + perm[k]] = *bit;
        }
    }
    Ok(out)
}

/// Undo [`interleave`].
pub fn deinterleave(bits: &[u8], cbps: usize, bpsc: usize) -> Result<Vec<u8>> {
    check_len(bits, cbps)?;
    let perm = permutation(cbps, bpsc);
    let mut out = vec![0u8; bits.len()];
    for (sym, chunk) in bits.chunks_exact(cbps).enumerate() {
        let base = sym * cbps;
        for (k, slot) in out[base..base + cbps].iter_mut().enumerate() {
            *slot = chunk[perm[k]];
        }
    }
    Ok(out)
}
