//! Frame checksum
//!
//! IEEE CRC-32 (polynomial 0x04C11DB7, reflected input and output, initial
//! value and final XOR 0xFFFFFFFF). The transmitter appends it
//! little-endian after the payload; the receiver accepts a frame only on a
//! bit-exact match.

/// CRC-32 over `data`.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// True when the four bytes following `data[..length]` hold its CRC-32.
pub fn verify(data: &[u8], length: usize) -> bool {
    if data.len() < length + 4 {
        return false;
    }
    let given = u32::from_le_bytes([
        data[length],
        data[length + 1],
        data[length + 2],
        data[length + 3],
    ]);
    crc32(&data[..length]) == given
}
