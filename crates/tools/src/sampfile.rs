//! Raw sample file I/O
//!
//! The offline tools exchange baseband recordings as raw concatenations of
//! little-endian `(f64 re, f64 im)` pairs, the same format the frame
//! builder uses for its overlay dump.

use anyhow::{ensure, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use ulofdm_core::Sample;

/// Read a whole sample file into memory.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let len = file.metadata()?.len();
    ensure!(
        len % 16 == 0,
        "{} is not a whole number of complex samples",
        path.display()
    );

    let mut reader = BufReader::new(file);
    let mut samples = Vec::with_capacity((len / 16) as usize);
    for _ in 0..len / 16 {
        let re = reader.read_f64::<LittleEndian>()?;
        let im = reader.read_f64::<LittleEndian>()?;
        samples.push(Sample::new(re, im));
    }
    Ok(samples)
}

/// Write samples to a file, replacing any existing content.
pub fn write_samples(path: &Path, samples: &[Sample]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writer.write_f64::<LittleEndian>(sample.re)?;
        writer.write_f64::<LittleEndian>(sample.im)?;
    }
    writer.flush()?;
    Ok(())
}
