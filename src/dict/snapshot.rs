//! Compiled snapshot I/O (ENDX format).
//!
//! A snapshot is the parsed record store behind a magic-and-version header:
//! the slow text parse happens once at compile time, and `open` rebuilds
//! the key index deterministically from the records rather than trusting
//! serialized offsets.
//!
//! Layout: `ENDX` magic, one version byte, bincode-encoded `Vec<NameRecord>`.

use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;

use super::DictError;
use crate::record::NameRecord;

pub(crate) const MAGIC: &[u8; 4] = b"ENDX";
const VERSION: u8 = 1;

pub(crate) fn to_bytes(records: &[NameRecord]) -> Result<Vec<u8>, DictError> {
    let body = bincode::serialize(records).map_err(DictError::Serialize)?;
    let mut buf = Vec::with_capacity(5 + body.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&body);
    Ok(buf)
}

pub(crate) fn from_bytes(data: &[u8]) -> Result<Vec<NameRecord>, DictError> {
    if data.len() < 5 {
        return Err(DictError::InvalidHeader);
    }
    if &data[..4] != MAGIC {
        return Err(DictError::InvalidMagic);
    }
    if data[4] != VERSION {
        return Err(DictError::UnsupportedVersion(data[4]));
    }
    bincode::deserialize(&data[5..]).map_err(DictError::Deserialize)
}

pub(crate) fn save(records: &[NameRecord], path: &Path) -> Result<(), DictError> {
    Ok(fs::write(path, to_bytes(records)?)?)
}

/// Read a snapshot file, using mmap to avoid doubling peak memory while
/// the record store is deserialized.
pub(crate) fn open(path: &Path) -> Result<Vec<NameRecord>, DictError> {
    let file = File::open(path)?;
    // SAFETY: The file is opened read-only and the mapping is immutable.
    // The Mmap is dropped after deserialization completes below.
    let mmap = unsafe { Mmap::map(&file)? };
    from_bytes(&mmap)
}
