//! Upstream ENAMDICT acquisition and conversion.
//!
//! The engine ingests the sorted pipe-delimited record format only; this
//! module is the one-time collaborator that produces it. `fetch` downloads
//! the gzip-compressed EUC-JP dictionary as distributed upstream, and
//! `convert` decodes it, filters it down to personal-name records, sorts by
//! (normalized key, raw romaji), and writes the pipe format.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::normalize::normalize;
use crate::record::NameRecord;

/// Upstream location of the gzip-compressed EUC-JP ENAMDICT file.
pub const ENAMDICT_URL: &str = "http://ftp.monash.edu.au/pub/nihongo/enamdict.gz";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("EUC-JP decode error in {0}")]
    Decode(String),
}

/// Counts reported by `convert`, for CLI display.
#[derive(Debug, Clone, Copy)]
pub struct ConvertStats {
    pub total_lines: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Download the upstream dictionary archive to `dest`.
pub fn fetch(url: &str, dest: &Path) -> Result<(), SourceError> {
    let body = ureq::get(url)
        .call()
        .map_err(|e| SourceError::Http(format!("{url}: {e}")))?
        .into_body()
        .read_to_vec()
        .map_err(|e| SourceError::Http(format!("{url}: {e}")))?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, &body)?;
    Ok(())
}

/// Convert a raw upstream file into the sorted pipe-delimited record format.
///
/// The input may be gzip-compressed or plain, and is decoded from EUC-JP.
/// The output is written gzip-compressed when `output` ends in `.gz`,
/// plain text otherwise.
pub fn convert(input: &Path, output: &Path) -> Result<ConvertStats, SourceError> {
    let raw = fs::read(input)?;
    let text = decode_euc_jp(input, &raw)?;

    let mut total_lines = 0usize;
    let mut records: Vec<NameRecord> = Vec::new();
    for line in text.lines() {
        total_lines += 1;
        if let Some(rec) = NameRecord::from_enamdict_line(line) {
            records.push(rec);
        }
    }
    let skipped = total_lines - records.len();
    debug!(total_lines, parsed = records.len(), skipped, "parsed upstream dictionary");

    records.sort_by_cached_key(|rec| (normalize(&rec.romaji), rec.romaji.clone()));

    let mut body = String::new();
    for rec in &records {
        body.push_str(&rec.to_pipe_line());
        body.push('\n');
    }
    write_output(output, body.as_bytes())?;

    Ok(ConvertStats {
        total_lines,
        records: records.len(),
        skipped,
    })
}

fn decode_euc_jp(path: &Path, raw: &[u8]) -> Result<String, SourceError> {
    let bytes = if raw.starts_with(&[0x1f, 0x8b]) {
        let mut decoded = Vec::new();
        GzDecoder::new(raw).read_to_end(&mut decoded)?;
        decoded
    } else {
        raw.to_vec()
    };

    encoding_rs::EUC_JP
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .map(|s| s.into_owned())
        .ok_or_else(|| SourceError::Decode(path.display().to_string()))
}

fn write_output(path: &Path, body: &[u8]) -> Result<(), SourceError> {
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
        encoder.write_all(body)?;
        encoder.finish()?;
    } else {
        fs::write(path, body)?;
    }
    Ok(())
}
