//! Dictionary storage and the name-resolution search engine.
//!
//! `NameDictionary` owns an immutable record store plus a first-position
//! key index, and answers `find` / `find_kanji` / `find_by_name` queries
//! synchronously. A dictionary is write-once: every load builds a fresh
//! value, and a failed load yields no value at all.

mod index;
mod snapshot;
#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, debug_span};

use crate::compose::{CompositeName, NameToken};
use crate::entries::{EntrySet, SearchField};
use crate::normalize::normalize;
use crate::pattern::RomajiPattern;
use crate::record::NameRecord;

use index::KeyIndex;

/// Unified error type for dictionary ingestion and snapshot I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid snapshot header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected ENDX)")]
    InvalidMagic,

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// An in-memory name dictionary.
///
/// Immutable after construction, so queries from multiple threads need no
/// locking; to replace the data, build a new value.
#[derive(Debug)]
pub struct NameDictionary {
    records: Vec<NameRecord>,
    index: Option<KeyIndex>,
}

impl NameDictionary {
    /// Build from parsed records: sort by (normalized key, raw romaji) so
    /// every key's records form one contiguous run, then index first
    /// positions. Sortedness is enforced here rather than trusted from the
    /// serialized input.
    pub fn from_records(mut records: Vec<NameRecord>) -> Self {
        records.sort_by_cached_key(|rec| (normalize(&rec.romaji), rec.romaji.clone()));
        let index = KeyIndex::build(&records);
        debug!(records = records.len(), keys = index.len(), "dictionary built");
        Self {
            records,
            index: Some(index),
        }
    }

    /// Ingest the pipe-delimited record stream. Malformed lines are
    /// silently skipped; a read failure aborts the whole load.
    pub fn load(reader: impl BufRead) -> Result<Self, DictError> {
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            match NameRecord::from_pipe_line(line.trim_end()) {
                Some(rec) => records.push(rec),
                None => skipped += 1,
            }
        }
        debug!(parsed = records.len(), skipped, "ingested record stream");
        Ok(Self::from_records(records))
    }

    /// Ingest an already in-memory buffer of the pipe format.
    ///
    /// Indexing is skipped for this synchronous case; every query falls
    /// back to a full scan. Degraded but fully supported — results are
    /// identical to the indexed path.
    pub fn from_text(text: &str) -> Self {
        let records: Vec<NameRecord> = text
            .lines()
            .filter_map(|line| NameRecord::from_pipe_line(line.trim_end()))
            .collect();
        debug!(parsed = records.len(), "ingested text buffer (unindexed)");
        Self {
            records,
            index: None,
        }
    }

    /// Open a dictionary file: a compiled `ENDX` snapshot, a gzip-compressed
    /// pipe-format text, or plain pipe-format text, auto-detected by magic
    /// bytes.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let mut file = File::open(path)?;
        let mut magic = [0u8; 4];
        let got = read_up_to(&mut file, &mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        if got >= 4 && &magic == snapshot::MAGIC {
            return Ok(Self::from_records(snapshot::open(path)?));
        }
        if got >= 2 && magic[..2] == [0x1f, 0x8b] {
            return Self::load(BufReader::new(GzDecoder::new(file)));
        }
        Self::load(BufReader::new(file))
    }

    /// Write the record store as a compiled snapshot (`ENDX` format).
    pub fn save_snapshot(&self, path: &Path) -> Result<(), DictError> {
        snapshot::save(&self.records, path)
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Resolve a single romanized name.
    ///
    /// The query is widened to accept long-vowel and `n'` spelling
    /// variants; of all matching records, the largest group sharing one
    /// exact spelling wins.
    pub fn find(&self, romaji: &str) -> Option<EntrySet> {
        let query = romaji.trim();
        if query.is_empty() {
            return None;
        }
        let span = debug_span!("find", query);
        let _guard = span.enter();

        let pattern = RomajiPattern::new(query);
        self.search_romaji(&pattern, &normalize(query))
    }

    /// Resolve a kanji spelling by prefix match.
    ///
    /// Kanji is never normalized or index-assisted; this is always a full
    /// scan anchored at the start of the field.
    pub fn find_kanji(&self, kanji: &str) -> Option<EntrySet> {
        let query = kanji.trim();
        if query.is_empty() {
            return None;
        }
        let span = debug_span!("find_kanji", query);
        let _guard = span.enter();

        let mut groups = GroupedMatches::default();
        for rec in &self.records {
            if rec.kanji.starts_with(query) {
                groups.push(&rec.kanji, rec);
            }
        }
        groups.into_entry_set(SearchField::Kanji)
    }

    /// Resolve a full romanized name of one or two whitespace-separated
    /// tokens, inferring which token is the surname.
    pub fn find_by_name(&self, full_romaji: &str) -> Option<CompositeName> {
        let tokens: Vec<&str> = full_romaji.split_whitespace().collect();
        let span = debug_span!("find_by_name", query = full_romaji);
        let _guard = span.enter();

        match tokens.as_slice() {
            [single] => Some(CompositeName::from_given(self.resolve_token(single))),
            [first, second] => Some(CompositeName::from_pair(
                self.resolve_token(first),
                self.resolve_token(second),
            )),
            // Zero tokens is no query; three or more is not a two-part name.
            _ => None,
        }
    }

    fn resolve_token(&self, token: &str) -> NameToken {
        NameToken::new(token, self.find(token))
    }

    /// Core search: index-assisted contiguous scan when the key is indexed,
    /// full scan otherwise.
    fn search_romaji(&self, pattern: &RomajiPattern, key: &str) -> Option<EntrySet> {
        let start = self.index.as_ref().and_then(|ix| ix.get(key));
        let mut groups = GroupedMatches::default();

        match start {
            Some(start) => {
                // The store is sorted by normalized key, and everything the
                // widened pattern accepts normalizes back to the query key,
                // so all matches form one run starting here. Stop at the
                // first non-match.
                for rec in &self.records[start..] {
                    if !pattern.is_match(&rec.romaji) {
                        break;
                    }
                    groups.push(&rec.romaji, rec);
                }
            }
            None => {
                for rec in &self.records {
                    if pattern.is_match(&rec.romaji) {
                        groups.push(&rec.romaji, rec);
                    }
                }
            }
        }

        debug!(
            groups = groups.len(),
            indexed = start.is_some(),
            "search complete"
        );
        groups.into_entry_set(SearchField::Romaji)
    }
}

/// Matches grouped by exact matched field value, in first-seen order.
#[derive(Default)]
struct GroupedMatches {
    groups: Vec<(String, Vec<NameRecord>)>,
}

impl GroupedMatches {
    fn push(&mut self, key: &str, rec: &NameRecord) {
        match self.groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, records)) => records.push(rec.clone()),
            None => self.groups.push((key.to_string(), vec![rec.clone()])),
        }
    }

    fn len(&self) -> usize {
        self.groups.len()
    }

    /// The largest group wins; ties go to the group seen first.
    fn into_entry_set(self, field: SearchField) -> Option<EntrySet> {
        let mut best: Option<(String, Vec<NameRecord>)> = None;
        for (key, records) in self.groups {
            if best.as_ref().map_or(true, |(_, b)| records.len() > b.len()) {
                best = Some((key, records));
            }
        }
        best.map(|(key, records)| EntrySet::new(records, field, key))
    }
}

fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
