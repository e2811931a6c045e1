//! Grouped lookup results and popularity election.
//!
//! A single-token query yields an `EntrySet`: every record that matched the
//! query pattern and shares one exact matched key. Display values (kind,
//! kana, romaji, kanji) are elected on demand by strict majority over the
//! set; no majority means the neutral default, never a panic.

use crate::record::{NameKind, NameRecord};

/// Which record field a search matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Romaji,
    Kanji,
}

/// Records sharing one matched key, with derived accessors.
#[derive(Debug, Clone)]
pub struct EntrySet {
    records: Vec<NameRecord>,
    field: SearchField,
    matched: String,
}

impl EntrySet {
    pub(crate) fn new(records: Vec<NameRecord>, field: SearchField, matched: String) -> Self {
        debug_assert!(!records.is_empty());
        Self {
            records,
            field,
            matched,
        }
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    /// The exact spelling variant the search matched, which need not be the
    /// query's own spelling.
    pub fn matched_key(&self) -> &str {
        &self.matched
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    /// Dominant name kind, `Unknown` when no kind reaches a strict majority.
    pub fn kind(&self) -> NameKind {
        let mut counts = [(NameKind::Surname, 0usize), (NameKind::Given, 0), (NameKind::Unknown, 0)];
        for rec in &self.records {
            for slot in &mut counts {
                if slot.0 == rec.kind {
                    slot.1 += 1;
                }
            }
        }
        counts
            .iter()
            .find(|(_, n)| *n * 2 > self.records.len())
            .map(|(kind, _)| *kind)
            .unwrap_or(NameKind::Unknown)
    }

    /// Dominant display romaji, capitalized. Empty when no spelling reaches
    /// a strict majority.
    pub fn romaji(&self) -> String {
        capitalize(elect(self.records.iter().map(|r| r.romaji.as_str())).unwrap_or(""))
    }

    /// Dominant kana spelling, or empty without a strict majority.
    pub fn kana(&self) -> String {
        elect(self.records.iter().map(|r| r.kana.as_str()))
            .unwrap_or("")
            .to_string()
    }

    /// Dominant kanji spelling, or empty without a strict majority.
    pub fn kanji(&self) -> String {
        elect(self.records.iter().map(|r| r.kanji.as_str()))
            .unwrap_or("")
            .to_string()
    }

    /// Every kanji spelling carried by records compatible with the dominant
    /// kind, distinct, in record order.
    pub fn kanji_variants(&self) -> Vec<String> {
        self.aggregate(|r| r.kanji.as_str())
    }

    /// Every romaji spelling carried by records compatible with the dominant
    /// kind, distinct, in record order.
    pub fn romaji_variants(&self) -> Vec<String> {
        self.aggregate(|r| r.romaji.as_str())
    }

    /// Filter to the dominant kind (unknown-kind records are compatible with
    /// every kind) and collect distinct non-empty values.
    fn aggregate<'a>(&'a self, value: impl Fn(&'a NameRecord) -> &'a str) -> Vec<String> {
        let kind = self.kind();
        let mut out: Vec<String> = Vec::new();
        for rec in &self.records {
            if kind != NameKind::Unknown && rec.kind != kind && rec.kind != NameKind::Unknown {
                continue;
            }
            let v = value(rec);
            if !v.is_empty() && !out.iter().any(|seen| seen == v) {
                out.push(v.to_string());
            }
        }
        out
    }
}

/// Strict-majority election: the value held by more than half the records,
/// or `None` when no value is.
fn elect<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;
    for v in values {
        total += 1;
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some(slot) => slot.1 += 1,
            None => counts.push((v, 1)),
        }
    }
    counts
        .into_iter()
        .find(|(_, n)| *n * 2 > total)
        .map(|(v, _)| v)
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
