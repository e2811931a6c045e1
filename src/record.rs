//! Name records and line parsing.
//!
//! Two grammars produce records:
//! - the sorted pipe-delimited format the engine ingests
//!   (`normalizedKey|romaji|kanji|kana|kind`), and
//! - the raw upstream ENAMDICT grammar (`SPELLING [PHONETIC] /GLOSS.../`),
//!   consumed only by the one-time conversion step in `source`.
//!
//! Lines that fail either grammar produce no record at all. That is routine
//! data cleaning, not an error.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Semantic role of a name in the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    Surname,
    Given,
    Unknown,
}

impl NameKind {
    /// Single-letter wire form used by the pipe format.
    pub fn as_code(self) -> char {
        match self {
            NameKind::Surname => 's',
            NameKind::Given => 'g',
            NameKind::Unknown => 'u',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            's' => Some(NameKind::Surname),
            'g' => Some(NameKind::Given),
            'u' => Some(NameKind::Unknown),
            _ => None,
        }
    }
}

/// One dictionary entry, immutable after ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Lowercase ASCII romanized spelling, stripped of annotations.
    pub romaji: String,
    /// Kanji (or kana) spelling as written in the source line. Opaque.
    pub kanji: String,
    /// Phonetic kana spelling. Opaque.
    pub kana: String,
    pub kind: NameKind,
}

impl NameRecord {
    /// Parse one line of the pipe-delimited serialized format.
    ///
    /// The leading normalized-key field is ignored; the index is rebuilt
    /// from the romaji field at load time rather than trusted.
    pub fn from_pipe_line(line: &str) -> Option<Self> {
        let mut fields = line.split('|');
        let _normalized = fields.next()?;
        let romaji = fields.next()?;
        let kanji = fields.next()?;
        let kana = fields.next()?;
        let kind_field = fields.next()?;
        if fields.next().is_some() {
            return None;
        }

        let mut kind_chars = kind_field.chars();
        let kind = NameKind::from_code(kind_chars.next()?)?;
        if kind_chars.next().is_some() {
            return None;
        }

        let romaji = romaji.trim().to_ascii_lowercase();
        if !is_clean_romaji(&romaji) {
            return None;
        }

        Some(Self {
            romaji,
            kanji: kanji.to_string(),
            kana: kana.to_string(),
            kind,
        })
    }

    /// Serialize to one line of the pipe format.
    pub fn to_pipe_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            normalize(&self.romaji),
            self.romaji,
            self.kanji,
            self.kana,
            self.kind.as_code()
        )
    }

    /// Parse one line of the raw upstream grammar:
    /// `SPELLING [PHONETIC] /GLOSS info (typecodes) .../`.
    ///
    /// Only records whose first gloss carries a recognized type code
    /// ({s,u,g,f,m}) survive; everything else — place names, products,
    /// compound full names with embedded whitespace or hyphens — is
    /// excluded here so it never reaches the index.
    pub fn from_enamdict_line(line: &str) -> Option<Self> {
        let (kanji, rest) = line.split_once(' ')?;

        let rest = rest.trim_start();
        let rest = rest.strip_prefix('[')?;
        let (kana, rest) = rest.split_once(']')?;

        let rest = rest.trim_start();
        let rest = rest.strip_prefix('/')?;
        let (gloss, _) = rest.split_once('/')?;

        let kind = gloss_kind(gloss)?;
        let romaji = strip_annotations(gloss);
        if romaji.is_empty() || !is_clean_romaji(&romaji) {
            return None;
        }

        Some(Self {
            romaji,
            kanji: kanji.to_string(),
            kana: kana.to_string(),
            kind,
        })
    }
}

/// Compound names are intentionally excluded from the index.
fn is_clean_romaji(romaji: &str) -> bool {
    !romaji.is_empty() && !romaji.contains(char::is_whitespace) && !romaji.contains('-')
}

/// Type codes the dictionary annotates name glosses with. A gloss group
/// qualifies as a type group only if it consists entirely of these.
const TYPE_GROUP_CHARS: &[char] = &['s', 'p', 'u', 'g', 'f', 'm', 'h', 'r', 'c', 't', ','];

/// Extract the name kind from the first parenthesized type-code group.
///
/// `s` is a surname, `g`/`f`/`m` are given names (plain/female/male),
/// `u` is unclassified. A group with none of those (e.g. `(p,h)`) means
/// the line is not a personal name and yields no record.
fn gloss_kind(gloss: &str) -> Option<NameKind> {
    let mut rest = gloss;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let close = after.find(')')?;
        let group = &after[..close];
        if !group.is_empty() && group.chars().all(|c| TYPE_GROUP_CHARS.contains(&c)) {
            return group.split(',').find_map(|code| match code {
                "s" => Some(NameKind::Surname),
                "g" | "f" | "m" => Some(NameKind::Given),
                "u" => Some(NameKind::Unknown),
                _ => None,
            });
        }
        rest = &after[close + 1..];
    }
    None
}

/// Strip parenthetical asides and comma-suffixed alternative spellings from
/// a gloss, leaving the bare romanized name, lowercased.
fn strip_annotations(gloss: &str) -> String {
    let mut out = String::with_capacity(gloss.len());
    let mut depth = 0usize;
    for c in gloss.chars() {
        match c {
            '(' => {
                depth += 1;
                while out.ends_with(' ') {
                    out.pop();
                }
            }
            ')' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            ',' => break,
            c => out.push(c),
        }
    }
    out.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surname_line() {
        let rec = NameRecord::from_enamdict_line("安藤 [あんどう] /Andou (s)/").unwrap();
        assert_eq!(rec.romaji, "andou");
        assert_eq!(rec.kanji, "安藤");
        assert_eq!(rec.kana, "あんどう");
        assert_eq!(rec.kind, NameKind::Surname);
    }

    #[test]
    fn female_and_male_codes_map_to_given() {
        let f = NameRecord::from_enamdict_line("広重 [ひろしげ] /Hiroshige (f)/").unwrap();
        assert_eq!(f.kind, NameKind::Given);
        let m = NameRecord::from_enamdict_line("広重 [ひろしげ] /Hiroshige (m)/").unwrap();
        assert_eq!(m.kind, NameKind::Given);
    }

    #[test]
    fn first_recognized_code_wins() {
        let rec = NameRecord::from_enamdict_line("写楽 [しゃらく] /Sharaku (g,s)/").unwrap();
        assert_eq!(rec.kind, NameKind::Given);
    }

    #[test]
    fn unrecognized_type_group_is_discarded() {
        assert!(NameRecord::from_enamdict_line("東京 [とうきょう] /Tokyo (p,h)/").is_none());
    }

    #[test]
    fn missing_type_group_is_discarded() {
        assert!(NameRecord::from_enamdict_line("安藤 [あんどう] /Andou/").is_none());
    }

    #[test]
    fn strips_comma_suffixed_alternatives() {
        let rec =
            NameRecord::from_enamdict_line("安藤 [あんどう] /Andou, Ando (s)/").unwrap();
        assert_eq!(rec.romaji, "andou");
    }

    #[test]
    fn strips_parenthetical_asides() {
        let rec =
            NameRecord::from_enamdict_line("歌麿 [うたまろ] /Utamaro (not Utamano) (s)/").unwrap();
        assert_eq!(rec.romaji, "utamaro");
    }

    #[test]
    fn rejects_whitespace_and_hyphens() {
        assert!(
            NameRecord::from_enamdict_line("安藤広重 [あんどうひろしげ] /Andou Hiroshige (s)/")
                .is_none()
        );
        assert!(
            NameRecord::from_enamdict_line("純一郎 [じゅんいちろう] /Jun-ichirou (m)/").is_none()
        );
    }

    #[test]
    fn rejects_missing_phonetic_field() {
        assert!(NameRecord::from_enamdict_line("すずき /Suzuki (s)/").is_none());
    }

    #[test]
    fn pipe_line_round_trip() {
        let rec = NameRecord {
            romaji: "andou".to_string(),
            kanji: "安藤".to_string(),
            kana: "あんどう".to_string(),
            kind: NameKind::Surname,
        };
        let line = rec.to_pipe_line();
        assert_eq!(line, "ando|andou|安藤|あんどう|s");
        assert_eq!(NameRecord::from_pipe_line(&line).unwrap(), rec);
    }

    #[test]
    fn pipe_line_rejects_bad_kind_and_arity() {
        assert!(NameRecord::from_pipe_line("ando|andou|安藤|あんどう|x").is_none());
        assert!(NameRecord::from_pipe_line("ando|andou|安藤|あんどう").is_none());
        assert!(NameRecord::from_pipe_line("ando|andou|安藤|あんどう|s|extra").is_none());
    }
}
