//! Two-token name composition.
//!
//! `find_by_name` resolves each whitespace-separated token independently,
//! then infers which token is the surname. The query is assumed to be
//! surname-first (traditional Japanese order); when the dictionary's own
//! category metadata contradicts that, the roles are swapped.

use crate::entries::{capitalize, EntrySet};
use crate::record::NameKind;

/// One resolved (or unresolved) token of a composite name query.
#[derive(Debug, Clone)]
pub struct NameToken {
    query: String,
    entries: Option<EntrySet>,
}

impl NameToken {
    pub(crate) fn new(query: &str, entries: Option<EntrySet>) -> Self {
        Self {
            query: query.to_ascii_lowercase(),
            entries,
        }
    }

    /// The literal query text this token was resolved from.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The matched entry set, absent when the token has no dictionary entry.
    pub fn entries(&self) -> Option<&EntrySet> {
        self.entries.as_ref()
    }

    pub fn kind(&self) -> NameKind {
        self.entries
            .as_ref()
            .map(EntrySet::kind)
            .unwrap_or(NameKind::Unknown)
    }

    /// Display romaji: the elected dictionary spelling when one exists,
    /// otherwise the query text itself, capitalized either way.
    pub fn romaji(&self) -> String {
        let elected = self
            .entries
            .as_ref()
            .map(EntrySet::romaji)
            .unwrap_or_default();
        if elected.is_empty() {
            capitalize(&self.query)
        } else {
            elected
        }
    }

    pub fn kana(&self) -> String {
        self.entries
            .as_ref()
            .map(EntrySet::kana)
            .unwrap_or_default()
    }

    pub fn kanji_variants(&self) -> Vec<String> {
        self.entries
            .as_ref()
            .map(EntrySet::kanji_variants)
            .unwrap_or_default()
    }

    fn is_matched(&self) -> bool {
        self.entries.is_some()
    }
}

/// A resolved surname + given-name pair (or a lone given name).
#[derive(Debug, Clone)]
pub struct CompositeName {
    surname: Option<NameToken>,
    given: NameToken,
}

impl CompositeName {
    /// Compose from the first and second tokens of a two-part query,
    /// assumed surname-first, swapping when the dictionary metadata
    /// contradicts that order.
    pub(crate) fn from_pair(first: NameToken, second: NameToken) -> Self {
        let swap = match (first.is_matched(), second.is_matched()) {
            (true, true) => {
                let (fk, sk) = (first.kind(), second.kind());
                fk != sk && (fk == NameKind::Given || sk == NameKind::Surname)
            }
            // Only one side matched: trust its declared category when it
            // contradicts the assumed order, and drag the unmatched side
            // into the opposite role.
            (true, false) => first.kind() == NameKind::Given,
            (false, true) => second.kind() == NameKind::Surname,
            (false, false) => false,
        };

        let (surname, given) = if swap { (second, first) } else { (first, second) };
        Self {
            surname: Some(surname),
            given,
        }
    }

    /// A single-token query is a given name with no surname.
    pub(crate) fn from_given(given: NameToken) -> Self {
        Self {
            surname: None,
            given,
        }
    }

    pub fn surname(&self) -> Option<&NameToken> {
        self.surname.as_ref()
    }

    pub fn given(&self) -> &NameToken {
        &self.given
    }

    /// Surname-first display form; just the given name when no surname.
    pub fn romaji(&self) -> String {
        match &self.surname {
            Some(surname) => format!("{} {}", surname.romaji(), self.given.romaji()),
            None => self.given.romaji(),
        }
    }

    /// Given-first (Western order) display form.
    pub fn romaji_modern(&self) -> String {
        match &self.surname {
            Some(surname) => format!("{} {}", self.given.romaji(), surname.romaji()),
            None => self.given.romaji(),
        }
    }

    /// Concatenated surname + given phonetics. Empty when either side
    /// lacks an elected kana spelling.
    pub fn kana(&self) -> String {
        match &self.surname {
            Some(surname) => {
                let (s, g) = (surname.kana(), self.given.kana());
                if s.is_empty() || g.is_empty() {
                    String::new()
                } else {
                    s + &g
                }
            }
            None => self.given.kana(),
        }
    }

    /// Alias for dictionaries whose phonetic field is katakana.
    pub fn katakana(&self) -> String {
        self.kana()
    }

    /// Every elected surname spelling concatenated with every elected given
    /// spelling. Can legitimately return several candidates.
    pub fn kanji(&self) -> Vec<String> {
        let given = self.given.kanji_variants();
        match &self.surname {
            Some(surname) => {
                let mut out = Vec::new();
                for s in surname.kanji_variants() {
                    for g in &given {
                        out.push(format!("{s}{g}"));
                    }
                }
                out
            }
            None => given,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::entries::SearchField;
    use crate::record::NameRecord;

    fn matched(romaji: &str, kanji: &str, kana: &str, kind: NameKind) -> NameToken {
        let rec = NameRecord {
            romaji: romaji.to_string(),
            kanji: kanji.to_string(),
            kana: kana.to_string(),
            kind,
        };
        NameToken::new(
            romaji,
            Some(EntrySet::new(
                vec![rec],
                SearchField::Romaji,
                romaji.to_string(),
            )),
        )
    }

    fn literal(query: &str) -> NameToken {
        NameToken::new(query, None)
    }

    #[test]
    fn keeps_surname_first_order() {
        let name = CompositeName::from_pair(
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
            matched("hiroshige", "広重", "ひろしげ", NameKind::Given),
        );
        assert_eq!(name.romaji(), "Utagawa Hiroshige");
        assert_eq!(name.romaji_modern(), "Hiroshige Utagawa");
    }

    #[test]
    fn swaps_on_contradicting_categories() {
        let name = CompositeName::from_pair(
            matched("hiroshige", "広重", "ひろしげ", NameKind::Given),
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
        );
        assert_eq!(name.romaji(), "Utagawa Hiroshige");
    }

    #[test]
    fn does_not_swap_when_categories_agree() {
        let name = CompositeName::from_pair(
            matched("tanaka", "田中", "たなか", NameKind::Surname),
            matched("suzuki", "鈴木", "すずき", NameKind::Surname),
        );
        assert_eq!(name.romaji(), "Tanaka Suzuki");
    }

    #[test]
    fn unmatched_side_takes_opposite_role() {
        // First token is a known given name, so the unknown second token
        // must be the surname.
        let name = CompositeName::from_pair(
            matched("hiroshige", "広重", "ひろしげ", NameKind::Given),
            literal("nosuchname"),
        );
        assert_eq!(name.romaji(), "Nosuchname Hiroshige");

        // First token unknown, second is a known surname: also swapped.
        let name = CompositeName::from_pair(
            literal("nosuchname"),
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
        );
        assert_eq!(name.romaji(), "Utagawa Nosuchname");
    }

    #[test]
    fn unmatched_side_keeps_default_order_without_contradiction() {
        let name = CompositeName::from_pair(
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
            literal("nosuchname"),
        );
        assert_eq!(name.romaji(), "Utagawa Nosuchname");
    }

    #[test]
    fn kana_requires_both_sides() {
        let name = CompositeName::from_pair(
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
            literal("nosuchname"),
        );
        assert_eq!(name.kana(), "");

        let name = CompositeName::from_pair(
            matched("utagawa", "歌川", "うたがわ", NameKind::Surname),
            matched("hiroshige", "広重", "ひろしげ", NameKind::Given),
        );
        assert_eq!(name.kana(), "うたがわひろしげ");
    }

    #[test]
    fn lone_given_name() {
        let name = CompositeName::from_given(matched("sharaku", "写楽", "しゃらく", NameKind::Given));
        assert_eq!(name.romaji(), "Sharaku");
        assert_eq!(name.romaji_modern(), "Sharaku");
        assert_eq!(name.kana(), "しゃらく");
    }

    #[test]
    fn kanji_cartesian_product() {
        let surname = matched("andou", "安藤", "あんどう", NameKind::Surname);
        let given = NameToken::new(
            "hiroshige",
            Some(EntrySet::new(
                vec![
                    NameRecord {
                        romaji: "hiroshige".to_string(),
                        kanji: "広重".to_string(),
                        kana: "ひろしげ".to_string(),
                        kind: NameKind::Given,
                    },
                    NameRecord {
                        romaji: "hiroshige".to_string(),
                        kanji: "廣重".to_string(),
                        kana: "ひろしげ".to_string(),
                        kind: NameKind::Given,
                    },
                ],
                SearchField::Romaji,
                "hiroshige".to_string(),
            )),
        );
        let name = CompositeName::from_pair(surname, given);
        assert_eq!(name.kanji(), vec!["安藤広重", "安藤廣重"]);
    }
}
