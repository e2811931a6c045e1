//! Query-to-matcher compilation.
//!
//! A romaji query is widened into a regex that accepts every spelling
//! variant a dictionary record may use: short and long vowels, the `ou`
//! long-o convention, and optional `n'` mora boundaries.

use regex::{Regex, RegexBuilder};

/// Compiled matcher for one romaji query.
///
/// Anchored to the whole key. `is_match` is cheap enough to run across a
/// large candidate set, so one pattern is built per query and reused.
#[derive(Debug)]
pub struct RomajiPattern {
    regex: Regex,
}

impl RomajiPattern {
    pub fn new(query: &str) -> Self {
        // ENAMDICT writes long o as `ou` by default; fold a literal `oo`
        // in the query into that convention before widening.
        let canonical = query.to_ascii_lowercase().replace("oo", "ou");

        let mut source = String::with_capacity(canonical.len() * 4 + 2);
        source.push('^');
        for c in canonical.chars() {
            match c {
                'a' | 'e' | 'i' | 'u' => {
                    source.push(c);
                    source.push(c);
                    source.push('?');
                }
                'o' => source.push_str("o[ou]?"),
                'n' => source.push_str("n'?"),
                c if c.is_ascii_alphanumeric() => source.push(c),
                c => source.push_str(&regex::escape(&c.to_string())),
            }
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .expect("widened romaji pattern must compile");
        Self { regex }
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::normalize::normalize;

    #[test]
    fn accepts_long_vowel_variants() {
        let pattern = RomajiPattern::new("ando");
        assert!(pattern.is_match("ando"));
        assert!(pattern.is_match("andou"));
        assert!(pattern.is_match("andoo"));
        assert!(!pattern.is_match("anda"));
    }

    #[test]
    fn literal_oo_is_treated_as_long_o() {
        let pattern = RomajiPattern::new("andoo");
        assert!(pattern.is_match("andou"));
        assert!(pattern.is_match("ando"));
    }

    #[test]
    fn accepts_mora_boundary_apostrophe() {
        let pattern = RomajiPattern::new("shinichi");
        assert!(pattern.is_match("shin'ichi"));
        assert!(pattern.is_match("shinichi"));
    }

    #[test]
    fn anchored_to_whole_key() {
        let pattern = RomajiPattern::new("ando");
        assert!(!pattern.is_match("andos"));
        assert!(!pattern.is_match("bando"));
    }

    #[test]
    fn case_insensitive() {
        let pattern = RomajiPattern::new("Utagawa");
        assert!(pattern.is_match("utagawa"));
    }

    /// Plausible romanized names: consonant-vowel syllables with optional
    /// long-vowel realizations and `n'` codas. Only the leading syllable may
    /// start with a bare vowel, matching how names are actually romanized.
    fn arb_romaji() -> impl Strategy<Value = String> {
        fn syllable(consonants: Vec<&'static str>) -> impl Strategy<Value = String> {
            (
                prop::sample::select(consonants),
                prop::sample::select(vec!["a", "e", "i", "o", "u"]),
                prop::bool::ANY,
                prop::bool::ANY,
            )
                .prop_map(|(c, v, long, coda_n)| {
                    let mut s = String::new();
                    s.push_str(c);
                    s.push_str(v);
                    if long {
                        // Long o is spelled `ou` upstream, other vowels double.
                        s.push_str(if v == "o" { "u" } else { v });
                    }
                    if coda_n {
                        s.push_str("n'");
                    }
                    s
                })
        }

        let onset = vec!["k", "s", "sh", "t", "ch", "h", "m", "r", "w", "g", "d"];
        let mut first = onset.clone();
        first.push("");
        (
            syllable(first),
            prop::collection::vec(syllable(onset), 0..4),
        )
            .prop_map(|(head, rest)| head + &rest.concat())
    }

    proptest! {
        /// The pattern built from the normalized form of a spelling must
        /// still match the spelling itself.
        #[test]
        fn normalized_pattern_matches_raw(raw in arb_romaji()) {
            let raw = raw.trim_end_matches('\'').to_string();
            let pattern = RomajiPattern::new(&normalize(&raw));
            prop_assert!(pattern.is_match(&raw), "pattern from {:?} missed {:?}", normalize(&raw), raw);
        }
    }
}
