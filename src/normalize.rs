//! Romaji key normalization.
//!
//! ENAMDICT romanizes long vowels inconsistently (`andou`, `andoo`, `ando`
//! all appear for 安藤). Collapsing long-vowel digraphs and mora-boundary
//! apostrophes into one canonical form gives every spelling variant the same
//! index key.

/// Canonical lookup key for a romaji spelling.
///
/// Collapses runs of the same vowel to a single letter, folds the `ou`
/// long-o convention into `o`, and drops apostrophes. Idempotent:
/// `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(romaji: &str) -> String {
    let mut out = String::with_capacity(romaji.len());
    for c in romaji.chars() {
        let c = c.to_ascii_lowercase();
        if c == '\'' {
            continue;
        }
        match out.as_bytes().last().copied() {
            // `ou` is the default long-o spelling; fold it into the `o`.
            Some(b'o') if c == 'u' => continue,
            Some(last) if last == c as u8 && is_vowel(c) => continue,
            _ => out.push(c),
        }
    }
    out
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
