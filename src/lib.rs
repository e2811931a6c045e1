//! Offline resolution of romanized Japanese personal names.
//!
//! Loads an ENAMDICT-derived name dictionary once, then answers synchronous
//! lookups: `find` resolves a single romanized name to its kanji/kana
//! spellings and semantic kind, `find_kanji` goes the other way by kanji
//! prefix, and `find_by_name` composes a surname + given-name pair,
//! inferring which token is which.
//!
//! ```no_run
//! use enamdict::NameDictionary;
//!
//! let dict = NameDictionary::open(std::path::Path::new("names.txt.gz"))?;
//! if let Some(name) = dict.find_by_name("Hiroshige Utagawa") {
//!     // Dictionary metadata says Utagawa is the surname.
//!     assert_eq!(name.romaji(), "Utagawa Hiroshige");
//! }
//! # Ok::<(), enamdict::DictError>(())
//! ```

mod compose;
mod dict;
mod entries;
pub mod normalize;
mod pattern;
mod record;
pub mod source;
pub mod trace_init;

pub use compose::{CompositeName, NameToken};
pub use dict::{DictError, NameDictionary};
pub use entries::{EntrySet, SearchField};
pub use pattern::RomajiPattern;
pub use record::{NameKind, NameRecord};
