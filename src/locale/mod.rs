//! Locale resource handling: extraction, discovery, and the merged map.

pub mod discovery;
pub mod extract;
pub mod map;
pub mod store;

pub use extract::{Strategy, extract, extract_with_strategy};
pub use map::{LocaleMap, is_locale_key};
pub use store::{
    Candidate, LoadOutcome, LoadResult, LocaleStore, MapSource, ResourceFile, ResourceOrigin,
};
