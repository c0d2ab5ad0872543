//! Genre vocabulary, normalization and keyword expansion

pub mod keywords;
pub mod normalizer;
pub mod vocabulary;

pub use normalizer::{normalize, DEFAULT_GENRES, MAX_NORMALIZED_GENRES};
pub use vocabulary::{is_catalog_genre, CATALOG_VOCABULARY};
