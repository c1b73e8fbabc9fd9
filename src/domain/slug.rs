//! Deterministic, human-friendly slug derivation.
//!
//! Vietnamese titles like "Trị liệu thần kinh cột sống" fold to
//! `tri-lieu-than-kinh-cot-song` through the `slug` crate's transliteration.
//! The function is pure and idempotent; uniqueness is the caller's problem:
//! services look up the candidate before writing and reject collisions
//! outright instead of suffixing a counter.

use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a URL-safe slug from the provided human-readable text.
///
/// Titles that are empty or strip to nothing (punctuation-only input) are
/// rejected rather than producing an empty slug.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_folds_vietnamese_diacritics() {
        let slug = derive_slug("Trị liệu thần kinh cột sống").expect("slug");
        assert_eq!(slug, "tri-lieu-than-kinh-cot-song");
    }

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        let slug = derive_slug("Chiro  Therapy").expect("slug");
        assert_eq!(slug, "chiro-therapy");
    }

    #[test]
    fn derive_slug_is_idempotent() {
        let once = derive_slug("Phục hồi chức năng sau chấn thương").expect("slug");
        let twice = derive_slug(&once).expect("slug");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_title_is_rejected() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn punctuation_only_title_is_rejected() {
        let err = derive_slug("!!! ???").expect_err("unrepresentable");
        assert!(matches!(err, SlugError::Unrepresentable { .. }));
    }
}
