//! Per-field locale resolution for bilingual records.
//!
//! Vietnamese is the canonical language; English values are optional
//! translations. Resolution happens field by field, so a single response can
//! mix translated and untranslated values. Missing translations fall back
//! silently to the Vietnamese value.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl Locale {
    /// Resolve a required bilingual pair.
    ///
    /// Returns the English value only when this locale is `En` and the
    /// translation is present and non-blank.
    pub fn pick<'a>(self, primary: &'a str, english: Option<&'a str>) -> &'a str {
        match self {
            Locale::En => match english {
                Some(value) if !value.trim().is_empty() => value,
                _ => primary,
            },
            Locale::Vi => primary,
        }
    }

    /// Resolve an optional bilingual pair, e.g. short descriptions.
    pub fn pick_optional<'a>(
        self,
        primary: Option<&'a str>,
        english: Option<&'a str>,
    ) -> Option<&'a str> {
        match self {
            Locale::En => match english {
                Some(value) if !value.trim().is_empty() => Some(value),
                _ => primary,
            },
            Locale::Vi => primary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(Locale::Vi),
            "en" => Ok(Locale::En),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_locale_returns_translation_when_present() {
        assert_eq!(Locale::En.pick("Giới thiệu", Some("About us")), "About us");
    }

    #[test]
    fn english_locale_falls_back_on_missing_translation() {
        assert_eq!(Locale::En.pick("Giới thiệu", None), "Giới thiệu");
        assert_eq!(Locale::En.pick("Giới thiệu", Some("   ")), "Giới thiệu");
    }

    #[test]
    fn default_locale_ignores_translation() {
        assert_eq!(Locale::Vi.pick("Giới thiệu", Some("About us")), "Giới thiệu");
    }

    #[test]
    fn optional_pairs_resolve_per_field() {
        assert_eq!(
            Locale::En.pick_optional(Some("Mô tả"), Some("Description")),
            Some("Description")
        );
        assert_eq!(Locale::En.pick_optional(Some("Mô tả"), None), Some("Mô tả"));
        assert_eq!(Locale::En.pick_optional(None, None), None);
        assert_eq!(Locale::Vi.pick_optional(None, Some("Description")), None);
    }
}
