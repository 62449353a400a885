use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("unsupported locale `{0}`")]
    Unsupported(String),
}

/// Display languages served by the site.
///
/// [`Locale::DEFAULT`] is rendered without a path prefix, every other
/// locale owns the first path segment (`/ar/news`).
#[derive(
    EnumString,
    Display,
    AsRefStr,
    IntoStaticStr,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const DEFAULT: Locale = Locale::En;

    pub fn tag(self) -> &'static str {
        self.into()
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    /// Text direction used for the `dir` attribute of the document.
    pub fn dir(self) -> &'static str {
        match self {
            Locale::En => "ltr",
            Locale::Ar => "rtl",
        }
    }

    /// Name of the locale written in its own language, used by the switcher.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ar => "العربية",
        }
    }

    /// The locale a switcher offers from `self`.
    pub fn other(self) -> Locale {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    /// Exact match of a single path segment against the supported tags.
    pub fn from_segment(segment: &str) -> Option<Locale> {
        Locale::VARIANTS
            .iter()
            .copied()
            .find(|locale| locale.tag() == segment)
    }

    pub fn parse(tag: &str) -> Result<Locale, LocaleError> {
        Locale::from_str(tag.trim()).map_err(|_| LocaleError::Unsupported(tag.to_owned()))
    }
}
