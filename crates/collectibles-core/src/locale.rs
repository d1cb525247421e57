//! Locale codes and the tags used to suffix localized output fields.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("locale code is empty")]
    Empty,

    #[error("locales \"{primary}\" and \"{secondary}\" share the output tag \"{tag}\"")]
    TagCollision {
        primary: String,
        secondary: String,
        tag: String,
    },
}

/// A locale code as sent to the upstream (`en-US`, `pt-BR`, `ru`) together
/// with its output tag, the lower-cased language subtag (`en`, `pt`, `ru`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    code: String,
    tag: String,
}

impl Locale {
    /// Parses a locale code.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Empty`] if the code is blank.
    pub fn parse(code: &str) -> Result<Self, LocaleError> {
        let code = code.trim();
        let tag = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }
        Ok(Self {
            code: code.to_owned(),
            tag,
        })
    }

    /// The code sent upstream.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The suffix used for `name_<tag>` / `category_<tag>` output fields.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

/// The two locales a catalog is built from. The primary locale's
/// locale-invariant fields take precedence during merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePair {
    pub primary: Locale,
    pub secondary: Locale,
}

impl LocalePair {
    /// # Errors
    ///
    /// Returns [`LocaleError::TagCollision`] if both locales map to the same
    /// output tag (`en-US` and `en-GB`), which would make their output fields
    /// indistinguishable.
    pub fn new(primary: Locale, secondary: Locale) -> Result<Self, LocaleError> {
        if primary.tag == secondary.tag {
            return Err(LocaleError::TagCollision {
                tag: primary.tag.clone(),
                primary: primary.code,
                secondary: secondary.code,
            });
        }
        Ok(Self { primary, secondary })
    }

    /// Parses both codes and builds the pair.
    ///
    /// # Errors
    ///
    /// Propagates [`Locale::parse`] and [`LocalePair::new`] failures.
    pub fn parse(primary: &str, secondary: &str) -> Result<Self, LocaleError> {
        Self::new(Locale::parse(primary)?, Locale::parse(secondary)?)
    }

    /// Output tags in field order: primary first.
    #[must_use]
    pub fn tags(&self) -> [&str; 2] {
        [self.primary.tag(), self.secondary.tag()]
    }
}
