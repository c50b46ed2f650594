//! Byte sources the translation dictionary can be loaded from.

use std::borrow::Cow;

use async_trait::async_trait;

use crate::error::LoadError;

/// Dictionary compiled into the crate.
pub const BUNDLED_TRANSLATIONS: &str = include_str!("../../i18n/translations.json");

/// Supplies the raw translation document.
///
/// Futures are not `Send`: sources run on the page's single event loop.
#[async_trait(?Send)]
pub trait TranslationSource {
    /// Retrieve the full document.
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;

    /// Location reported in logs.
    fn location(&self) -> &str;
}

/// In-memory document, used for the bundled dictionary and native hosts.
#[derive(Clone, Debug)]
pub struct StaticSource {
    location: Cow<'static, str>,
    bytes: Cow<'static, [u8]>,
}

impl StaticSource {
    /// Wrap arbitrary bytes.
    #[must_use]
    pub fn new(location: impl Into<Cow<'static, str>>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            location: location.into(),
            bytes: bytes.into(),
        }
    }

    /// Source backed by [`BUNDLED_TRANSLATIONS`].
    #[must_use]
    pub const fn bundled() -> Self {
        Self {
            location: Cow::Borrowed("bundled"),
            bytes: Cow::Borrowed(BUNDLED_TRANSLATIONS.as_bytes()),
        }
    }
}

#[async_trait(?Send)]
impl TranslationSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.bytes.to_vec())
    }

    fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_returns_its_bytes() {
        let source = StaticSource::new("memory", b"{}".as_slice());
        assert_eq!(source.location(), "memory");
        assert_eq!(source.fetch().await.expect("static fetch"), b"{}".to_vec());
    }

    #[tokio::test]
    async fn bundled_source_is_labelled() {
        let source = StaticSource::bundled();
        assert_eq!(source.location(), "bundled");
        assert!(!source.fetch().await.expect("bundled fetch").is_empty());
    }
}
