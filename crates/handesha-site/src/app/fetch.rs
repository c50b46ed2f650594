//! Translation resource fetched over HTTP.

use async_trait::async_trait;
use gloo_net::http::Request;

use crate::error::LoadError;
use crate::i18n::TranslationSource;

/// Fetches the translation document relative to the page.
#[derive(Clone, Debug)]
pub(crate) struct FetchSource {
    url: String,
}

impl FetchSource {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn failure(&self, detail: impl ToString) -> LoadError {
        LoadError::Fetch {
            location: self.url.clone(),
            detail: detail.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl TranslationSource for FetchSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|err| self.failure(err))?;
        if !response.ok() {
            return Err(self.failure(format!("http status {}", response.status())));
        }
        response.binary().await.map_err(|err| self.failure(err))
    }

    fn location(&self) -> &str {
        &self.url
    }
}
