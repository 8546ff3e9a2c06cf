use crate::fetchers::{FetchError, PageFetcher};
use crate::utils;
use url::Url;

/// Plain HTTP GET fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    cache_bust: bool,
}

impl HttpFetcher {
    pub fn new(cache_bust: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sitenav/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, cache_bust })
    }

    /// The URL actually requested for `url`
    pub fn request_url(&self, url: &Url) -> Url {
        if self.cache_bust {
            utils::cache_busted(url)
        } else {
            url.clone()
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let request_url = self.request_url(url);
        ::log::debug!("GET {}", request_url);

        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
