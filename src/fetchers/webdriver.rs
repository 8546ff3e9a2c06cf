use crate::fetchers::{FetchError, PageFetcher, with_timeout};
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Alternatives tried when the configured WebDriver URL does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Fetches pages through a WebDriver-controlled browser, so the returned
/// source is the rendered DOM rather than the raw response.
///
/// One browser session is shared; concurrent fetches take turns on it.
#[derive(Debug)]
pub struct WebDriverFetcher {
    webdriver_url: String,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    /// The session is opened lazily on the first fetch
    pub fn new(webdriver_url: &str) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            client: Mutex::new(None),
        }
    }

    /// Close the browser session, if one was opened
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }

    async fn connect(&self) -> Result<Client, FetchError> {
        match ClientBuilder::native().connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS
            .iter()
            .filter(|u| **u != self.webdriver_url)
        {
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        Err(FetchError::WebDriver(format!(
            "no WebDriver server answered at {} or the fallbacks; set WEBDRIVER_URL",
            self.webdriver_url
        )))
    }

    /// Load `url` in the held session, connecting or reconnecting as needed
    async fn load_in(&self, session: &mut Option<Client>, url: &Url) -> Result<String, FetchError> {
        if session.is_none() {
            *session = Some(self.connect().await?);
        }

        let mut reconnected = false;
        loop {
            let Some(client) = session.as_ref() else {
                return Err(FetchError::WebDriver("no session".to_string()));
            };

            match Self::load(client, url).await {
                Ok(source) => return Ok(source),
                Err(e) if !reconnected && e.to_string().contains("Unable to find session") => {
                    ::log::warn!("Lost WebDriver session while loading {}, reconnecting", url);
                    reconnected = true;
                    *session = Some(self.connect().await?);
                }
                Err(e) => return Err(FetchError::WebDriver(e.to_string())),
            }
        }
    }

    async fn load(client: &Client, url: &Url) -> Result<String, fantoccini::error::CmdError> {
        client.goto(url.as_str()).await?;
        client.source().await
    }
}

impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut session = self.client.lock().await;
        self.load_in(&mut session, url).await
    }

    /// Pages queue for the shared session; only the load itself is timed
    async fn fetch_within(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        let mut session = self.client.lock().await;
        with_timeout(timeout, self.load_in(&mut session, url)).await
    }
}
