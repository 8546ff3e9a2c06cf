use crate::fetchers::{FetchError, PageFetcher};
use url::Url;

/// Reads `file://` pages from a local mirror of the site
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl PageFetcher for FileFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if url.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::UnsupportedScheme(url.scheme().to_string()))?;

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
