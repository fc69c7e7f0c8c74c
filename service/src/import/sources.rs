//! Dataset locations: an `http(s)://` URL or a local file path.

use std::{fmt, path::PathBuf, time::Duration};

use serde::de::DeserializeOwned;

use super::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads dataset sources, downloading URLs with a shared client.
#[derive(Clone)]
pub struct SourceReader {
    client: reqwest::Client,
}

impl SourceReader {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    /// `ImportError::Fetch` when the file cannot be read or the download fails.
    pub async fn read_text(&self, source: &DatasetSource) -> Result<String, ImportError> {
        let fetch_error = |reason: String| ImportError::Fetch {
            location: source.to_string(),
            reason,
        };

        match source {
            DatasetSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|err| fetch_error(err.to_string())),
            DatasetSource::Url(url) => {
                tracing::info!(url = %url, "Downloading dataset");
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|err| fetch_error(err.to_string()))?;
                response
                    .text()
                    .await
                    .map_err(|err| fetch_error(err.to_string()))
            }
        }
    }

    /// Read and decode a JSON dataset.
    ///
    /// # Errors
    /// `ImportError::Fetch` on read failures, `ImportError::Parse` when the
    /// body is not the expected JSON shape.
    pub async fn read_json<T: DeserializeOwned>(
        &self,
        source: &DatasetSource,
    ) -> Result<T, ImportError> {
        let text = self.read_text(source).await?;
        serde_json::from_str(&text).map_err(|err| ImportError::Parse {
            location: source.to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_distinguished() {
        assert_eq!(
            DatasetSource::parse("https://example.com/a.json"),
            DatasetSource::Url("https://example.com/a.json".into())
        );
        assert_eq!(
            DatasetSource::parse("data/governors-current.json"),
            DatasetSource::File(PathBuf::from("data/governors-current.json"))
        );
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let reader = SourceReader::new(5).unwrap();
        let err = reader
            .read_text(&DatasetSource::parse("/nonexistent/civicdata/none.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Fetch { .. }));
    }
}
