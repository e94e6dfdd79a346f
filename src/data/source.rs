// Data sources for the raw dataset: remote HTTP and local file
// Author: Gabriel Demetrios Lafis

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use log::debug;
use reqwest::Client;

use super::{DataError, DataSource, SourceType};

/// Published location of the Iris dataset
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/iris.csv";

/// Fetches the dataset over HTTP(S)
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Create a new HTTP source with a request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(concat!("iris-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::SourceUnavailable(format!("HTTP client: {}", e)))?;

        Ok(HttpSource {
            client,
            url: url.to_string(),
        })
    }
}

impl DataSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'_, Result<String, DataError>> {
        async move {
            debug!("GET {}", self.url);
            let unavailable = |e: reqwest::Error| {
                DataError::SourceUnavailable(format!("{}: {}", self.url, e))
            };

            let resp = self.client.get(&self.url).send().await.map_err(unavailable)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(DataError::SourceUnavailable(format!(
                    "{} returned HTTP {}", self.url, status
                )));
            }

            resp.text().await.map_err(unavailable)
        }
        .boxed()
    }

    fn name(&self) -> &str {
        &self.url
    }

    fn source_type(&self) -> SourceType {
        SourceType::Http
    }
}

/// Reads the dataset from a local CSV file
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Create a new file source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
            name: path.as_ref().to_string_lossy().to_string(),
        }
    }
}

impl DataSource for FileSource {
    fn fetch(&self) -> BoxFuture<'_, Result<String, DataError>> {
        async move {
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| DataError::SourceUnavailable(format!("{}: {}", self.name, e)))
        }
        .boxed()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> SourceType {
        SourceType::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_reads_fixture() {
        let source = FileSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/iris.csv"));
        let text = source.fetch().await.unwrap();
        assert!(text.starts_with("sepal_length,sepal_width,petal_length,petal_width,species"));
        assert_eq!(source.source_type(), SourceType::File);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let source = FileSource::new("/nonexistent/iris.csv");
        assert!(matches!(source.fetch().await, Err(DataError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_source_unavailable() {
        let source = HttpSource::new("http://127.0.0.1:9/iris.csv", Duration::from_secs(2)).unwrap();
        assert!(matches!(source.fetch().await, Err(DataError::SourceUnavailable(_))));
    }
}
