// Populate-once dataset cache
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::OnceCell;

use crate::data::{decode, DataError, DataSource, Table};

/// Loads the dataset from its source once and serves the same table afterwards.
///
/// Concurrent first callers wait on a single fetch. A failed load leaves the
/// cache empty, so a later call fetches again; a successful one is never
/// invalidated.
pub struct DatasetLoader {
    source: Box<dyn DataSource>,
    table: OnceCell<Arc<Table>>,
}

impl DatasetLoader {
    /// Create a new loader over a source
    pub fn new<S>(source: S) -> Self
    where
        S: DataSource + 'static,
    {
        Self::from_boxed(Box::new(source))
    }

    /// Create a new loader over a source chosen at runtime
    pub fn from_boxed(source: Box<dyn DataSource>) -> Self {
        DatasetLoader {
            source,
            table: OnceCell::new(),
        }
    }

    /// Get the cached table, fetching and decoding it on first use
    pub async fn load(&self) -> Result<Arc<Table>, DataError> {
        if let Some(table) = self.table.get() {
            debug!("Dataset cache hit ({} records)", table.len());
            return Ok(Arc::clone(table));
        }

        let table = self
            .table
            .get_or_try_init(|| async {
                info!(
                    "Fetching dataset from {} ({:?})",
                    self.source.name(),
                    self.source.source_type()
                );
                let raw = self.source.fetch().await?;
                let table = decode(raw.as_bytes())?;
                info!("Loaded {} records", table.len());
                Ok::<_, DataError>(Arc::new(table))
            })
            .await?;

        Ok(Arc::clone(table))
    }

    /// Check whether the table has been populated
    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    /// Name of the underlying source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SourceType;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CSV: &str = "sepal_length,sepal_width,petal_length,petal_width,species\n\
                       5.1,3.5,1.4,0.2,setosa\n\
                       7.0,3.2,4.7,1.4,versicolor\n";

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        body: Option<&'static str>,
    }

    impl DataSource for CountingSource {
        fn fetch(&self) -> BoxFuture<'_, Result<String, DataError>> {
            async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                self.body
                    .map(str::to_string)
                    .ok_or_else(|| DataError::SourceUnavailable("offline".to_string()))
            }
            .boxed()
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn source_type(&self) -> SourceType {
            SourceType::Custom("test".to_string())
        }
    }

    fn counting_loader(body: Option<&'static str>) -> (DatasetLoader, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: Arc::clone(&fetches),
            body,
        };
        (DatasetLoader::new(source), fetches)
    }

    #[tokio::test]
    async fn test_second_load_returns_same_table() {
        let (loader, fetches) = counting_loader(Some(CSV));
        assert!(!loader.is_loaded());

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(loader.is_loaded());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_loads_fetch_once() {
        let (loader, fetches) = counting_loader(Some(CSV));
        let loader = Arc::new(loader);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.load().await.unwrap() })
            })
            .collect();

        let mut tables = Vec::new();
        for handle in handles {
            tables.push(handle.await.unwrap());
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let (loader, fetches) = counting_loader(None);

        assert!(matches!(loader.load().await, Err(DataError::SourceUnavailable(_))));
        assert!(matches!(loader.load().await, Err(DataError::SourceUnavailable(_))));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn test_schema_violation_surfaces_at_load() {
        let (loader, _) = counting_loader(Some("sepal_length,sepal_width,petal_length,petal_width\n5.1,3.5,1.4,0.2\n"));
        assert!(matches!(loader.load().await, Err(DataError::SchemaViolation(_))));
    }
}
