use std::{path::PathBuf, sync::Arc, time::Duration};

use kitchen_shared::{RecipeDataset, Storage, StorageKey};

use crate::{
    config::DataConfig,
    error::{AppError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadedFrom {
    Remote,
    Cache,
    Bundled,
}

/// Where the recipe dataset comes from: remote endpoint, then the local cache,
/// then the bundled file.
pub struct DatasetSource {
    remote_url: Option<String>,
    bundled_path: PathBuf,
    timeout: Duration,
    storage: Arc<dyn Storage>,
}

impl DatasetSource {
    pub fn new(config: &DataConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            remote_url: config.remote_url.clone().filter(|url| !url.trim().is_empty()),
            bundled_path: PathBuf::from(&config.bundled_path),
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            storage,
        }
    }

    /// Walk the fallback chain. Each failing stage is logged and skipped; only
    /// when every stage fails does this return `DataUnavailable`.
    #[tracing::instrument(skip(self), fields(remote = ?self.remote_url, bundled = %self.bundled_path.display()))]
    pub async fn load(&self) -> Result<(RecipeDataset, LoadedFrom)> {
        if let Some(url) = &self.remote_url {
            match self.load_remote(url).await {
                Ok(dataset) => {
                    tracing::info!(url, "Loaded recipes from remote source");
                    return Ok((dataset, LoadedFrom::Remote));
                }
                Err(err) => tracing::warn!(url, err = %err, "Remote recipes unavailable"),
            }
        }

        match self.load_cache() {
            Ok(Some(dataset)) => {
                tracing::info!("Loaded recipes from local cache");
                return Ok((dataset, LoadedFrom::Cache));
            }
            Ok(None) => tracing::debug!("No cached recipes"),
            Err(err) => tracing::warn!(err = %err, "Cached recipes unreadable"),
        }

        match self.load_bundled().await {
            Ok(dataset) => {
                tracing::info!("Loaded bundled recipes");
                Ok((dataset, LoadedFrom::Bundled))
            }
            Err(err) => {
                tracing::warn!(err = %err, "Bundled recipes unavailable");
                Err(AppError::DataUnavailable(format!(
                    "no remote, cached or bundled recipes ({})",
                    self.bundled_path.display()
                )))
            }
        }
    }

    async fn load_remote(&self, url: &str) -> Result<RecipeDataset> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let body = client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let dataset = RecipeDataset::from_json(&body)?;

        if let Err(err) = self.storage.set(&StorageKey::CachedDataset, &body) {
            tracing::warn!(err = %err, "Failed to cache remote recipes");
        }

        Ok(dataset)
    }

    fn load_cache(&self) -> Result<Option<RecipeDataset>> {
        let Some(body) = self.storage.get(&StorageKey::CachedDataset)? else {
            return Ok(None);
        };

        Ok(Some(RecipeDataset::from_json(&body)?))
    }

    async fn load_bundled(&self) -> Result<RecipeDataset> {
        let body = tokio::fs::read_to_string(&self.bundled_path).await?;

        Ok(RecipeDataset::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_shared::MemoryStorage;
    use temp_dir::TempDir;

    const DATASET: &str = r#"{"cuisines": {"italian": {"Dinner": [{"title": "Lasagna"}]}}}"#;

    fn config(bundled: &std::path::Path, remote_url: Option<&str>) -> DataConfig {
        DataConfig {
            bundled_path: bundled.display().to_string(),
            remote_url: remote_url.map(str::to_owned),
            fetch_timeout_secs: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bundled_when_nothing_else() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.child("recipes.json");
        std::fs::write(&path, DATASET)?;

        let source = DatasetSource::new(&config(&path, None), Arc::new(MemoryStorage::new()));
        let (dataset, from) = source.load().await?;

        assert_eq!(from, LoadedFrom::Bundled);
        assert_eq!(dataset.recipes("italian", "Dinner")[0].title, "Lasagna");

        Ok(())
    }

    #[tokio::test]
    async fn test_cache_before_bundled() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.child("recipes.json");
        std::fs::write(&path, r#"{"cuisines": {}}"#)?;

        let storage = Arc::new(MemoryStorage::new());
        storage.set(&StorageKey::CachedDataset, DATASET)?;

        let source = DatasetSource::new(&config(&path, None), storage);
        let (dataset, from) = source.load().await?;

        assert_eq!(from, LoadedFrom::Cache);
        assert!(dataset.has_category("italian"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.child("recipes.json");
        std::fs::write(&path, DATASET)?;

        let source = DatasetSource::new(
            &config(&path, Some("http://127.0.0.1:9/recipes.json")),
            Arc::new(MemoryStorage::new()),
        );
        let (_, from) = source.load().await?;

        assert_eq!(from, LoadedFrom::Bundled);

        Ok(())
    }

    #[tokio::test]
    async fn test_all_stages_fail() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&StorageKey::CachedDataset, "{ broken")?;

        let source = DatasetSource::new(&config(&dir.child("missing.json"), None), storage);
        let result = source.load().await;

        assert!(matches!(result, Err(AppError::DataUnavailable(_))));

        Ok(())
    }
}
