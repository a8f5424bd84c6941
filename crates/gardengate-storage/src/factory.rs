#[cfg(feature = "storage-cloudinary")]
use crate::{CloudinaryCredentials, CloudinaryStore};
#[cfg(feature = "storage-local")]
use crate::LocalAssetStore;
use crate::{AssetStore, AssetStoreBackend, InMemoryAssetStore, StorageError, StorageResult};
use gardengate_core::Config;
use std::sync::Arc;

/// Create an asset store based on configuration
pub async fn create_asset_store(config: &Config) -> StorageResult<Arc<dyn AssetStore>> {
    match config.asset_store_backend() {
        #[cfg(feature = "storage-cloudinary")]
        AssetStoreBackend::Cloudinary => {
            let missing = |name: &str| StorageError::ConfigError(format!("{} not configured", name));
            let credentials = CloudinaryCredentials {
                cloud_name: config
                    .cloudinary_cloud_name()
                    .map(String::from)
                    .ok_or_else(|| missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: config
                    .cloudinary_api_key()
                    .map(String::from)
                    .ok_or_else(|| missing("CLOUDINARY_API_KEY"))?,
                api_secret: config
                    .cloudinary_api_secret()
                    .map(String::from)
                    .ok_or_else(|| missing("CLOUDINARY_API_SECRET"))?,
            };

            let store = CloudinaryStore::new(
                credentials,
                config.cloudinary_api_base(),
                std::time::Duration::from_secs(config.upload_timeout_secs()),
            )?
            .with_signature_algorithm(config.cloudinary_signature_algorithm());
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        AssetStoreBackend::Cloudinary => Err(StorageError::ConfigError(
            "Cloudinary backend not available (storage-cloudinary feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        AssetStoreBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let store = LocalAssetStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        AssetStoreBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        AssetStoreBackend::Memory => {
            tracing::warn!("Using the in-memory asset store; uploads are lost on restart");
            Ok(Arc::new(InMemoryAssetStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardengate_core::CmsConfig;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config(Box::new(
            CmsConfig::from_lookup(|key| vars.get(key).cloned()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_creates_cloudinary_store() {
        let config = config(&[("CLOUDINARY_URL", "cloudinary://k:s@demo")]);
        let store = create_asset_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), AssetStoreBackend::Cloudinary);
    }

    #[tokio::test]
    async fn test_missing_credentials_is_config_error() {
        let config = config(&[]);
        let result = create_asset_store(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_creates_memory_store() {
        let config = config(&[("ASSET_STORE_BACKEND", "memory")]);
        let store = create_asset_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), AssetStoreBackend::Memory);
    }

    #[tokio::test]
    async fn test_creates_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let config = config(&[
            ("ASSET_STORE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", &path),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8000/media"),
        ]);
        let store = create_asset_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), AssetStoreBackend::Local);
    }
}
