use crate::keys::{asset_key, validate_key};
use crate::traits::{
    AssetStore, AssetUpload, StorageError, StorageResult, StoredAsset, STORED_FORMAT,
};
use crate::AssetStoreBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem asset store
///
/// Files land at `{base_path}/{folder}/{public_id}.webp` and are served from
/// `{base_url}/image/upload/{folder}/{public_id}.webp`. The `/upload/` segment
/// keeps the derived URL rule working in development.
#[derive(Clone)]
pub struct LocalAssetStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    /// Create a new LocalAssetStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/gardengate/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetStore {
            base_path,
            base_url,
        })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .base_path
            .join(format!("{}.{}", key, STORED_FORMAT)))
    }

    fn generate_url(&self, key: &str) -> String {
        format!(
            "{}/image/upload/{}.{}",
            self.base_url.trim_end_matches('/'),
            key,
            STORED_FORMAT
        )
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(&self, upload: AssetUpload) -> StorageResult<StoredAsset> {
        let key = asset_key(&upload.folder, &upload.public_id);
        let path = self.key_to_path(&key)?;
        let size = upload.data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&upload.data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local asset upload successful"
        );

        Ok(StoredAsset {
            secure_url: url.clone(),
            url,
            public_id: key,
            width: None,
            height: None,
            format: Some(STORED_FORMAT.to_string()),
            bytes: Some(size as u64),
        })
    }

    fn backend_type(&self) -> AssetStoreBackend {
        AssetStoreBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeliveryPolicy;
    use gardengate_core::derived_url::DerivedVariant;
    use tempfile::tempdir;

    fn upload(folder: &str, public_id: &str) -> AssetUpload {
        AssetUpload {
            data: b"webp bytes".to_vec(),
            folder: folder.to_string(),
            public_id: public_id.to_string(),
            delivery: DeliveryPolicy::Auto,
        }
    }

    #[tokio::test]
    async fn test_local_upload_writes_file() {
        let dir = tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "http://localhost:8000/media/".to_string())
            .await
            .unwrap();

        let stored = store.upload(upload("garden_gate", "hero")).await.unwrap();

        assert_eq!(stored.public_id, "garden_gate/hero");
        assert_eq!(
            stored.secure_url,
            "http://localhost:8000/media/image/upload/garden_gate/hero.webp"
        );
        assert_eq!(stored.bytes, Some(10));
        let written = std::fs::read(dir.path().join("garden_gate/hero.webp")).unwrap();
        assert_eq!(written, b"webp bytes");

        assert_eq!(
            store.derived_url(&stored.secure_url, DerivedVariant::Web),
            "http://localhost:8000/media/image/upload/f_webp,q_80,w_1920/garden_gate/hero.webp"
        );
    }

    #[tokio::test]
    async fn test_same_public_id_overwrites() {
        let dir = tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "http://localhost/media".to_string())
            .await
            .unwrap();

        store.upload(upload("garden_gate", "logo")).await.unwrap();
        let mut second = upload("garden_gate", "logo");
        second.data = b"newer".to_vec();
        store.upload(second).await.unwrap();

        let written = std::fs::read(dir.path().join("garden_gate/logo.webp")).unwrap();
        assert_eq!(written, b"newer");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "http://localhost/media".to_string())
            .await
            .unwrap();

        let result = store.upload(upload("../../etc", "passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
