//! In-memory asset store
//!
//! Keeps uploads in a map and answers with Cloudinary-shaped URLs. Used by
//! tests and local runs without credentials. It can be switched into a failing
//! mode to exercise rejected uploads.

use crate::keys::asset_key;
use crate::traits::{
    AssetStore, AssetUpload, StorageError, StorageResult, StoredAsset, STORED_FORMAT,
};
use crate::AssetStoreBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct State {
    files: HashMap<String, AssetUpload>,
    uploads: Vec<AssetUpload>,
    failure: Option<String>,
}

/// Asset store that keeps everything in memory
#[derive(Clone)]
pub struct InMemoryAssetStore {
    state: Arc<Mutex<State>>,
    base_url: String,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::with_base_url("https://res.cloudinary.com/demo")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            base_url: base_url.into(),
        }
    }

    /// A store that rejects every upload with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_failure(Some(message.into()));
        store
    }

    pub fn set_failure(&self, message: Option<String>) {
        self.lock().failure = message;
    }

    /// Every upload received, in order (rejected ones included).
    pub fn uploads(&self) -> Vec<AssetUpload> {
        self.lock().uploads.clone()
    }

    /// Stored bytes for a `{folder}/{public_id}` key
    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().files.get(key).map(|u| u.data.clone())
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn upload(&self, upload: AssetUpload) -> StorageResult<StoredAsset> {
        let mut state = self.lock();
        state.uploads.push(upload.clone());

        if let Some(message) = &state.failure {
            return Err(StorageError::UploadFailed(message.clone()));
        }

        let key = asset_key(&upload.folder, &upload.public_id);
        let path = format!("image/upload/v1/{}.{}", key, STORED_FORMAT);
        let base = self.base_url.trim_end_matches('/');
        let secure_url = format!("{}/{}", base, path);
        let url = secure_url.replacen("https://", "http://", 1);
        let bytes = upload.data.len() as u64;

        state.files.insert(key.clone(), upload);

        Ok(StoredAsset {
            url,
            secure_url,
            public_id: key,
            width: None,
            height: None,
            format: Some(STORED_FORMAT.to_string()),
            bytes: Some(bytes),
        })
    }

    fn backend_type(&self) -> AssetStoreBackend {
        AssetStoreBackend::Memory
    }
}
