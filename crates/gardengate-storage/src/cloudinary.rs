//! Cloudinary-compatible asset store
//!
//! Uploads are signed multipart POSTs to `{api_base}/v1_1/{cloud_name}/image/upload`.
//! The signature is the hex digest of the sorted `key=value` parameters joined
//! by `&`, with the API secret appended. SHA-1 unless the account has SHA-256
//! signing enabled.

use crate::traits::{
    AssetStore, AssetUpload, StorageError, StorageResult, StoredAsset, ACCESS_MODE,
    RESOURCE_TYPE, STORED_FORMAT,
};
use crate::AssetStoreBackend;
use async_trait::async_trait;
use gardengate_core::SignatureAlgorithm;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Cloudinary upload client
#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    credentials: CloudinaryCredentials,
    api_base: String,
    signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    /// Create a new store
    ///
    /// # Arguments
    /// * `credentials` - Cloud name, API key and secret
    /// * `api_base` - API origin (e.g., "https://api.cloudinary.com")
    /// * `timeout` - Transport timeout for one upload
    pub fn new(
        credentials: CloudinaryCredentials,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            api_base: api_base.into(),
            signature_algorithm: SignatureAlgorithm::default(),
        })
    }

    pub fn with_signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = algorithm;
        self
    }

    fn upload_endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.api_base.trim_end_matches('/'),
            self.credentials.cloud_name,
            RESOURCE_TYPE
        )
    }

    /// Parameters covered by the signature. `file`, `api_key` and the
    /// resource type are excluded.
    fn signed_params(upload: &AssetUpload, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("access_mode", ACCESS_MODE.to_string());
        if !upload.folder.is_empty() {
            params.insert("folder", upload.folder.clone());
        }
        params.insert("format", STORED_FORMAT.to_string());
        params.insert("public_id", upload.public_id.clone());
        params.insert("timestamp", timestamp.to_string());
        params.insert(
            "transformation",
            upload.delivery.transformation().to_string(),
        );
        params
    }

    pub(crate) fn sign(
        params: &BTreeMap<&'static str, String>,
        api_secret: &str,
        algorithm: SignatureAlgorithm,
    ) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        match algorithm {
            SignatureAlgorithm::Sha1 => hex::encode(digest::<Sha1>(&to_sign, api_secret)),
            SignatureAlgorithm::Sha256 => hex::encode(digest::<Sha256>(&to_sign, api_secret)),
        }
    }

    /// The store's own message for a failed response, else the status line.
    fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.message,
            Err(_) if body.trim().is_empty() => format!("Upload failed with status {}", status),
            Err(_) => body.trim().to_string(),
        }
    }
}

fn digest<D: Digest>(to_sign: &str, api_secret: &str) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher.finalize().to_vec()
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn upload(&self, upload: AssetUpload) -> StorageResult<StoredAsset> {
        let start = Instant::now();
        let size = upload.data.len();
        let timestamp = chrono::Utc::now().timestamp();
        let params = Self::signed_params(&upload, timestamp);
        let signature = Self::sign(
            &params,
            &self.credentials.api_secret,
            self.signature_algorithm,
        );

        let file_part = Part::bytes(upload.data)
            .file_name(format!("{}.{}", upload.public_id, STORED_FORMAT))
            .mime_str("image/webp")
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", self.signature_algorithm.to_string());
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.upload_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !status.is_success() {
            let message = Self::failure_message(status, &body);
            tracing::warn!(
                status = status.as_u16(),
                public_id = %upload.public_id,
                error = %message,
                "Cloudinary upload rejected"
            );
            return Err(StorageError::UploadFailed(message));
        }

        // Some proxies answer 200 with an error envelope
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return Err(StorageError::UploadFailed(envelope.error.message));
        }

        let stored: StoredAsset = serde_json::from_str(&body).map_err(|e| {
            StorageError::UploadFailed(format!("Unexpected upload response: {}", e))
        })?;

        tracing::info!(
            public_id = %stored.public_id,
            folder = %upload.folder,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(stored)
    }

    fn backend_type(&self) -> AssetStoreBackend {
        AssetStoreBackend::Cloudinary
    }
}
