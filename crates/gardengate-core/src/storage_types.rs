use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Asset store backend types
///
/// Defined in core because configuration selects the backend before the
/// storage crate builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStoreBackend {
    Cloudinary,
    Local,
    /// Process-local store for development and tests; never valid in production
    Memory,
}

impl FromStr for AssetStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(AssetStoreBackend::Cloudinary),
            "local" => Ok(AssetStoreBackend::Local),
            "memory" => Ok(AssetStoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid asset store backend: {}", s)),
        }
    }
}

impl Display for AssetStoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetStoreBackend::Cloudinary => write!(f, "cloudinary"),
            AssetStoreBackend::Local => write!(f, "local"),
            AssetStoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Digest used to sign Cloudinary upload parameters.
///
/// Accounts verify SHA-1 unless SHA-256 signing was enabled for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            _ => Err(anyhow::anyhow!("Invalid signature algorithm: {}", s)),
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SignatureAlgorithm::Sha1 => write!(f, "sha1"),
            SignatureAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}
