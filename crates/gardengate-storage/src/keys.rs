//! Shared key generation for asset store backends.
//!
//! Key format: `{folder}/{public_id}`, or just `{public_id}` without a folder.

use crate::traits::{StorageError, StorageResult};

/// Generate the store key for a folder and public id.
pub fn asset_key(folder: &str, public_id: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        public_id.to_string()
    } else {
        format!("{}/{}", folder, public_id)
    }
}

/// Reject keys that could escape the store root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.contains('\\') || key.split('/').any(|s| s == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_key() {
        assert_eq!(asset_key("garden_gate", "hero"), "garden_gate/hero");
        assert_eq!(asset_key("/garden_gate/", "hero"), "garden_gate/hero");
        assert_eq!(asset_key("", "hero"), "hero");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("garden_gate/hero").is_ok());
        assert!(validate_key("garden_gate/../../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        // Dots inside a name are fine
        assert!(validate_key("garden_gate/my..photo").is_ok());
    }
}
