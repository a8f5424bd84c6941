use std::borrow::Borrow;

use gardengate_core::AppError;

use crate::upload::UploadedFile;

/// Upload validation errors, raised before any decode
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No image file provided")]
    MissingFile,

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFile | ValidationError::EmptyFile => AppError::MissingFile,
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
        }
    }
}

/// Checks the raw attachment of an ingest request
#[derive(Debug, Clone, Copy)]
pub struct MediaValidator {
    max_file_size: usize,
}

impl MediaValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Returns the attachment when it is present, non-empty and within the size cap.
    /// Accepts the file owned or borrowed and hands it back the same way.
    pub fn validate_upload<F: Borrow<UploadedFile>>(
        &self,
        file: Option<F>,
    ) -> Result<F, ValidationError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        self.validate_file_size(file.borrow().data.len())?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(len: usize) -> UploadedFile {
        UploadedFile::new(vec![1u8; len], Some("photo.png".to_string()))
    }

    #[test]
    fn test_missing_file() {
        let validator = MediaValidator::new(100);
        let err = validator.validate_upload(None::<UploadedFile>).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFile));
        assert!(matches!(AppError::from(err), AppError::MissingFile));
    }

    #[test]
    fn test_empty_file_counts_as_missing() {
        let validator = MediaValidator::new(100);
        let empty = file(0);
        let err = validator.validate_upload(Some(&empty)).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyFile));
        assert!(matches!(AppError::from(err), AppError::MissingFile));
    }

    #[test]
    fn test_file_too_large() {
        let validator = MediaValidator::new(100);
        let big = file(101);
        let err = validator.validate_upload(Some(&big)).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { size: 101, max: 100 }));
        assert!(matches!(AppError::from(err), AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_valid_file() {
        let validator = MediaValidator::new(100);
        let ok = file(100);
        assert_eq!(validator.validate_upload(Some(&ok)).unwrap().data.len(), 100);

        let owned = validator.validate_upload(Some(file(3))).unwrap();
        assert_eq!(owned.filename.as_deref(), Some("photo.png"));
    }
}
