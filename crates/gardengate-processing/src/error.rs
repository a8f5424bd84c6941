use gardengate_core::AppError;

/// Image processing errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// The bytes are not a decodable raster image.
    #[error("Not a valid image: {0}")]
    Decode(String),

    #[error("WebP encoding failed: {0}")]
    Encode(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        ProcessingError::Decode(err.to_string())
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Decode(msg) => AppError::ImageDecode(msg),
            ProcessingError::Encode(msg) => AppError::ImageProcessing(msg),
            ProcessingError::Task(msg) => AppError::Internal(msg),
        }
    }
}
