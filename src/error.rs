use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One variant per pipeline step that can fail. Each wraps the underlying
/// transport or codec error and names the resource involved; the error is
/// surfaced to the Lambda runtime as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch image data from the '{bucket}' bucket: {source}")]
    Fetch {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to decode input image: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode resized image: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },

    #[error("failed to upload resized image '{key}' to the '{bucket}' bucket: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write metadata to the '{table}' table: {source}")]
    Record {
        table: String,
        #[source]
        source: BoxError,
    },
}
