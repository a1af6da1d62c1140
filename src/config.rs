use std::env;

/// Bucket and table names supplied through the function's environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source_bucket: String,
    pub dest_bucket: String,
    pub table_name: String,
}

impl Config {
    /// Values are passed through as-is. A missing variable becomes an empty
    /// string and fails downstream at the SDK call rather than here.
    pub fn from_env() -> Self {
        Self {
            source_bucket: env::var("IMAGE_BUCKET").unwrap_or_default(),
            dest_bucket: env::var("RESIZED_BUCKET").unwrap_or_default(),
            table_name: env::var("TABLE_NAME").unwrap_or_default(),
        }
    }
}
