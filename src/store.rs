use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;

use crate::error::BoxError;
use crate::pipeline::ResizeRecord;

/// Bucket-shaped object storage. The pipeline only needs whole-object reads
/// and writes; implementations decide everything else.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BoxError>;

    /// Writes overwrite any existing object under the same key.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), BoxError>;
}

/// Key-value table holding one row per completed transformation.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn put_record(&self, table: &str, record: &ResizeRecord) -> Result<(), BoxError>;
}

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BoxError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let body = resp.body.collect().await?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), BoxError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }
}

pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

/// Attribute names match the table schema provisioned alongside the buckets.
fn record_item(record: &ResizeRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "sourceBucketName".to_string(),
            AttributeValue::S(record.source_bucket.clone()),
        ),
        (
            "sourceImageName".to_string(),
            AttributeValue::S(record.source_image.clone()),
        ),
        (
            "targetBucketName".to_string(),
            AttributeValue::S(record.target_bucket.clone()),
        ),
        (
            "resizedImageName".to_string(),
            AttributeValue::S(record.resized_image.clone()),
        ),
    ])
}

#[async_trait]
impl MetadataStore for DynamoStore {
    async fn put_record(&self, table: &str, record: &ResizeRecord) -> Result<(), BoxError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(record_item(record)))
            .send()
            .await?;
        Ok(())
    }
}
