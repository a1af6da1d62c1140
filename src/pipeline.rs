use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::PipelineError;
use crate::resize;
use crate::store::{MetadataStore, ObjectStore};

/// Fixed marker prepended to the source key to form the destination key.
pub const RESIZED_PREFIX: &str = "resized-";

pub fn resized_key(key: &str) -> String {
    format!("{RESIZED_PREFIX}{key}")
}

/// One row in the metadata table, describing a completed transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeRecord {
    pub source_bucket: String,
    pub source_image: String,
    pub target_bucket: String,
    pub resized_image: String,
}

/// The four steps of the pipeline, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Resize,
    Upload,
    Record,
}

pub const STAGES: [Stage; 4] = [Stage::Fetch, Stage::Resize, Stage::Upload, Stage::Record];

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Resize => "resize",
            Stage::Upload => "upload",
            Stage::Record => "record",
        }
    }
}

/// Data handed from one stage to the next within a single invocation.
/// Nothing here outlives the invocation.
#[derive(Default)]
struct StageContext {
    image_data: Vec<u8>,
    resized_data: Vec<u8>,
    resized_image: String,
}

/// Runs the fetch/resize/upload/record sequence against injected storage
/// handles. The handles carry connection configuration only, so one
/// pipeline value can serve every invocation of the function.
pub struct Pipeline<S, T> {
    objects: S,
    metadata: T,
    config: Config,
}

impl<S: ObjectStore, T: MetadataStore> Pipeline<S, T> {
    pub fn new(objects: S, metadata: T, config: Config) -> Self {
        Self {
            objects,
            metadata,
            config,
        }
    }

    /// Runs every stage in order, halting on the first failure. There is no
    /// compensation: an already-uploaded resized object stays put if the
    /// metadata write fails afterwards.
    pub async fn run(&self, key: &str) -> Result<ResizeRecord, PipelineError> {
        let mut ctx = StageContext::default();
        for stage in STAGES {
            self.run_stage(stage, key, &mut ctx).await?;
            tracing::debug!(stage = stage.name(), key, "stage complete");
        }
        Ok(self.record_for(key, &ctx))
    }

    async fn run_stage(
        &self,
        stage: Stage,
        key: &str,
        ctx: &mut StageContext,
    ) -> Result<(), PipelineError> {
        match stage {
            Stage::Fetch => {
                ctx.image_data = self
                    .objects
                    .get_object(&self.config.source_bucket, key)
                    .await
                    .map_err(|source| PipelineError::Fetch {
                        bucket: self.config.source_bucket.clone(),
                        source,
                    })?;
                info!(
                    key,
                    bucket = %self.config.source_bucket,
                    "fetched image from the source bucket"
                );
            }
            Stage::Resize => {
                ctx.resized_data = resize::resize_image(&ctx.image_data)?;
                info!(key, "successfully resized image");
            }
            Stage::Upload => {
                let resized_image = resized_key(key);
                self.objects
                    .put_object(
                        &self.config.dest_bucket,
                        &resized_image,
                        ctx.resized_data.clone(),
                    )
                    .await
                    .map_err(|source| PipelineError::Upload {
                        bucket: self.config.dest_bucket.clone(),
                        key: resized_image.clone(),
                        source,
                    })?;
                info!(
                    key = %resized_image,
                    bucket = %self.config.dest_bucket,
                    "uploaded resized image to the destination bucket"
                );
                ctx.resized_image = resized_image;
            }
            Stage::Record => {
                let record = self.record_for(key, ctx);
                self.metadata
                    .put_record(&self.config.table_name, &record)
                    .await
                    .map_err(|source| PipelineError::Record {
                        table: self.config.table_name.clone(),
                        source,
                    })?;
                info!(
                    table = %self.config.table_name,
                    "wrote metadata record for the transformation"
                );
            }
        }
        Ok(())
    }

    fn record_for(&self, key: &str, ctx: &StageContext) -> ResizeRecord {
        ResizeRecord {
            source_bucket: self.config.source_bucket.clone(),
            source_image: key.to_string(),
            target_bucket: self.config.dest_bucket.clone(),
            resized_image: ctx.resized_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fakes::{InMemoryMetadata, InMemoryObjects};
    use image::codecs::jpeg::JpegEncoder;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn test_config() -> Config {
        Config {
            source_bucket: "uploads".to_string(),
            dest_bucket: "resized".to_string(),
            table_name: "image-metadata".to_string(),
        }
    }

    fn sample_jpeg() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(320, 240));
        let mut buf = Vec::new();
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 90))
            .unwrap();
        buf
    }

    #[test]
    fn destination_key_gets_the_resized_prefix() {
        assert_eq!(resized_key("test.jpg"), "resized-test.jpg");
        assert_eq!(resized_key("dir/photo.jpg"), "resized-dir/photo.jpg");
    }

    #[tokio::test]
    async fn happy_path_writes_object_and_one_record() {
        let objects = InMemoryObjects::with_object("uploads", "test.jpg", sample_jpeg());
        let metadata = InMemoryMetadata::default();
        let pipeline = Pipeline::new(objects.clone(), metadata.clone(), test_config());

        let record = pipeline.run("test.jpg").await.unwrap();

        let resized = objects.object("resized", "resized-test.jpg").unwrap();
        let decoded =
            image::load_from_memory_with_format(&resized, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.width(), resize::TARGET_WIDTH);
        assert_eq!(decoded.height(), resize::TARGET_HEIGHT);

        let records = metadata.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "image-metadata");
        assert_eq!(records[0].1, record);
        assert_eq!(
            record,
            ResizeRecord {
                source_bucket: "uploads".to_string(),
                source_image: "test.jpg".to_string(),
                target_bucket: "resized".to_string(),
                resized_image: "resized-test.jpg".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn stages_run_in_fixed_order() {
        let objects = InMemoryObjects::with_object("uploads", "test.jpg", sample_jpeg());
        let metadata = InMemoryMetadata::default();
        let pipeline = Pipeline::new(objects.clone(), metadata.clone(), test_config());

        pipeline.run("test.jpg").await.unwrap();

        assert_eq!(
            objects.calls(),
            vec![
                "get uploads/test.jpg".to_string(),
                "put resized/resized-test.jpg".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_source_object_aborts_before_any_write() {
        let objects = InMemoryObjects::default();
        let metadata = InMemoryMetadata::default();
        let pipeline = Pipeline::new(objects.clone(), metadata.clone(), test_config());

        let err = pipeline.run("test.jpg").await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch { .. }));
        assert!(objects.object("resized", "resized-test.jpg").is_none());
        assert!(metadata.records().is_empty());
        assert_eq!(objects.calls(), vec!["get uploads/test.jpg".to_string()]);
    }

    #[tokio::test]
    async fn undecodable_object_fails_resize_and_skips_upload() {
        let objects =
            InMemoryObjects::with_object("uploads", "test.jpg", b"not a jpeg".to_vec());
        let metadata = InMemoryMetadata::default();
        let pipeline = Pipeline::new(objects.clone(), metadata.clone(), test_config());

        let err = pipeline.run("test.jpg").await.unwrap_err();

        assert!(matches!(err, PipelineError::Decode { .. }));
        assert!(objects.object("resized", "resized-test.jpg").is_none());
        assert!(metadata.records().is_empty());
    }

    #[tokio::test]
    async fn metadata_failure_leaves_the_uploaded_object_in_place() {
        // No compensation: the orphaned resized object is a known limitation.
        let objects = InMemoryObjects::with_object("uploads", "test.jpg", sample_jpeg());
        let metadata = InMemoryMetadata::failing();
        let pipeline = Pipeline::new(objects.clone(), metadata.clone(), test_config());

        let err = pipeline.run("test.jpg").await.unwrap_err();

        assert!(matches!(err, PipelineError::Record { .. }));
        assert!(objects.object("resized", "resized-test.jpg").is_some());
        assert!(metadata.records().is_empty());
    }
}
