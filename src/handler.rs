use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent};
use tracing::{debug, info};

use crate::pipeline::Pipeline;
use crate::store::{MetadataStore, ObjectStore};

/// Processes one S3 notification. Records are handled in delivery order and
/// the first pipeline failure aborts the invocation; the runtime decides
/// whether the event is re-delivered.
pub async fn handle_event<S, T>(
    pipeline: &Pipeline<S, T>,
    event: LambdaEvent<S3Event>,
) -> Result<(), Error>
where
    S: ObjectStore,
    T: MetadataStore,
{
    for record in event.payload.records {
        let event_name = record.event_name.as_deref().unwrap_or("");
        if !event_name.starts_with("ObjectCreated") {
            debug!(event_name, "skipping non-create event record");
            continue;
        }

        let key = record
            .s3
            .object
            .key
            .as_deref()
            .ok_or("object key is missing from the event record")?;

        let result = pipeline.run(key).await?;
        info!(
            source_image = %result.source_image,
            resized_image = %result.resized_image,
            "image resize pipeline complete"
        );
    }

    Ok(())
}
