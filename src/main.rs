use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing_subscriber::EnvFilter;

use image_resize::config::Config;
use image_resize::handler::handle_event;
use image_resize::pipeline::Pipeline;
use image_resize::store::{DynamoStore, S3Store};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let pipeline = Pipeline::new(
        S3Store::new(aws_sdk_s3::Client::new(&aws_config)),
        DynamoStore::new(aws_sdk_dynamodb::Client::new(&aws_config)),
        Config::from_env(),
    );

    run(service_fn(|event: LambdaEvent<S3Event>| {
        handle_event(&pipeline, event)
    }))
    .await
}
